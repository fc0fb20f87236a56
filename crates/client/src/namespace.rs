//! Namespace discovery
//!
//! A client finds tags by listing the namespace root: every socket in the
//! directory is a tag endpoint. The registry hands out tags in creation
//! order but the filesystem does not preserve it, so the listing is
//! sorted by name for stable output.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use crate::Result;

/// List the names of all tags exposed under `root`
///
/// Non-socket entries are skipped, as are names that are not valid UTF-8.
pub fn list_tags(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_socket() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_lists_sockets_sorted() {
        let dir = tempfile::tempdir().unwrap();

        // Two endpoints and one stray regular file.
        let _b = UnixListener::bind(dir.path().join("beta")).unwrap();
        let _a = UnixListener::bind(dir.path().join("alpha")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a tag").unwrap();

        let names = list_tags(dir.path()).unwrap();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_tags(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        assert!(list_tags(Path::new("/nonexistent/tagfd-root")).is_err());
    }
}
