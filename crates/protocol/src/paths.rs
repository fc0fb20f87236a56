//! Namespace path conventions
//!
//! Every tag is exposed at `<root>/<tag_name>`; the master endpoint is the
//! sibling path `<root>.master`, deliberately outside the world-accessible
//! root directory. Both sides of the exchange derive paths from here so
//! they can never disagree.

use std::path::{Path, PathBuf};

/// Path of a tag's endpoint under the namespace root
pub fn tag_endpoint_path(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// Path of the master endpoint: `<root>.master`
pub fn master_endpoint_path(root: &Path) -> PathBuf {
    let mut os = root.as_os_str().to_os_string();
    os.push(".master");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_endpoint_path() {
        assert_eq!(
            tag_endpoint_path(Path::new("/run/tagfd"), "pump.speed"),
            PathBuf::from("/run/tagfd/pump.speed")
        );
    }

    #[test]
    fn test_master_is_sibling_of_root() {
        let master = master_endpoint_path(Path::new("/run/tagfd"));
        assert_eq!(master, PathBuf::from("/run/tagfd.master"));
        assert_eq!(master.parent(), Some(Path::new("/run")));
    }
}
