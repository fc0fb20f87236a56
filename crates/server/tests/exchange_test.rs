//! End-to-end tests for the tagfd namespace
//!
//! These tests run a real server on a temporary namespace root and drive
//! it with the blocking client library, exercising the full path: socket,
//! session, endpoint, cell.

use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tagfd_client::{list_tags, AdminClient, ClientError, TagReader, TagWriter};
use tagfd_core::Core;
use tagfd_protocol::paths::master_endpoint_path;
use tagfd_protocol::{
    CreateRequest, DataType, Quality, StatusCode, TagRecord, TagValue, CREATE_REQUEST_SIZE,
    TAG_RECORD_SIZE,
};
use tagfd_server::{ServerConfig, TagfdServer};

/// A running server on a private namespace root
struct Fixture {
    // Held for their lifetimes: the runtime drives the server, the
    // tempdir owns the namespace root.
    _rt: tokio::runtime::Runtime,
    _dir: tempfile::TempDir,
    root: PathBuf,
    core: Arc<Core>,
}

impl Fixture {
    fn start(max_tags: usize) -> Self {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("failed to build runtime");

        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let root = dir.path().join("tagfd");

        let config = ServerConfig::default()
            .with_root(&root)
            .with_max_tags(max_tags);
        let server = TagfdServer::with_config(config);
        let core = Arc::clone(server.core());

        let _guard = rt.enter();
        let _server = server.spawn();

        // Wait until the master socket is bound.
        let master = master_endpoint_path(&root);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !master.exists() {
            assert!(Instant::now() < deadline, "server did not come up");
            thread::sleep(Duration::from_millis(10));
        }

        Self {
            _rt: rt,
            _dir: dir,
            root,
            core,
        }
    }

    fn create(&self, dtype: DataType, name: &str) {
        let mut admin = AdminClient::open(&self.root).expect("failed to open master endpoint");
        admin.create(dtype, name).expect("failed to create tag");
    }
}

fn record(value: TagValue, timestamp: u64) -> TagRecord {
    TagRecord::new(value, timestamp, Quality::GOOD)
}

#[test]
fn test_blocking_read_wakes_on_write() {
    let fx = Fixture::start(8);
    fx.create(DataType::Uint32, "counter");

    let mut reader = TagReader::open(&fx.root, "counter").unwrap();
    let initial = reader.read().unwrap();
    let base = initial.timestamp;

    let reader_thread = thread::spawn(move || {
        let first = reader.read().unwrap();
        let second = reader.read().unwrap();
        (first, second)
    });
    thread::sleep(Duration::from_millis(100));

    let mut writer = TagWriter::open(&fx.root, "counter").unwrap();
    writer
        .write(&record(TagValue::Uint32(7), base + 1000))
        .unwrap();
    thread::sleep(Duration::from_millis(100));
    writer
        .write(&record(TagValue::Uint32(8), base + 1001))
        .unwrap();

    let (first, second) = reader_thread.join().unwrap();
    assert_eq!(first.value, TagValue::Uint32(7));
    assert_eq!(first.timestamp, base + 1000);
    assert_eq!(second.value, TagValue::Uint32(8));
    assert_eq!(second.timestamp, base + 1001);
}

#[test]
fn test_missed_updates_collapse() {
    let fx = Fixture::start(8);
    fx.create(DataType::Uint32, "fast");

    let base = fx
        .core
        .registry()
        .lookup("fast")
        .unwrap()
        .cell()
        .current_stamp();

    let mut writer = TagWriter::open(&fx.root, "fast").unwrap();
    for (value, off) in [(10u32, 1u64), (11, 2), (12, 3)] {
        writer
            .write(&record(TagValue::Uint32(value), base + off))
            .unwrap();
    }

    // A session that was not reading sees only the newest value.
    let mut reader = TagReader::open(&fx.root, "fast").unwrap();
    let seen = reader.read().unwrap();
    assert_eq!(seen.value, TagValue::Uint32(12));
    assert_eq!(seen.timestamp, base + 3);

    // And nothing further until the next commit.
    assert!(reader.try_read().unwrap().is_none());
}

#[test]
fn test_type_enforcement() {
    let fx = Fixture::start(8);
    fx.create(DataType::Real64, "temp");

    let mut reader = TagReader::open(&fx.root, "temp").unwrap();
    let before = reader.read().unwrap();

    let mut writer = TagWriter::open(&fx.root, "temp").unwrap();
    let err = writer
        .write(&record(TagValue::Int32(1), before.timestamp + 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected(StatusCode::TypeMismatch)
    ));

    // State unchanged on subsequent read from a fresh session.
    let mut after = TagReader::open(&fx.root, "temp").unwrap();
    assert_eq!(after.read().unwrap(), before);
}

#[test]
fn test_stale_timestamp_rejection() {
    let fx = Fixture::start(8);
    fx.create(DataType::Uint32, "mono");

    let mut reader = TagReader::open(&fx.root, "mono").unwrap();
    let base = reader.read().unwrap().timestamp + 5000;

    let mut writer = TagWriter::open(&fx.root, "mono").unwrap();
    writer.write(&record(TagValue::Uint32(1), base)).unwrap();

    for stale in [base, base - 1] {
        let err = writer
            .write(&record(TagValue::Uint32(2), stale))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected(StatusCode::StaleTimestamp)
        ));
    }

    writer
        .write(&record(TagValue::Uint32(2), base + 1))
        .unwrap();
}

#[test]
fn test_name_validation_end_to_end() {
    let fx = Fixture::start(8);

    let mut admin = AdminClient::open(&fx.root).unwrap();
    admin.create(DataType::Int8, "abc.def_2-3").unwrap();

    // Same name again: rejected by the registry.
    let err = admin.create(DataType::Int8, "abc.def_2-3").unwrap_err();
    assert!(matches!(err, ClientError::Rejected(StatusCode::NameTaken)));

    // An illegal name cannot even be encoded client-side.
    assert!(admin.create(DataType::Int8, "abc def").is_err());

    // Server-side validation: submit raw records the client library
    // refuses to build.
    drop(admin);
    let mut raw = open_raw_master(&fx.root);

    let mut bad = [0u8; CREATE_REQUEST_SIZE];
    bad[0] = b'+';
    bad[1] = DataType::Int8.as_u8();
    bad[2..9].copy_from_slice(b"abc def");
    assert_eq!(submit_raw(&mut raw, &bad), StatusCode::NameInvalid);

    // Empty name.
    let mut empty = [0u8; CREATE_REQUEST_SIZE];
    empty[0] = b'+';
    empty[1] = DataType::Int8.as_u8();
    assert_eq!(submit_raw(&mut raw, &empty), StatusCode::NameInvalid);

    // Unknown dtype discriminant.
    let mut bad_dtype = [0u8; CREATE_REQUEST_SIZE];
    bad_dtype[0] = b'+';
    bad_dtype[1] = 1;
    bad_dtype[2] = b'x';
    assert_eq!(submit_raw(&mut raw, &bad_dtype), StatusCode::DtypeInvalid);
}

#[test]
fn test_admin_exclusivity() {
    let fx = Fixture::start(8);

    let first = AdminClient::open(&fx.root).unwrap();

    let err = AdminClient::open(&fx.root).unwrap_err();
    assert!(matches!(err, ClientError::Rejected(StatusCode::AdminBusy)));

    // After the holder closes, the channel opens again (the server needs
    // a moment to observe the disconnect).
    drop(first);
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match AdminClient::open(&fx.root) {
            Ok(_) => break,
            Err(ClientError::Rejected(StatusCode::AdminBusy)) => {
                assert!(Instant::now() < deadline, "master endpoint never freed");
                thread::sleep(Duration::from_millis(20));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_capacity_boundary() {
    let fx = Fixture::start(2);

    let mut admin = AdminClient::open(&fx.root).unwrap();
    admin.create(DataType::Int8, "one").unwrap();
    admin.create(DataType::Int8, "two").unwrap();

    let err = admin.create(DataType::Int8, "three").unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected(StatusCode::CapacityExhausted)
    ));
}

#[test]
fn test_socket_permissions() {
    let fx = Fixture::start(8);
    fx.create(DataType::Int8, "guarded");

    let master_mode = std::fs::metadata(master_endpoint_path(&fx.root))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(master_mode & 0o777, 0o600, "master must be owner-only");

    let tag_mode = std::fs::metadata(fx.root.join("guarded"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(tag_mode & 0o777, 0o666, "tags must be world-accessible");
}

#[test]
fn test_namespace_listing() {
    let fx = Fixture::start(8);
    for name in ["zeta", "alpha", "mid"] {
        fx.create(DataType::Int8, name);
    }

    assert_eq!(list_tags(&fx.root).unwrap(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_open_nonexistent_tag_fails() {
    let fx = Fixture::start(8);
    assert!(matches!(
        TagReader::open(&fx.root, "ghost"),
        Err(ClientError::Io(_))
    ));
}

#[test]
fn test_short_write_is_rejected() {
    let fx = Fixture::start(8);
    fx.create(DataType::Uint32, "partial");

    let mut stream = UnixStream::connect(fx.root.join("partial")).unwrap();
    stream.write_all(&[b'w']).unwrap();
    stream.write_all(&[0u8; TAG_RECORD_SIZE / 2]).unwrap();
    stream
        .shutdown(std::net::Shutdown::Write)
        .unwrap();

    let mut status = [0u8; 1];
    stream.read_exact(&mut status).unwrap();
    assert_eq!(
        StatusCode::from_u8(status[0]).unwrap(),
        StatusCode::BufferTooSmall
    );
}

#[test]
fn test_new_tag_socket_available_on_ack() {
    let fx = Fixture::start(8);

    let mut admin = AdminClient::open(&fx.root).unwrap();
    admin
        .send(&CreateRequest::new(DataType::Uint32, "fresh").unwrap())
        .unwrap();

    // The acknowledgement guarantees the endpoint exists.
    let mut reader = TagReader::open(&fx.root, "fresh").unwrap();
    let initial = reader.read().unwrap();
    assert_eq!(initial.value, TagValue::Uint32(0));
    assert_eq!(initial.quality, Quality::UNCERTAIN);
}

/// Connect to the master socket without the client library, consuming the
/// open status byte
///
/// Retries while the channel is still held by a just-closed session.
fn open_raw_master(root: &std::path::Path) -> UnixStream {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let mut stream = UnixStream::connect(master_endpoint_path(root)).unwrap();
        let mut status = [0u8; 1];
        stream.read_exact(&mut status).unwrap();
        match StatusCode::from_u8(status[0]).unwrap() {
            StatusCode::Ok => return stream,
            StatusCode::AdminBusy => {
                assert!(Instant::now() < deadline, "master endpoint never freed");
                thread::sleep(Duration::from_millis(20));
            }
            other => panic!("unexpected open status: {other}"),
        }
    }
}

/// Submit one raw creation record and return the status reply
fn submit_raw(stream: &mut UnixStream, request: &[u8; CREATE_REQUEST_SIZE]) -> StatusCode {
    stream.write_all(request).unwrap();
    let mut status = [0u8; 1];
    stream.read_exact(&mut status).unwrap();
    StatusCode::from_u8(status[0]).unwrap()
}
