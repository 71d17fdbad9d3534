use std::collections::BTreeSet;
use std::fs;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fsquery_core::{Elem, Path, Value};
use fsquery_fs::{
    Capacity, CapacityError, CapacityProvider, InspectError, Inspector, ListingResult,
    LocalInspector, ResolvedPath, Walk,
};
use fsquery_query::{
    request, Config, DiskMetric, DiskSpaceResponse, Dispatcher, FileResponse, ListingKind,
    QueryError, StatusCode,
};

/// Local inspector that counts every walk it performs.
#[derive(Default)]
struct CountingInspector {
    walks: AtomicUsize,
}

impl Inspector for CountingInspector {
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError> {
        self.walks.fetch_add(1, Ordering::SeqCst);
        LocalInspector.walk(directory)
    }
}

/// Fixed capacity that records the concrete paths it was asked about.
#[derive(Default)]
struct FakeCapacity {
    calls: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

impl CapacityProvider for FakeCapacity {
    fn capacity(&self, path: &ResolvedPath) -> Result<Capacity, CapacityError> {
        self.calls
            .lock()
            .unwrap()
            .push(path.concrete().to_path_buf());
        Ok(Capacity {
            total_mb: 2048,
            available_mb: 512,
        })
    }
}

struct Harness {
    dispatcher: Dispatcher,
    inspector: Arc<CountingInspector>,
    capacity: Arc<FakeCapacity>,
}

fn harness(config: Config) -> Harness {
    let inspector = Arc::new(CountingInspector::default());
    let capacity = Arc::new(FakeCapacity::default());
    let dispatcher = Dispatcher::with_backends(config, inspector.clone(), capacity.clone());
    Harness {
        dispatcher,
        inspector,
        capacity,
    }
}

fn all_enabled(root: &str) -> Config {
    Config::new(root)
        .enable(ListingKind::Firmware)
        .enable(ListingKind::SonicImage)
}

/// a.bin (10 bytes), b.fw (20 bytes), sub/ containing c.bin (5 bytes).
fn populate(dir: &FsPath) {
    fs::create_dir_all(dir.join("sub")).unwrap();
    fs::write(dir.join("a.bin"), [1u8; 10]).unwrap();
    fs::write(dir.join("b.fw"), [2u8; 20]).unwrap();
    fs::write(dir.join("sub").join("c.bin"), [3u8; 5]).unwrap();
}

fn text(path: &FsPath) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn lists_scenario_directory() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let h = harness(all_enabled(""));

    let path = request::listing(ListingKind::Firmware, &text(dir.path())).unwrap();
    let listing: ListingResult = h
        .dispatcher
        .dispatch(&path)
        .unwrap()
        .deserialize_into()
        .unwrap();

    assert_eq!(listing.directory, text(dir.path()));
    assert_eq!(listing.file_count, 4);
    assert_eq!(listing.files.len(), 4);

    let names: BTreeSet<_> = listing.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        BTreeSet::from(["a.bin", "b.fw", "sub", "sub/c.bin"])
    );

    let mut sizes: Vec<u64> = listing
        .files
        .iter()
        .filter(|f| !f.is_directory)
        .map(|f| f.size)
        .collect();
    sizes.sort();
    assert_eq!(sizes, vec![5, 10, 20]);
    assert!(listing.find("sub").unwrap().is_directory);
}

#[test]
fn count_matches_listing_length() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let h = harness(all_enabled(""));
    let directory = text(dir.path());

    let count = h
        .dispatcher
        .dispatch(&request::listing_count(ListingKind::Firmware, &directory).unwrap())
        .unwrap();
    let listing: ListingResult = h
        .dispatcher
        .dispatch(&request::listing(ListingKind::Firmware, &directory).unwrap())
        .unwrap()
        .deserialize_into()
        .unwrap();

    assert_eq!(count, Value::Integer(4));
    assert_eq!(count.as_i64(), Some(listing.files.len() as i64));
}

#[test]
fn file_selector_returns_single_record() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let h = harness(all_enabled(""));
    let directory = text(dir.path());

    for name in ["a.bin", "b.fw", "sub", "sub/c.bin"] {
        // Nested names travel as one element, slash included.
        let path = request::listing(ListingKind::SonicImage, &directory)
            .unwrap()
            .child(Elem::new(name));
        let response: FileResponse = h
            .dispatcher
            .dispatch(&path)
            .unwrap()
            .deserialize_into()
            .unwrap();
        assert_eq!(response.directory, directory);
        assert_eq!(response.file.name, name);
    }

    let err = h
        .dispatcher
        .dispatch(&request::listing_file(ListingKind::Firmware, &directory, "c.bin").unwrap())
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound { ref name, .. } if name == "c.bin"));
    assert_eq!(err.status(), StatusCode::NotFound);
}

#[test]
fn nonexistent_directory_is_not_exist() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(all_enabled(""));
    let missing = text(&dir.path().join("non/existent"));

    for path in [
        request::listing(ListingKind::Firmware, &missing).unwrap(),
        request::listing_count(ListingKind::Firmware, &missing).unwrap(),
        request::listing_file(ListingKind::Firmware, &missing, "x").unwrap(),
    ] {
        let err = h.dispatcher.dispatch(&path).unwrap_err();
        assert!(
            matches!(err, QueryError::NotExist { ref directory } if *directory == missing),
            "{:?}",
            err
        );
    }
}

#[test]
fn disabled_listing_fails_before_touching_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let h = harness(Config::new("").enable(ListingKind::SonicImage));
    let directory = text(dir.path());

    for path in [
        request::listing(ListingKind::Firmware, &directory).unwrap(),
        request::listing_count(ListingKind::Firmware, &directory).unwrap(),
        request::listing_file(ListingKind::Firmware, &directory, "a.bin").unwrap(),
    ] {
        let err = h.dispatcher.dispatch(&path).unwrap_err();
        assert!(
            matches!(err, QueryError::PreconditionFailed { ref resource } if resource == "firmware")
        );
        assert_eq!(err.status(), StatusCode::FailedPrecondition);
    }
    assert_eq!(h.inspector.walks.load(Ordering::SeqCst), 0);

    // The enabled listing still works and does walk.
    h.dispatcher
        .dispatch(&request::listing(ListingKind::SonicImage, &directory).unwrap())
        .unwrap();
    assert_eq!(h.inspector.walks.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_parameters_are_missing_for_every_kind() {
    let h = harness(Config::default());

    let mut paths = Vec::new();
    for kind in ListingKind::ALL {
        let resource = Elem::new(kind.resource_name()).with_key("directory", "");
        paths.push(Path::new(vec![
            Elem::new("sonic"),
            Elem::new("system"),
            resource,
            Elem::new("files"),
        ]));
        let filename_path = request::listing(kind, "/lib/firmware")
            .unwrap()
            .child(Elem::new(""));
        paths.push(filename_path);
    }
    paths.push(Path::parse("/sonic/system/filesystem[path=]/disk-space").unwrap());

    for path in &paths {
        let err = h.dispatcher.dispatch(path).unwrap_err();
        assert!(
            matches!(err, QueryError::MissingParameter { .. }),
            "{}: {:?}",
            path,
            err
        );
        assert_eq!(err.status(), StatusCode::InvalidArgument);
    }
    assert_eq!(h.inspector.walks.load(Ordering::SeqCst), 0);
}

#[test]
fn rootfs_confines_listing() {
    let root = tempfile::tempdir().unwrap();
    let firmware = root.path().join("lib").join("firmware");
    populate(&firmware);
    // A sibling of the root that must never be reached.
    let outside = tempfile::tempdir().unwrap();
    populate(outside.path());

    let h = harness(all_enabled(&text(root.path())));

    let count = h
        .dispatcher
        .dispatch(&request::listing_count(ListingKind::Firmware, "/lib/firmware").unwrap())
        .unwrap();
    assert_eq!(count, Value::Integer(4));

    let listing: ListingResult = h
        .dispatcher
        .dispatch(&request::listing(ListingKind::Firmware, "/lib/firmware").unwrap())
        .unwrap()
        .deserialize_into()
        .unwrap();
    assert_eq!(listing.directory, "/lib/firmware");

    // Climbing out with `..` lands inside the root instead.
    let escape = format!("/../../../..{}", text(outside.path()));
    let err = h
        .dispatcher
        .dispatch(&request::listing(ListingKind::Firmware, &escape).unwrap())
        .unwrap_err();
    assert!(matches!(err, QueryError::NotExist { .. }), "{:?}", err);
}

#[test]
fn disk_space_shapes_follow_metric() {
    let h = harness(Config::new("/mnt/host"));

    let both: DiskSpaceResponse = h
        .dispatcher
        .dispatch(&request::disk_space("/host", DiskMetric::Both).unwrap())
        .unwrap()
        .deserialize_into()
        .unwrap();
    assert_eq!(
        both,
        DiskSpaceResponse {
            path: "/host".to_string(),
            total_mb: Some(2048),
            available_mb: Some(512),
        }
    );

    let total = h
        .dispatcher
        .dispatch(&request::disk_space("/host", DiskMetric::Total).unwrap())
        .unwrap();
    assert_eq!(total.get("total-mb"), Some(&Value::Integer(2048)));
    assert_eq!(total.get("available-mb"), None);

    let available = h
        .dispatcher
        .dispatch(&request::disk_space("/host", DiskMetric::Available).unwrap())
        .unwrap();
    assert_eq!(available.get("total-mb"), None);
    assert_eq!(available.get("available-mb"), Some(&Value::Integer(512)));

    let calls = h.capacity.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|p| p == FsPath::new("/mnt/host/host")));
}

#[test]
fn disk_space_ignores_listing_flags() {
    let h = harness(Config::default());
    let value = h
        .dispatcher
        .dispatch(&request::disk_space("/", DiskMetric::Both).unwrap())
        .unwrap();
    assert_eq!(value.get("path"), Some(&Value::from("/")));
}

#[test]
fn shape_errors() {
    let h = harness(all_enabled(""));

    let cases = [
        ("/sonic/system/firmware[directory=/d]/files/a/b", StatusCode::InvalidArgument),
        ("/sonic/system/filesystem[path=/]/disk-space/used-mb", StatusCode::InvalidArgument),
        ("/sonic/system/firmware[directory=/d]/meta", StatusCode::NotFound),
        ("/sonic/system/interfaces", StatusCode::NotFound),
        ("/other/root", StatusCode::NotFound),
    ];
    for (text, status) in cases {
        let err = h
            .dispatcher
            .dispatch(&Path::parse(text).unwrap())
            .unwrap_err();
        assert_eq!(err.status(), status, "{}: {:?}", text, err);
    }
    assert_eq!(h.inspector.walks.load(Ordering::SeqCst), 0);
}

#[test]
fn get_answers_each_path_and_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let h = harness(all_enabled(""));
    let directory = text(dir.path());

    let paths = vec![
        request::listing_count(ListingKind::Firmware, &directory).unwrap(),
        request::disk_space("/", DiskMetric::Total).unwrap(),
    ];
    let updates = h.dispatcher.get(&paths).unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].path, paths[0]);
    assert_eq!(updates[0].value, Value::Integer(4));
    assert!(updates[1].value.get("total-mb").is_some());

    let failing = vec![
        Path::parse("/unsupported").unwrap(),
        request::listing(ListingKind::Firmware, &directory).unwrap(),
    ];
    assert!(matches!(
        h.dispatcher.get(&failing),
        Err(QueryError::UnsupportedPath { .. })
    ));
    assert_eq!(h.inspector.walks.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_requests_share_one_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let dispatcher = Dispatcher::new(all_enabled(""));
    let path = request::listing_count(ListingKind::Firmware, &text(dir.path())).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| dispatcher.dispatch(&path).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Value::Integer(4));
        }
    });
}

#[test]
fn responses_encode_as_json() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let dispatcher = Dispatcher::new(all_enabled(""));
    let directory = text(dir.path());

    let value = dispatcher
        .dispatch(&request::listing_file(ListingKind::Firmware, &directory, "a.bin").unwrap())
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&value).unwrap())
        .unwrap();
    assert_eq!(json["directory"], directory);
    assert_eq!(json["file"]["name"], "a.bin");
    assert_eq!(json["file"]["size"], 10);
    assert_eq!(json["file"]["is_directory"], false);
}
