// Tests for installing the bundled dataset into the local store


use openbeerdata::{
    AssetSource, EmbeddedAsset, FileAsset, ObdError, ProvisionOutcome, Provisioner,
};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;
use std::thread;
use test_helpers::TestDataset;

fn provisioner_for(dataset: &TestDataset) -> Provisioner {
    Provisioner::from_config(&dataset.config())
}

/// Asset whose reader yields the first `cut` bytes of a real dataset, then fails
#[derive(Debug)]
struct TruncatedAsset {
    bytes: Vec<u8>,
    cut: usize,
}

struct FailingReader<'a> {
    remaining: &'a [u8],
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining.is_empty() {
            return Err(io::Error::other("device went away"));
        }
        let n = buf.len().min(self.remaining.len());
        buf[..n].copy_from_slice(&self.remaining[..n]);
        self.remaining = &self.remaining[n..];
        Ok(n)
    }
}

impl AssetSource for TruncatedAsset {
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(FailingReader {
            remaining: &self.bytes[..self.cut],
        }))
    }

    fn describe(&self) -> String {
        format!("<truncated after {} bytes>", self.cut)
    }
}

#[test]
fn test_first_call_copies_asset_verbatim() {
    let dataset = TestDataset::new();
    let provisioner = provisioner_for(&dataset);
    assert!(!provisioner.is_provisioned());

    let outcome = provisioner.ensure_provisioned().unwrap();

    let asset = dataset.asset_bytes();
    match outcome {
        ProvisionOutcome::Copied { bytes, sha256 } => {
            assert_eq!(bytes, asset.len() as u64);
            assert_eq!(sha256.len(), 64);
        }
        other => panic!("expected a copy, got {:?}", other),
    }
    assert_eq!(fs::read(dataset.store_path()).unwrap(), asset);
    assert!(provisioner.is_provisioned());
}

#[test]
fn test_repeated_calls_copy_exactly_once() {
    let dataset = TestDataset::new();
    let provisioner = provisioner_for(&dataset);

    let outcomes: Vec<_> = (0..5)
        .map(|_| provisioner.ensure_provisioned().unwrap())
        .collect();

    let copies = outcomes
        .iter()
        .filter(|o| matches!(o, ProvisionOutcome::Copied { .. }))
        .count();
    assert_eq!(copies, 1);
    assert!(matches!(outcomes[0], ProvisionOutcome::Copied { .. }));
    assert!(outcomes[1..]
        .iter()
        .all(|o| *o == ProvisionOutcome::AlreadyPresent));
    assert_eq!(fs::read(dataset.store_path()).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_concurrent_calls_copy_exactly_once() {
    let dataset = TestDataset::new();
    let provisioner = Arc::new(provisioner_for(&dataset));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provisioner = Arc::clone(&provisioner);
            thread::spawn(move || provisioner.ensure_provisioned().unwrap())
        })
        .collect();

    let copies = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|o| matches!(o, ProvisionOutcome::Copied { .. }))
        .count();

    assert_eq!(copies, 1);
    assert_eq!(fs::read(dataset.store_path()).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_small_buffer_still_copies_everything() {
    let dataset = TestDataset::new();
    let provisioner = Provisioner::new(
        Arc::new(FileAsset::new(&dataset.asset_path)),
        dataset.store_path(),
        7,
    );

    provisioner.ensure_provisioned().unwrap();
    assert_eq!(fs::read(dataset.store_path()).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_missing_asset_fails_without_leaving_a_store() {
    let dataset = TestDataset::new();
    let target = dataset.store_path();
    let provisioner = Provisioner::new(
        Arc::new(FileAsset::new(dataset.temp_dir.path().join("missing.db"))),
        &target,
        8192,
    );

    let err = provisioner.ensure_provisioned().unwrap_err();
    assert!(matches!(err, ObdError::Provisioning { .. }), "{:?}", err);
    assert!(!target.exists());
    assert!(!provisioner.is_provisioned());
}

#[test]
fn test_unwritable_destination_fails() {
    let dataset = TestDataset::new();
    // A regular file where the data directory should be
    let blocker = dataset.temp_dir.path().join("blocked");
    fs::write(&blocker, b"not a directory").unwrap();

    let provisioner = Provisioner::new(
        Arc::new(FileAsset::new(&dataset.asset_path)),
        blocker.join("openbeerdata.db"),
        8192,
    );

    let err = provisioner.ensure_provisioned().unwrap_err();
    assert!(matches!(err, ObdError::Provisioning { .. }), "{:?}", err);
}

#[test]
fn test_corrupt_store_is_replaced() {
    let dataset = TestDataset::new();
    let target = dataset.store_path();
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, b"half-written garbage from an old crash").unwrap();

    let provisioner = provisioner_for(&dataset);
    assert!(!provisioner.is_provisioned());

    let outcome = provisioner.ensure_provisioned().unwrap();
    assert!(matches!(outcome, ProvisionOutcome::Copied { .. }));
    assert_eq!(fs::read(&target).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_stale_temp_file_is_removed() {
    let dataset = TestDataset::new();
    let target = dataset.store_path();
    let temp = target.with_file_name("openbeerdata.db.tmp");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&temp, vec![0xAB; 100_000]).unwrap();

    provisioner_for(&dataset).ensure_provisioned().unwrap();

    assert!(!temp.exists());
    assert_eq!(fs::read(&target).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_existing_store_is_left_untouched() {
    let dataset = TestDataset::new();
    let provisioner = provisioner_for(&dataset);
    provisioner.ensure_provisioned().unwrap();

    let before = fs::metadata(dataset.store_path()).unwrap().modified().unwrap();
    assert_eq!(
        provisioner.ensure_provisioned().unwrap(),
        ProvisionOutcome::AlreadyPresent
    );
    let after = fs::metadata(dataset.store_path()).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_embedded_asset_provisions() {
    let dataset = TestDataset::new();
    let bytes: &'static [u8] = Box::leak(dataset.asset_bytes().into_boxed_slice());
    let target = dataset.temp_dir.path().join("embedded").join("openbeerdata.db");

    let provisioner = Provisioner::new(Arc::new(EmbeddedAsset::new(bytes)), &target, 4096);
    provisioner.ensure_provisioned().unwrap();

    assert_eq!(fs::read(&target).unwrap(), bytes);
}

#[test]
fn test_interrupted_copy_leaves_nothing_behind() {
    let dataset = TestDataset::new();
    let target = dataset.store_path();
    let temp = target.with_file_name("openbeerdata.db.tmp");
    let bytes = dataset.asset_bytes();
    let cut = bytes.len() / 2;

    let broken = Provisioner::new(Arc::new(TruncatedAsset { bytes, cut }), &target, 512);
    let err = broken.ensure_provisioned().unwrap_err();
    assert!(matches!(err, ObdError::Provisioning { .. }), "{:?}", err);
    assert!(!target.exists());
    assert!(!temp.exists());
    assert!(!broken.is_provisioned());

    // A good asset afterwards installs normally
    let outcome = provisioner_for(&dataset).ensure_provisioned().unwrap();
    assert!(matches!(outcome, ProvisionOutcome::Copied { .. }));
    assert_eq!(fs::read(&target).unwrap(), dataset.asset_bytes());
}

#[test]
fn test_undeletable_stale_temp_fails_cleanly() {
    let dataset = TestDataset::new();
    let target = dataset.store_path();
    // A directory in the temp file's place cannot be removed as a file
    let temp = target.with_file_name("openbeerdata.db.tmp");
    fs::create_dir_all(&temp).unwrap();

    let err = provisioner_for(&dataset).ensure_provisioned().unwrap_err();
    assert!(matches!(err, ObdError::Provisioning { .. }), "{:?}", err);
    assert!(!target.exists());

    fs::remove_dir(&temp).unwrap();
    assert!(matches!(
        provisioner_for(&dataset).ensure_provisioned().unwrap(),
        ProvisionOutcome::Copied { .. }
    ));
}
