// tests/config_watcher.rs

use std::fs;
use std::path::Path;
use std::time::Duration;

use schedwatch::engine::ServiceEvent;
use schedwatch::watch::{spawn_config_watcher, ContentFingerprint};
use schedwatch_test_utils::init_tracing;
use tokio::sync::mpsc;
use tokio::time::timeout;

// Write-then-rename, so the watcher never sees a half-written file.
fn replace(path: &Path, contents: &str) {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).unwrap();
    fs::rename(&tmp, path).unwrap();
}

async fn next_event(rx: &mut mpsc::Receiver<ServiceEvent>, within: Duration) -> Option<ServiceEvent> {
    timeout(within, rx.recv()).await.ok().flatten()
}

#[tokio::test]
async fn content_change_is_reported_once() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");
    fs::write(&path, r#"{ "Tasks": [] }"#).unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let _watcher = spawn_config_watcher(&path, tx).unwrap();

    // Give the platform watcher a moment to register.
    tokio::time::sleep(Duration::from_millis(200)).await;
    replace(&path, r#"{ "UTC": true, "Tasks": [] }"#);

    let event = next_event(&mut rx, Duration::from_secs(5)).await;
    assert_eq!(event, Some(ServiceEvent::ConfigChanged));

    // Follow-up events for the same save carry no new content.
    assert_eq!(next_event(&mut rx, Duration::from_millis(500)).await, None);
}

#[tokio::test]
async fn rewriting_identical_content_is_ignored() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");
    let body = r#"{ "Tasks": [] }"#;
    fs::write(&path, body).unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let _watcher = spawn_config_watcher(&path, tx).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    replace(&path, body);

    assert_eq!(next_event(&mut rx, Duration::from_secs(1)).await, None);
}

#[tokio::test]
async fn sibling_files_are_ignored() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");
    fs::write(&path, r#"{ "Tasks": [] }"#).unwrap();

    let (tx, mut rx) = mpsc::channel(16);
    let _watcher = spawn_config_watcher(&path, tx).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(dir.path().join("other.json"), "{}").unwrap();

    assert_eq!(next_event(&mut rx, Duration::from_secs(1)).await, None);
}

#[tokio::test]
async fn watching_a_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, _rx) = mpsc::channel(16);
    assert!(spawn_config_watcher(dir.path().join("absent.json"), tx).is_err());
}

#[test]
fn fingerprint_tracks_content_not_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    fs::write(&path, "a").unwrap();

    let mut fp = ContentFingerprint::of(&path).unwrap();
    assert!(!fp.refresh(&path).unwrap());

    fs::write(&path, "b").unwrap();
    assert!(fp.refresh(&path).unwrap());
    assert!(!fp.refresh(&path).unwrap());

    // Deleting the file is not a change.
    fs::remove_file(&path).unwrap();
    assert!(!fp.refresh(&path).unwrap());

    fs::write(&path, "a").unwrap();
    assert!(fp.refresh(&path).unwrap());
}
