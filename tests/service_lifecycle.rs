// tests/service_lifecycle.rs

use std::fs;
use std::time::Duration;

use schedwatch::cli::LogLevel;
use schedwatch::config::{load_from_path, sample_config};
use schedwatch::logging::{parse_level_str, resolve_level};
use schedwatch::service::Service;
use schedwatch_test_utils::fake_backend::FakeBackend;
use schedwatch_test_utils::init_tracing;

#[tokio::test]
async fn init_writes_the_sample_and_stop_ends_start() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");

    let backend = FakeBackend::new();
    let service = Service::with_backend(&path, backend.as_backend()).unwrap();
    assert_eq!(load_from_path(&path).unwrap(), sample_config());

    let handle = service.handle();
    let running = tokio::spawn(service.start());

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.stop().await;

    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service did not stop")
        .unwrap()
        .unwrap();

    // The sample schedules are far apart; nothing ran.
    assert!(backend.calls().is_empty());

    // Nudging a stopped service is logged and returns.
    tokio::time::timeout(Duration::from_secs(1), handle.reload())
        .await
        .expect("reload on a stopped service hung");
    handle.stop().await;
}

#[tokio::test]
async fn editing_the_file_installs_the_new_tasks() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");
    fs::write(&path, r#"{ "Tasks": [] }"#).unwrap();

    let backend = FakeBackend::new();
    let service = Service::with_backend(&path, backend.as_backend()).unwrap();
    let handle = service.handle();
    let running = tokio::spawn(service.start());

    tokio::time::sleep(Duration::from_millis(300)).await;
    fs::write(
        &path,
        r#"{ "Tasks": [ { "At": "@every 1s", "Do": "exec", "Args": ["tick"] } ] }"#,
    )
    .unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while backend.call_count("tick") == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("edited config was never applied");

    handle.stop().await;
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service did not stop")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn manual_reload_of_a_broken_file_keeps_running() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.json");
    fs::write(
        &path,
        r#"{ "Tasks": [ { "At": "@every 1s", "Do": "exec", "Args": ["tick"] } ] }"#,
    )
    .unwrap();

    let backend = FakeBackend::new();
    let service = Service::with_backend(&path, backend.as_backend()).unwrap();
    let handle = service.handle();
    let running = tokio::spawn(service.start());

    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(&path, "{ this is not json").unwrap();
    handle.reload().await;

    tokio::time::timeout(Duration::from_secs(5), async {
        while backend.call_count("tick") < 2 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("original schedule stopped firing");

    handle.stop().await;
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("service did not stop")
        .unwrap()
        .unwrap();
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_level_str("DEBUG"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str(" warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
}

#[test]
fn cli_level_beats_environment_which_beats_default() {
    assert_eq!(
        resolve_level(Some(LogLevel::Error), Some("trace")),
        tracing::Level::ERROR
    );
    assert_eq!(resolve_level(None, Some("trace")), tracing::Level::TRACE);
    assert_eq!(resolve_level(None, Some("chatty")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}
