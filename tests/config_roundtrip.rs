// tests/config_roundtrip.rs

use schedwatch::config::{
    decode, encode, ensure_config_file, load_and_validate, load_from_path, sample_config,
    AppConfig, ConfigFormat, TaskConfig,
};
use schedwatch::errors::SchedwatchError;
use schedwatch::task::TaskSet;
use schedwatch_test_utils::builders::{AppConfigBuilder, TaskConfigBuilder};

fn mixed_config() -> AppConfig {
    AppConfigBuilder::new()
        .utc(true)
        .timeout("45s")
        .with_task(TaskConfigBuilder::ping("http://x/error", "OK").on_error().build())
        .with_task(TaskConfigBuilder::ping("http://x/here", "OK").at("0 5 * * * *").build())
        .with_task(TaskConfigBuilder::exec("/usr/bin/backup", &["--quiet", "/srv"]).at("@every 1h30m").build())
        .build()
}

#[test]
fn task_set_survives_json_and_toml_encoding() {
    let set = TaskSet::try_from(mixed_config()).unwrap();
    let original = set.to_config();
    assert_eq!(original, mixed_config());

    for format in [ConfigFormat::Json, ConfigFormat::Toml] {
        let text = encode(&original, format).unwrap();
        let decoded = decode(text.as_bytes(), format).unwrap();
        assert_eq!(decoded, original, "{format:?}:\n{text}");

        let again = TaskSet::try_from(decoded).unwrap();
        assert_eq!(again.len(), set.len());
        assert_eq!(again.timeout(), set.timeout());
        assert_eq!(again.utc(), set.utc());
    }
}

#[test]
fn json_uses_the_capitalised_schema_keys() {
    let json = encode(&mixed_config(), ConfigFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["UTC"], serde_json::json!(true));
    assert_eq!(value["Timeout"], serde_json::json!("45s"));
    assert_eq!(value["Tasks"][0]["At"], serde_json::json!("@error"));
    assert_eq!(value["Tasks"][2]["Do"], serde_json::json!("exec"));
    assert_eq!(
        value["Tasks"][2]["Args"],
        serde_json::json!(["/usr/bin/backup", "--quiet", "/srv"])
    );
}

#[test]
fn absent_timeout_is_not_written() {
    let json = encode(&sample_config(), ConfigFormat::Json).unwrap();
    assert!(!json.contains("Timeout"), "{json}");
}

#[test]
fn lowercase_keys_and_missing_fields_are_accepted() {
    let json = br#"{ "tasks": [ { "at": "@hourly", "do": "exec", "args": ["true"] } ] }"#;
    let cfg = decode(json, ConfigFormat::Json).unwrap();

    assert!(!cfg.utc);
    assert_eq!(cfg.timeout, None);
    assert_eq!(
        cfg.tasks,
        vec![TaskConfig::new("@hourly", "exec", vec!["true".to_string()])]
    );

    let empty = decode(b"{}", ConfigFormat::Json).unwrap();
    assert_eq!(empty, AppConfig::default());
}

#[test]
fn toml_config_decodes() {
    let text = r#"
UTC = true

[[Tasks]]
At = "@error"
Do = "ping"
Args = ["http://x/error", "OK"]

[[Tasks]]
At = "*/10 * * * *"
Do = "exec"
Args = ["/bin/true"]
"#;
    let set = TaskSet::try_from(decode(text.as_bytes(), ConfigFormat::Toml).unwrap()).unwrap();
    assert!(set.utc());
    assert_eq!(set.error_tasks().len(), 1);
    assert_eq!(set.ordinary_tasks().count(), 1);
}

#[test]
fn malformed_documents_are_decode_errors() {
    let cases: [(&[u8], ConfigFormat); 4] = [
        (b"{ not json", ConfigFormat::Json),
        (br#"{ "Tasks": "nope" }"#, ConfigFormat::Json),
        (br#"{ "Tasks": [ { "Do": "ping" } ] }"#, ConfigFormat::Json),
        (b"Tasks = 3", ConfigFormat::Toml),
    ];

    for (bytes, format) in cases {
        match decode(bytes, format) {
            Err(SchedwatchError::ConfigDecode(_)) => {}
            other => panic!(
                "{:?}: expected ConfigDecode, got {other:?}",
                String::from_utf8_lossy(bytes)
            ),
        }
    }
}

#[test]
fn format_follows_the_file_extension() {
    assert_eq!(ConfigFormat::from_path("a/b.toml"), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path("a/b.TOML"), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path("a/b.json"), ConfigFormat::Json);
    assert_eq!(ConfigFormat::from_path("a/schedwatch"), ConfigFormat::Json);
}

#[test]
fn sample_config_is_valid() {
    let set = TaskSet::try_from(sample_config()).unwrap();
    assert_eq!(set.error_tasks().len(), 1);
    assert_eq!(set.ordinary_tasks().count(), 2);
    assert!(!set.utc());
}

#[test]
fn missing_config_file_gets_the_sample_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("schedwatch.json");

    assert!(ensure_config_file(&path).unwrap());
    assert_eq!(load_from_path(&path).unwrap(), sample_config());
    assert_eq!(load_and_validate(&path).unwrap().len(), 3);

    // An existing file is left alone.
    std::fs::write(&path, r#"{ "Tasks": [] }"#).unwrap();
    assert!(!ensure_config_file(&path).unwrap());
    assert!(load_from_path(&path).unwrap().tasks.is_empty());
}

#[test]
fn sample_is_written_as_toml_for_toml_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedwatch.toml");

    ensure_config_file(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[[Tasks]]"), "{text}");
    assert_eq!(load_from_path(&path).unwrap(), sample_config());
}

#[test]
fn unreadable_config_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(
        load_from_path(&missing),
        Err(SchedwatchError::IoError(_))
    ));
}
