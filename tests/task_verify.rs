// tests/task_verify.rs

use schedwatch::config::TaskConfig;
use schedwatch::errors::SchedwatchError;
use schedwatch::task::{TaskSet, TaskTrigger};
use schedwatch::types::ActionKind;
use schedwatch_test_utils::builders::{AppConfigBuilder, TaskConfigBuilder};

fn task_with_arity(action: &str, arity: usize) -> TaskConfig {
    let args: Vec<String> = (0..arity).map(|i| format!("arg{i}")).collect();
    TaskConfig::new("@hourly", action, args)
}

#[test]
fn verify_accepts_exactly_the_valid_kind_arity_pairs() {
    for action in ["ping", "exec", "fetch"] {
        for arity in 0..=3 {
            let task = task_with_arity(action, arity);
            let result = task.verify();

            match (action, arity) {
                ("ping", 2) => assert_eq!(result.unwrap(), ActionKind::Ping),
                ("exec", 1..) => assert_eq!(result.unwrap(), ActionKind::Exec),
                ("ping", _) | ("exec", _) => match result {
                    Err(SchedwatchError::InvalidArguments { kind, .. }) => {
                        assert_eq!(kind, action);
                    }
                    other => panic!("{action}/{arity}: expected InvalidArguments, got {other:?}"),
                },
                _ => match result {
                    Err(SchedwatchError::UnknownActionKind(kind)) => assert_eq!(kind, "fetch"),
                    other => panic!("{action}/{arity}: expected UnknownActionKind, got {other:?}"),
                },
            }
        }
    }
}

#[test]
fn verify_is_case_sensitive_about_action_names() {
    let task = task_with_arity("PING", 2);
    assert!(matches!(
        task.verify(),
        Err(SchedwatchError::UnknownActionKind(_))
    ));
}

#[test]
fn verify_does_not_look_at_the_schedule() {
    let task = TaskConfig::new("not a schedule", "exec", vec!["true".to_string()]);
    assert_eq!(task.verify().unwrap(), ActionKind::Exec);
}

#[test]
fn task_set_partitions_ordinary_and_error_tasks_in_order() {
    let set = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::ping("http://x/error1", "OK").on_error().build())
        .with_task(TaskConfigBuilder::ping("http://x/here", "OK").at("0 5 * * * *").build())
        .with_task(TaskConfigBuilder::exec("/bin/true", &[]).at("@every 1h30m").build())
        .with_task(TaskConfigBuilder::exec("/bin/alert", &["x"]).on_error().build())
        .build_task_set();

    assert_eq!(set.len(), 4);

    let ordinary: Vec<_> = set.ordinary_tasks().map(|t| t.args()[0].clone()).collect();
    assert_eq!(ordinary, vec!["http://x/here", "/bin/true"]);

    let errors: Vec<_> = set.error_tasks().iter().map(|t| t.args()[0].clone()).collect();
    assert_eq!(errors, vec!["http://x/error1", "/bin/alert"]);

    assert!(set.error_tasks().iter().all(|t| t.is_error_task()));
    assert!(set.error_tasks().iter().all(|t| *t.trigger() == TaskTrigger::OnError));
    assert!(set.ordinary_tasks().all(|t| t.schedule().is_some()));
    assert!(set.tasks().iter().all(|t| !t.running()));
}

#[test]
fn one_bad_schedule_rejects_the_whole_set() {
    let cfg = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::ping("http://x/a", "OK").at("@hourly").build())
        .with_task(TaskConfigBuilder::ping("http://x/b", "OK").at("every five minutes").build())
        .build();

    match TaskSet::try_from(cfg) {
        Err(SchedwatchError::TriggerParse { expr, .. }) => assert_eq!(expr, "every five minutes"),
        other => panic!("expected TriggerParse, got {other:?}"),
    }
}

#[test]
fn one_bad_task_rejects_the_whole_set() {
    let cfg = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::ping("http://x/a", "OK").build())
        .with_task(TaskConfigBuilder::action("ping", &["http://x/b"]).build())
        .build();

    assert!(matches!(
        TaskSet::try_from(cfg),
        Err(SchedwatchError::InvalidArguments { .. })
    ));
}

#[test]
fn error_tasks_are_not_schedule_checked() {
    // `@error` is not a schedule expression, but marks the task instead.
    let set = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::exec("/bin/alert", &[]).on_error().build())
        .build_task_set();

    assert_eq!(set.error_tasks().len(), 1);
    assert_eq!(set.ordinary_tasks().count(), 0);
    assert_eq!(set.error_tasks()[0].schedule(), None);
}

#[test]
fn error_tasks_are_still_verified() {
    let cfg = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::action("notify", &["x"]).on_error().build())
        .build();

    assert!(matches!(
        TaskSet::try_from(cfg),
        Err(SchedwatchError::UnknownActionKind(_))
    ));
}

#[test]
fn invalid_timeout_rejects_the_set() {
    for timeout in ["soon", "0s", "10"] {
        let cfg = AppConfigBuilder::new()
            .timeout(timeout)
            .with_task(TaskConfigBuilder::ping("http://x/a", "OK").build())
            .build();

        assert!(
            matches!(TaskSet::try_from(cfg), Err(SchedwatchError::ConfigDecode(_))),
            "timeout {timeout:?} should be rejected"
        );
    }
}

#[test]
fn timeout_is_copied_onto_every_task() {
    let set = AppConfigBuilder::new()
        .timeout("1m30s")
        .with_task(TaskConfigBuilder::ping("http://x/a", "OK").build())
        .with_task(TaskConfigBuilder::exec("/bin/alert", &[]).on_error().build())
        .build_task_set();

    let expected = Some(std::time::Duration::from_secs(90));
    assert_eq!(set.timeout(), expected);
    assert!(set.tasks().iter().all(|t| t.timeout() == expected));
}

#[test]
fn task_display_names_kind_schedule_and_args() {
    let set = AppConfigBuilder::new()
        .with_task(TaskConfigBuilder::ping("http://x/here", "OK").at("0 5 * * * *").build())
        .build_task_set();

    let shown = set.tasks()[0].to_string();
    assert_eq!(shown, r#"ping @ 0 5 * * * * <["http://x/here", "OK"]>"#);
}

#[test]
fn validation_errors_are_classified() {
    let err = task_with_arity("nope", 0).verify().unwrap_err();
    assert!(err.is_validation());
    assert!(!err.is_fatal());
    assert!(!SchedwatchError::AlreadyRunning.is_validation());
}
