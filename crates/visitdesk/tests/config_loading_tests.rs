//! Table-driven tests for configuration loading and validation.

mod common;

use std::io::Write;

use common::{ConfigBuilder, NewVisitBuilder};
use serial_test::serial;
use visitdesk::assistant::ChatAssistant;
use visitdesk::config::{load_config, load_config_from_str};
use visitdesk::store::{LocalVisitStore, VisitStore};

/// Represents a single config loading test case.
struct ConfigTestCase {
    name: &'static str,
    config_json: &'static str,
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "listen_addr": "127.0.0.1:9000",
            "database": { "path": "/var/lib/visitdesk/visitdesk.db" },
            "queue": { "event_capacity": 128 },
            "assistant": {
                "enabled": true,
                "model": "gemini-2.5-flash",
                "base_url": "https://generativelanguage.googleapis.com",
                "api_key_file": "/run/secrets/gemini",
                "api_key_env": "GEMINI_KEY",
                "timeout_secs": 15
            },
            "catalog": {
                "purposes": ["과제 제출", "질문 있어요"],
                "teachers": [
                    { "id": "t1", "name": "유은희 선생님", "subject": "국어" },
                    { "id": "t2", "name": "최여경 선생님", "subject": "음악" }
                ],
                "grades": ["1", "2", "3"],
                "classNumbers": ["1", "2"],
                "classRequiredGrade": "3"
            }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "invalid_json",
        config_json: r#"{ invalid json }"#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{ "listen_addr": "0.0.0.0:8080" }"#,
        should_succeed: false,
        expected_error: Some("version"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "0.9" }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "zero_event_capacity",
        config_json: r#"{ "version": "1.0", "queue": { "event_capacity": 0 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "teacher_missing_subject",
        config_json: r#"{
            "version": "1.0",
            "catalog": { "teachers": [{ "id": "t1", "name": "유은희 선생님" }] }
        }"#,
        should_succeed: false,
        expected_error: Some("subject"),
    },
    ConfigTestCase {
        name: "duplicate_teacher_ids",
        config_json: r#"{
            "version": "1.0",
            "catalog": {
                "teachers": [
                    { "id": "t1", "name": "가 선생님", "subject": "국어" },
                    { "id": "t1", "name": "나 선생님", "subject": "수학" }
                ]
            }
        }"#,
        should_succeed: false,
        expected_error: Some("duplicate teacher id"),
    },
    ConfigTestCase {
        name: "blank_purpose",
        config_json: r#"{ "version": "1.0", "catalog": { "purposes": ["기타", " "] } }"#,
        should_succeed: false,
        expected_error: Some("purpose is empty"),
    },
    ConfigTestCase {
        name: "class_grade_not_listed",
        config_json: r#"{
            "version": "1.0",
            "catalog": { "grades": ["1", "2"], "classRequiredGrade": "3" }
        }"#,
        should_succeed: false,
        expected_error: Some("class-required grade"),
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}' should succeed but failed: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Test '{}' should fail but succeeded", test_case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = test_case.expected_error {
                assert!(
                    err.contains(expected),
                    "Test '{}': expected error containing '{}', got '{}'",
                    test_case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_builder_config_round_trips_through_loader() {
    let builder = ConfigBuilder::new()
        .event_capacity(8)
        .teacher("t8", "새 선생님", "과학");
    let config = load_config_from_str(&builder.to_json()).unwrap();
    assert_eq!(config.queue.event_capacity, 8);
    assert!(config.catalog.teacher_by_name("새 선생님").is_some());
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", ConfigBuilder::new().to_json()).unwrap();
    let config = load_config(file.path()).unwrap();
    assert!(config.database.in_memory);
}

#[tokio::test]
async fn test_database_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("visitdesk.db");
    let config = ConfigBuilder::new()
        .database_path(&path.to_string_lossy())
        .build();

    let db = config.database.open().unwrap();
    let store = LocalVisitStore::with_database(db, config.queue.event_capacity).unwrap();
    assert_eq!(store.subscriber_count(), 0);
    assert!(path.exists());

    let memory = ConfigBuilder::new().build();
    let store =
        LocalVisitStore::with_database(memory.database.open().unwrap(), 16).unwrap();
    let id = store.push(NewVisitBuilder::new().build()).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_some());
}

#[test]
#[serial]
fn test_assistant_key_from_env() {
    let mut config = ConfigBuilder::new().build();
    config.assistant.enabled = true;
    config.assistant.api_key_env = "VISITDESK_IT_API_KEY".to_string();

    std::env::remove_var("VISITDESK_IT_API_KEY");
    assert!(!ChatAssistant::from_config(&config.assistant)
        .unwrap()
        .is_configured());

    std::env::set_var("VISITDESK_IT_API_KEY", "secret");
    assert!(ChatAssistant::from_config(&config.assistant)
        .unwrap()
        .is_configured());
    std::env::remove_var("VISITDESK_IT_API_KEY");
}
