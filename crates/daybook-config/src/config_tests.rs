use super::*;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = DaybookConfig::default();
    assert_eq!(config.store.backend, StoreBackend::Local);
    assert!(config.lock.enabled);
    assert_eq!(config.lock.on_unavailable, UnavailablePolicy::Allow);
    assert_eq!(config.lock.prompt, "Unlock Your Journal");
    assert_eq!(config.journal.default_mood, Mood::Happy);
    assert_eq!(config.firebase.database, "(default)");
}

#[test]
fn test_parse_partial_toml() {
    let toml_str = r#"
[store]
backend = "firestore"

[firebase]
api_key = "AIzaTest"
project_id = "journal-test"

[lock]
on_unavailable = "deny"
command = "fprintd-verify"
"#;
    let config: DaybookConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Firestore);
    assert_eq!(config.firebase.project_id, "journal-test");
    assert_eq!(
        config.firebase.firestore_endpoint,
        "https://firestore.googleapis.com/v1"
    );
    assert_eq!(config.lock.on_unavailable, UnavailablePolicy::Deny);
    assert_eq!(config.lock.command.as_deref(), Some("fprintd-verify"));
    assert!(config.lock.enabled);
    assert_eq!(config.journal.default_mood, Mood::Happy);
}

#[test]
fn test_parse_rejects_unknown_mood() {
    let toml_str = r#"
[journal]
default_mood = "meh"
"#;
    assert!(toml::from_str::<DaybookConfig>(toml_str).is_err());
}

#[test]
fn test_documents_url() {
    let firebase = FirebaseConfig {
        project_id: "p1".into(),
        firestore_endpoint: "http://localhost:8080/v1/".into(),
        ..FirebaseConfig::default()
    };
    assert_eq!(
        firebase.documents_url(),
        "http://localhost:8080/v1/projects/p1/databases/(default)/documents"
    );
}

#[test]
fn test_debug_redacts_api_key() {
    let firebase = FirebaseConfig {
        api_key: "AIzaSyVerySecret".into(),
        ..FirebaseConfig::default()
    };
    let shown = format!("{firebase:?}");
    assert!(shown.contains("AIza***"));
    assert!(!shown.contains("VerySecret"));
}

#[test]
fn test_display_toml_redacts_api_key() {
    let mut config = DaybookConfig::default();
    config.firebase.api_key = "AIzaSyVerySecret".into();
    let shown = config.to_display_toml().unwrap();
    assert!(shown.contains("AIza***"));
    assert!(!shown.contains("VerySecret"));
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = DaybookConfig::load_from(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Local);
}

#[test]
fn test_load_invalid_file_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[store\nbackend=").unwrap();
    let err = DaybookConfig::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
}

#[test]
fn test_default_template_parses_to_defaults() {
    let config: DaybookConfig = toml::from_str(&DaybookConfig::default_template()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Local);
    assert!(config.lock.enabled);
    assert_eq!(config.lock.on_unavailable, UnavailablePolicy::Allow);
    assert_eq!(config.journal.default_mood, Mood::Happy);
}

#[test]
fn test_save_default_template_respects_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    DaybookConfig::save_default_template(&path, false).unwrap();
    assert!(path.exists());

    assert!(DaybookConfig::save_default_template(&path, false).is_err());
    assert!(DaybookConfig::save_default_template(&path, true).is_ok());
}
