use std::fs;
use std::path::Path;

use enable_ecr_login::{Error, LoadOutcome, Updater};
use serde_json::{json, Value};

fn hosts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn setup(content: Option<&str>) -> (tempfile::TempDir, Updater) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    if let Some(c) = content {
        fs::write(&path, c).unwrap();
    }
    (dir, Updater::at(path))
}

#[test]
fn second_run_is_a_no_op_with_identical_bytes() {
    let (_dir, u) = setup(Some(r#"{"auths": {"r.example.com": {"auth": "xyz"}}}"#));
    let registries = hosts(&["1.dkr.ecr.us-east-1.amazonaws.com", "1.dkr.ecr.us-west-2.amazonaws.com"]);

    assert!(u.ensure_cred_helpers("ecr-login", &registries).unwrap());
    let first = fs::read(u.path()).unwrap();
    assert!(!u.ensure_cred_helpers("ecr-login", &registries).unwrap());
    let second = fs::read(u.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unrelated_keys_survive_an_update() {
    let original = json!({
        "auths": {"r.example.com": {"auth": "xyz"}},
        "credsStore": "desktop",
        "proxies": {"default": {"httpProxy": "http://p:3128"}},
        "credHelpers": {"gcr.io": "gcloud"}
    });
    let (_dir, u) = setup(Some(&original.to_string()));

    assert!(u.ensure_cred_helpers("ecr-login", &hosts(&["h.example.com"])).unwrap());

    let mut expected = original.clone();
    expected["credHelpers"]["h.example.com"] = json!("ecr-login");
    assert_eq!(read_json(u.path()), expected);
}

#[test]
fn missing_file_produces_minimal_document() {
    let (_dir, u) = setup(None);
    assert!(u.ensure_cred_helpers("ecr-login", &hosts(&["h.example.com"])).unwrap());
    assert_eq!(read_json(u.path()), json!({"credHelpers": {"h.example.com": "ecr-login"}}));
}

#[test]
fn missing_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let u = Updater::at(dir.path().join("home").join(".docker").join("config.json"));
    assert!(u.ensure_cred_helpers("ecr-login", &hosts(&["h"])).unwrap());
    assert_eq!(read_json(u.path()), json!({"credHelpers": {"h": "ecr-login"}}));
}

#[test]
fn empty_file_behaves_like_missing_file() {
    let (_dir, empty) = setup(Some(""));
    let (_dir2, missing) = setup(None);
    let registries = hosts(&["h.example.com"]);

    assert!(empty.ensure_cred_helpers("ecr-login", &registries).unwrap());
    assert!(missing.ensure_cred_helpers("ecr-login", &registries).unwrap());
    assert_eq!(fs::read(empty.path()).unwrap(), fs::read(missing.path()).unwrap());
}

#[test]
fn null_file_is_replaced_like_an_empty_one() {
    let (_dir, u) = setup(Some("null"));
    assert!(u.ensure_cred_helpers("ecr-login", &hosts(&["h"])).unwrap());
    assert_eq!(read_json(u.path()), json!({"credHelpers": {"h": "ecr-login"}}));
}

#[test]
fn malformed_file_is_rejected_untouched() {
    let (dir, u) = setup(Some("{invalid json"));
    match u.ensure_cred_helpers("ecr-login", &hosts(&["h"])) {
        Err(Error::Load { path, .. }) => assert_eq!(path, u.path()),
        other => panic!("expected load error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(u.path()).unwrap(), "{invalid json");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn load_error_message_names_the_file() {
    let (_dir, u) = setup(Some("{\"auths\": {"));
    let err = u.ensure_cred_helpers("ecr-login", &hosts(&["h"])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("Failed to load Docker config file "), "{msg}");
    assert!(msg.contains("config.json"), "{msg}");
}

#[test]
fn non_object_cred_helpers_is_replaced() {
    let (_dir, u) = setup(Some(r#"{"credHelpers": "not-an-object", "auths": {}}"#));
    assert!(u.ensure_cred_helpers("ecr-login", &hosts(&["a", "b"])).unwrap());
    assert_eq!(
        read_json(u.path()),
        json!({"auths": {}, "credHelpers": {"a": "ecr-login", "b": "ecr-login"}})
    );
}

#[test]
fn already_correct_file_is_not_rewritten() {
    let content = r#"{"credHelpers": {"x.example.com": "ecr-login"}}"#;
    let (_dir, u) = setup(Some(content));
    let before = fs::metadata(u.path()).unwrap().modified().unwrap();

    assert!(!u.ensure_cred_helpers("ecr-login", &hosts(&["x.example.com"])).unwrap());

    // the compact original formatting proves no re-serialization happened
    assert_eq!(fs::read_to_string(u.path()).unwrap(), content);
    assert_eq!(fs::metadata(u.path()).unwrap().modified().unwrap(), before);
}

#[test]
fn dry_run_reports_pending_change_without_writing() {
    let content = r#"{"credHelpers": {"x.example.com": "desktop"}}"#;
    let (_dir, u) = setup(Some(content));
    assert!(u.pending_cred_helpers("ecr-login", &hosts(&["x.example.com"])).unwrap());
    assert!(!u.pending_cred_helpers("desktop", &hosts(&["x.example.com"])).unwrap());
    assert_eq!(fs::read_to_string(u.path()).unwrap(), content);
}

#[test]
fn save_failure_is_wrapped_and_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    // a non-empty directory at the target path makes the final rename fail
    let path = dir.path().join("config.json");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    // loading a directory fails first, so drive the saver directly
    let doc = json!({"credHelpers": {"h": "ecr-login"}});
    match enable_ecr_login::config::save(&path, doc.as_object().unwrap()) {
        Err(Error::Save { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected save error, got {other:?}"),
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn loader_outcomes_are_distinct() {
    let (_dir, u) = setup(None);
    assert!(matches!(enable_ecr_login::config::load(u.path()).unwrap(), LoadOutcome::Missing));
    fs::write(u.path(), "").unwrap();
    assert!(matches!(enable_ecr_login::config::load(u.path()).unwrap(), LoadOutcome::Empty));
    fs::write(u.path(), "{}").unwrap();
    assert!(matches!(enable_ecr_login::config::load(u.path()).unwrap(), LoadOutcome::Parsed(d) if d.is_empty()));
}
