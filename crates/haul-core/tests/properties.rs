use haul_core::properties::{interpolate, load_env_file};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn load_env_file_with_comments_quotes_and_export() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(
        tmp,
        "# credentials\n\
         AWS_KEY=AKIDEXAMPLE\n\
         \n\
         export AWS_SECRET='s3cr=t'\n\
         REGION  =  \"eu-west-1\"\n"
    )
    .unwrap();
    tmp.flush().unwrap();

    let env = load_env_file(tmp.path()).unwrap();
    assert_eq!(env.get("AWS_KEY"), Some(&"AKIDEXAMPLE".to_string()));
    assert_eq!(env.get("AWS_SECRET"), Some(&"s3cr=t".to_string()));
    assert_eq!(env.get("REGION"), Some(&"eu-west-1".to_string()));
    assert_eq!(env.len(), 3);
}

#[test]
fn load_env_file_nonexistent_path_returns_empty_map() {
    let path = std::path::Path::new("/nonexistent/path/to/.haul.env");
    let env = load_env_file(path).unwrap();
    assert!(env.is_empty());
}

#[test]
fn interpolate_prefers_overrides() {
    let mut env = BTreeMap::new();
    env.insert("HOME".to_string(), "/custom/home".to_string());

    let result = interpolate("path=${env:HOME}/file", &env);
    assert_eq!(result, "path=/custom/home/file");
}

#[test]
fn interpolate_missing_key_replaces_with_empty() {
    let env = BTreeMap::new();
    let result = interpolate("x=${env:HAUL_NONEXISTENT_VAR_99999}", &env);
    assert_eq!(result, "x=");
}

#[test]
fn interpolate_fallback_when_unset() {
    let env = BTreeMap::new();
    let result = interpolate("r=${env:HAUL_NONEXISTENT_VAR_99998:-us-east-1}", &env);
    assert_eq!(result, "r=us-east-1");
}

#[test]
fn interpolate_multiple_refs_and_unterminated_tail() {
    let mut env = BTreeMap::new();
    env.insert("USER".to_string(), "deploy".to_string());
    env.insert("PASS".to_string(), "s3cret".to_string());

    let result = interpolate("u=${env:USER} p=${env:PASS} ${env:OPEN", &env);
    assert_eq!(result, "u=deploy p=s3cret ${env:OPEN");
}

#[test]
fn interpolate_value_containing_reference_is_not_expanded_again() {
    let mut env = BTreeMap::new();
    env.insert("A".to_string(), "${env:B}".to_string());
    env.insert("B".to_string(), "nope".to_string());

    assert_eq!(interpolate("${env:A}", &env), "${env:B}");
}
