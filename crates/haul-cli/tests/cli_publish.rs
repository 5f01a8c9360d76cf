use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn haul_cmd() -> Command {
    let mut cmd = Command::cargo_bin("haul").unwrap();
    for var in [
        "HAUL_S3_BUCKET",
        "HAUL_S3_REGION",
        "HAUL_S3_PATH",
        "HAUL_S3_ACCESS_KEY",
        "HAUL_S3_SECRET_KEY",
        "HAUL_S3_ENDPOINT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Haul.toml"), manifest).unwrap();
    fs::create_dir_all(tmp.path().join("target")).unwrap();
    fs::write(tmp.path().join("target/app-1.0.jar"), "fake jar").unwrap();
    tmp
}

#[test]
fn test_dry_run_prints_object_key() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folder/app-1.0.jar"));
}

#[test]
fn test_flags_override_manifest() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish", "--dry-run", "--path", "releases\\v1 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("releases/v1/app-1.0.jar"));
}

#[test]
fn test_env_vars_feed_flags() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("svc.war"), "war").unwrap();

    haul_cmd()
        .current_dir(tmp.path())
        .env("HAUL_S3_BUCKET", "bucket")
        .env("HAUL_S3_REGION", "us-east-1")
        .env("HAUL_S3_PATH", "deploy/")
        .args(["publish", "--dry-run", "--artifact", "svc.war"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy/svc.war"));
}

#[test]
fn test_blank_canonical_ids_print_warning() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
canonical-ids = ["  ", ""]
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stderr(predicate::str::contains("read access will not be granted"));
}

#[test]
fn test_real_canonical_ids_print_no_warning() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
canonical-ids = ["abc"]
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning").not());
}

#[test]
fn test_blank_bucket_fails_before_upload() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "  "
region = "eu-west-1"
path = "folder"
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bucket is required"));
}

#[test]
fn test_missing_artifact_fails() {
    let tmp = project(
        r#"
[artifact]
final-name = "does-not-exist"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
access-key = "AKID"
secret-key = "SECRET"
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Artifact not found"));
}

#[test]
fn test_missing_credentials_fail() {
    let tmp = project(
        r#"
[artifact]
final-name = "app-1.0"

[s3]
bucket = "bucket"
region = "eu-west-1"
path = "folder"
"#,
    );

    haul_cmd()
        .current_dir(tmp.path())
        .args(["publish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access key is required"));
}

#[test]
fn test_no_artifact_configured_fails() {
    let tmp = TempDir::new().unwrap();

    haul_cmd()
        .current_dir(tmp.path())
        .args([
            "publish",
            "--bucket",
            "b",
            "--region",
            "us-east-1",
            "--path",
            "p",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No artifact configured"));
}
