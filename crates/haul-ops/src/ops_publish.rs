//! Operation: publish the build artifact to S3.
//!
//! Merges command-line overrides over `Haul.toml`, runs the publish pipeline
//! from `haul-core` against an [`S3Client`], and reports progress with
//! Cargo-style status lines.

use std::path::{Path, PathBuf};
use std::time::Duration;

use haul_core::config::Manifest;
use haul_core::grants::filter_principals;
use haul_core::publish::{plan, ArtifactPublisher, PublishPlan, PublishReceipt, PublishRequest};
use haul_s3::config::Credentials;
use haul_s3::{S3Client, S3Config};
use haul_util::errors::HaulError;
use haul_util::fs::human_bytes;
use haul_util::progress::{status, status_info, status_warn};

/// Values given on the command line. Blank or unset fields fall back to the
/// manifest; boolean flags can only switch a setting on.
#[derive(Debug, Clone, Default)]
pub struct PublishOverrides {
    pub manifest_path: Option<PathBuf>,
    pub artifact: Option<PathBuf>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub path: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
    pub path_style: bool,
    pub canonical_ids: Vec<String>,
    pub show_progress: bool,
}

/// Fully merged settings for one publish.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub request: PublishRequest,
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: Option<String>,
    pub path_style: bool,
    pub timeout: Duration,
}

impl PublishSettings {
    /// Store configuration, or an error naming the missing credential.
    pub fn s3_config(&self) -> miette::Result<S3Config> {
        for (value, name, property) in [
            (&self.access_key, "Access key", "s3.access-key"),
            (&self.secret_key, "Secret key", "s3.secret-key"),
        ] {
            if value.trim().is_empty() {
                return Err(HaulError::Manifest {
                    message: format!("{name} is required ({property})"),
                }
                .into());
            }
        }
        Ok(S3Config::new(
            &self.request.region,
            Credentials::new(self.access_key.trim(), self.secret_key.trim()),
        )
        .with_endpoint(self.endpoint.clone())
        .with_path_style(self.path_style)
        .with_timeout(self.timeout))
    }
}

/// Outcome of [`publish`].
#[derive(Debug)]
pub enum PublishSummary {
    /// `--dry-run`: what would have been uploaded.
    Planned(PublishPlan),
    Published(PublishReceipt),
}

/// Merge `overrides` over the manifest that applies to `cwd`.
pub fn resolve_settings(cwd: &Path, overrides: &PublishOverrides) -> miette::Result<PublishSettings> {
    let (root, manifest) = load_manifest(cwd, overrides.manifest_path.as_deref())?;
    let s3 = &manifest.s3;
    if s3.timeout_secs == 0 {
        return Err(HaulError::Manifest {
            message: "s3.timeout-secs must be greater than 0".to_string(),
        }
        .into());
    }

    let artifact = match &overrides.artifact {
        Some(path) => cwd.join(path),
        None => manifest
            .artifact
            .location()
            .map(|loc| loc.resolve(&root))
            .unwrap_or_default(),
    };

    let canonical_ids = if overrides.canonical_ids.is_empty() {
        s3.canonical_ids.clone()
    } else {
        overrides.canonical_ids.clone()
    };

    Ok(PublishSettings {
        request: PublishRequest {
            bucket: pick(&overrides.bucket, &s3.bucket),
            region: pick(&overrides.region, &s3.region),
            path: pick(&overrides.path, &s3.path),
            artifact,
            canonical_ids,
            show_progress: overrides.show_progress || s3.show_progress,
        },
        access_key: pick(&overrides.access_key, &s3.access_key),
        secret_key: pick(&overrides.secret_key, &s3.secret_key),
        endpoint: non_blank(&overrides.endpoint).or_else(|| non_blank(&s3.endpoint)),
        path_style: overrides.path_style || s3.path_style,
        timeout: Duration::from_secs(s3.timeout_secs),
    })
}

/// Publish the artifact, or with `dry_run` only validate and plan it.
pub fn publish(
    cwd: &Path,
    overrides: &PublishOverrides,
    dry_run: bool,
) -> miette::Result<PublishSummary> {
    let settings = resolve_settings(cwd, overrides)?;
    let request = &settings.request;

    request.validate()?;
    if request.artifact.as_os_str().is_empty() {
        return Err(HaulError::Manifest {
            message: "No artifact configured: set [artifact] final-name in Haul.toml or pass --artifact"
                .to_string(),
        }
        .into());
    }

    if !request.canonical_ids.is_empty() && filter_principals(&request.canonical_ids).is_empty() {
        status_warn(
            "Warning",
            "all canonical IDs are blank; read access will not be granted",
        );
    }

    let plan = plan(request)?;
    if dry_run {
        status_info(
            "Would upload",
            &format!(
                "{} ({}) to {}/{}",
                plan.artifact.display(),
                human_bytes(plan.size),
                plan.bucket,
                plan.key
            ),
        );
        return Ok(PublishSummary::Planned(plan));
    }

    let client = S3Client::new(settings.s3_config()?)?;
    let publisher = ArtifactPublisher::new(client).with_progress_observer(|event| {
        status_info(
            "Progress",
            &format!(
                "{}% ({}/{} bytes)",
                event.percent, event.transferred, event.total
            ),
        );
    });

    status(
        "Uploading",
        &format!(
            "{} ({}) to {}/{}",
            plan.artifact.display(),
            human_bytes(plan.size),
            plan.bucket,
            plan.key
        ),
    );
    let receipt = publisher.publish(request)?;
    status("Published", &format!("{}/{}", receipt.bucket, receipt.key));
    if !receipt.granted.is_empty() {
        status(
            "Granted",
            &format!("read access to {} principal(s)", receipt.granted.len()),
        );
    }
    Ok(PublishSummary::Published(receipt))
}

fn load_manifest(cwd: &Path, explicit: Option<&Path>) -> miette::Result<(PathBuf, Manifest)> {
    let path = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                return Err(HaulError::Manifest {
                    message: format!("{} does not exist", path.display()),
                }
                .into());
            }
            Some(path)
        }
        None => Manifest::find(cwd),
    };

    match path {
        Some(path) => {
            tracing::debug!("Using manifest {}", path.display());
            let root = path.parent().unwrap_or(cwd).to_path_buf();
            Ok((root, Manifest::from_path(&path)?))
        }
        None => Ok((cwd.to_path_buf(), Manifest::default())),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn pick(cli: &Option<String>, file: &Option<String>) -> String {
    non_blank(cli).or_else(|| non_blank(file)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[artifact]
output-directory = "build"
final-name = "app-1.0"

[s3]
bucket = "file-bucket"
region = "eu-west-1"
path = "releases"
access-key = "AKID"
secret-key = "SECRET"
canonical-ids = ["from-file"]
"#;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Haul.toml"), MANIFEST).unwrap();
        std::fs::create_dir_all(tmp.path().join("build")).unwrap();
        std::fs::write(tmp.path().join("build/app-1.0.jar"), b"jar").unwrap();
        tmp
    }

    #[test]
    fn manifest_values_are_used_when_no_overrides() {
        let tmp = project();
        let settings = resolve_settings(tmp.path(), &PublishOverrides::default()).unwrap();
        assert_eq!(settings.request.bucket, "file-bucket");
        assert_eq!(settings.request.artifact, tmp.path().join("build/app-1.0.jar"));
        assert_eq!(settings.request.canonical_ids, vec!["from-file"]);
        assert!(!settings.request.show_progress);
    }

    #[test]
    fn overrides_win_and_blank_overrides_do_not() {
        let tmp = project();
        let overrides = PublishOverrides {
            bucket: Some("cli-bucket".to_string()),
            region: Some("  ".to_string()),
            canonical_ids: vec!["cli-id".to_string()],
            show_progress: true,
            ..Default::default()
        };
        let settings = resolve_settings(tmp.path(), &overrides).unwrap();
        assert_eq!(settings.request.bucket, "cli-bucket");
        assert_eq!(settings.request.region, "eu-west-1");
        assert_eq!(settings.request.canonical_ids, vec!["cli-id"]);
        assert!(settings.request.show_progress);
    }

    #[test]
    fn dry_run_plans_without_network() {
        let tmp = project();
        match publish(tmp.path(), &PublishOverrides::default(), true).unwrap() {
            PublishSummary::Planned(plan) => {
                assert_eq!(plan.key.as_str(), "releases/app-1.0.jar");
                assert_eq!(plan.size, 3);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_credentials_are_reported() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("app.jar"), b"x").unwrap();
        let overrides = PublishOverrides {
            artifact: Some(PathBuf::from("app.jar")),
            bucket: Some("b".to_string()),
            region: Some("us-east-1".to_string()),
            path: Some("p".to_string()),
            ..Default::default()
        };
        let err = publish(tmp.path(), &overrides, false).unwrap_err();
        assert!(err.to_string().contains("Access key is required"), "got: {err}");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Haul.toml"), "[s3]\ntimeout-secs = 0\n").unwrap();
        let err = resolve_settings(tmp.path(), &PublishOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("timeout-secs"), "got: {err}");
    }

    #[test]
    fn explicit_manifest_must_exist() {
        let tmp = TempDir::new().unwrap();
        let overrides = PublishOverrides {
            manifest_path: Some(PathBuf::from("nope/Haul.toml")),
            ..Default::default()
        };
        assert!(resolve_settings(tmp.path(), &overrides).is_err());
    }
}
