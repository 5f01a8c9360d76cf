//! CLI argument definitions for haul.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "haul",
    version,
    about = "Publish a build artifact to an S3 bucket",
    long_about = "haul uploads a single build output to an S3 (or S3-compatible) bucket \
                  under a key prefix and can grant read access on it to canonical user IDs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload the artifact and apply read grants
    Publish(PublishArgs),

    /// Show entries from .haul.env
    Env {
        /// Print secret values instead of masking them
        #[arg(long)]
        reveal: bool,
    },
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Path to Haul.toml (default: searched from the current directory up)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Artifact to upload, overriding [artifact] in Haul.toml
    #[arg(long, value_name = "PATH")]
    pub artifact: Option<PathBuf>,

    /// Target bucket
    #[arg(long, env = "HAUL_S3_BUCKET")]
    pub bucket: Option<String>,

    /// Bucket region
    #[arg(long, env = "HAUL_S3_REGION")]
    pub region: Option<String>,

    /// Key prefix the artifact is stored under
    #[arg(long, env = "HAUL_S3_PATH")]
    pub path: Option<String>,

    /// Access key ID
    #[arg(long, env = "HAUL_S3_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, env = "HAUL_S3_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Custom S3-compatible endpoint, e.g. http://localhost:9000
    #[arg(long, env = "HAUL_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Address the bucket in the URL path instead of the host name
    #[arg(long)]
    pub path_style: bool,

    /// Canonical user ID to grant read access (repeatable)
    #[arg(long = "canonical-id", value_name = "ID")]
    pub canonical_ids: Vec<String>,

    /// Log upload progress every 10%
    #[arg(long)]
    pub show_progress: bool,

    /// Validate settings and print the object key without uploading
    #[arg(long)]
    pub dry_run: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
