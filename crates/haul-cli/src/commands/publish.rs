//! Handler for `haul publish`.

use miette::Result;

use haul_ops::ops_publish::{self, PublishOverrides, PublishSummary};
use haul_util::errors::HaulError;

use crate::cli::PublishArgs;

pub fn exec(args: PublishArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(HaulError::Io)?;
    let overrides = PublishOverrides {
        manifest_path: args.manifest,
        artifact: args.artifact,
        bucket: args.bucket,
        region: args.region,
        path: args.path,
        access_key: args.access_key,
        secret_key: args.secret_key,
        endpoint: args.endpoint,
        path_style: args.path_style,
        canonical_ids: args.canonical_ids,
        show_progress: args.show_progress,
    };

    match ops_publish::publish(&cwd, &overrides, args.dry_run)? {
        PublishSummary::Planned(plan) => println!("{}", plan.key),
        PublishSummary::Published(receipt) => println!("{}", receipt.key),
    }
    Ok(())
}
