use miette::Result;

use haul_ops::ops_env::{list_env, mask};
use haul_util::errors::HaulError;

pub fn exec(reveal: bool) -> Result<()> {
    let cwd = std::env::current_dir().map_err(HaulError::Io)?;
    let listing = list_env(&cwd)?;

    if listing.entries.is_empty() {
        println!("No environment variables configured.");
        println!("  .haul.env: {}", listing.path.display());
        return Ok(());
    }

    println!(".haul.env ({} entries):", listing.entries.len());
    for (key, value) in &listing.entries {
        let display_value = if reveal { value.clone() } else { mask(value) };
        println!("  {key} = {display_value}");
    }

    Ok(())
}
