use std::fs;
use std::path::Path;

use ambit_common::{info, success};

use super::discover::OUTPUT_BASE;

/// Removes the artifacts of previous runs.
pub fn clean() -> anyhow::Result<()> {
    let base = Path::new(OUTPUT_BASE);
    if !base.exists() {
        info!("nothing to clean");
        return Ok(());
    }

    fs::remove_dir_all(base)?;
    success!("removed {}", base.display());
    Ok(())
}
