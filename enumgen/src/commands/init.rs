//! Init command - initializes enumgen.toml configuration.

use crate::cli::{Cli, InitArgs};
use enumgen_core::config::{CONFIG_FILE_NAME, EnumgenConfig};
use enumgen_core::error::{EnumgenError, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Runs the init command.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        error!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
        return Err(EnumgenError::config(format!(
            "{} already exists",
            CONFIG_FILE_NAME
        )));
    }

    fs::write(config_path, EnumgenConfig::template())?;
    info!("Created {}", CONFIG_FILE_NAME);

    info!("Next steps:");
    info!("  1. List your types under [generate] types in {}", CONFIG_FILE_NAME);
    info!("  2. Run 'enumgen' in the package directory");

    Ok(())
}
