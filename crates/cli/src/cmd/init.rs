use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{self, eyre};
use tracing::{info, warn};

use crate::{
    config::{Config, LoggingConfig},
    file::save_config,
};

#[derive(Parser, Debug, Clone, Default, PartialEq)]
pub struct InitCmd {
    /// Overwrite an existing configuration file
    #[clap(long)]
    pub overwrite: bool,
}

impl InitCmd {
    pub fn run(&self, config_file: &Path, logging: LoggingConfig) -> eyre::Result<()> {
        if config_file.exists() && !self.overwrite {
            warn!(
                file = %config_file.display(),
                "Configuration file already exists, pass --overwrite to replace it"
            );
            return Ok(());
        }

        let config = Config { logging, ..Config::default() };
        save_config(config_file, &config)
            .map_err(|e| eyre!("Failed to write configuration file: {e}"))?;

        info!(file = %config_file.display(), "Wrote configuration");
        Ok(())
    }
}
