//! Command-line interface.
//!
//! The configuration file defaults to `$HOME/.evmbridge/config/config.toml`;
//! `--home` moves the whole directory and `--config` points at a single file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::{
    cmd::{init::InitCmd, start::StartCmd},
    config::{LogFormat, LogLevel},
    error::Error,
};

const APP_FOLDER: &str = ".evmbridge";
const CONFIG_FILE: &str = "config.toml";

#[derive(Parser, Clone, Debug, PartialEq)]
#[command(version, about = "Engine API execution bridge", long_about = None)]
pub struct Args {
    /// Home directory (default: `$HOME/.evmbridge`)
    #[arg(long, global = true, value_name = "HOME_DIR")]
    pub home: Option<PathBuf>,

    /// Configuration file (default: `<home>/config/config.toml`)
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log format, overriding the configuration file
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Connect to the execution engine and serve the driver RPC
    Start(StartCmd),

    /// Write a default configuration file
    Init(InitCmd),
}

impl Args {
    pub fn new() -> Args {
        Args::parse()
    }

    pub fn get_home_dir(&self) -> Result<PathBuf, Error> {
        match &self.home {
            Some(dir) => Ok(dir.clone()),
            None => std::env::var_os("HOME")
                .map(|home| Path::new(&home).join(APP_FOLDER))
                .ok_or(Error::HomeDir),
        }
    }

    pub fn get_config_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.get_home_dir()?.join("config"))
    }

    pub fn get_config_file_path(&self) -> Result<PathBuf, Error> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(self.get_config_dir()?.join(CONFIG_FILE)),
        }
    }
}
