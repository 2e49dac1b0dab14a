#![allow(missing_docs)]
//! Engine API execution bridge

use color_eyre::eyre::{Result, eyre};
use evmbridge_cli::{
    args::{Args, Commands},
    cmd::{init::InitCmd, start::StartCmd},
    config::{self, LoggingConfig},
    logging, runtime,
};
use tracing::{info, trace};

/// Main entry point for the application
///
/// This function:
/// - Parses command-line arguments
/// - Initializes logging and error reporting
/// - Loads the configuration file
/// - Runs the selected command
fn main() -> Result<()> {
    color_eyre::install()?;

    install_tracing_panic_hook();

    let args = Args::new();

    // The configuration file is read before logging starts so its logging section applies;
    // command-line flags override it.
    let config_file = args
        .get_config_file_path()
        .map_err(|error| eyre!("Failed to get configuration file path: {error}"))?;
    let file_config = match &args.command {
        Commands::Start(_) => Some(
            config::load_config(&config_file)
                .map_err(|error| eyre!("Failed to load configuration file: {error}"))?,
        ),
        Commands::Init(_) => None,
    };

    let mut logging = file_config.as_ref().map(|c| c.logging).unwrap_or_default();
    if let Some(log_level) = args.log_level {
        logging.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        logging.log_format = log_format;
    }

    // This is a drop guard responsible for flushing any remaining logs when the program terminates.
    // It must be assigned to a binding that is not _, as _ will result in the guard being dropped
    // immediately.
    let _guard = logging::init(logging.log_level, logging.log_format);

    trace!("Command-line parameters: {args:?}");

    match (&args.command, file_config) {
        (Commands::Start(cmd), Some(config)) => start(&args, cmd, config, logging),
        (Commands::Init(cmd), _) => init(&args, cmd, logging),
        (Commands::Start(_), None) => Err(eyre!("No configuration loaded")),
    }
}

fn install_tracing_panic_hook() {
    use std::panic;

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let msg: &str = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "panic"
        };

        let bt = std::backtrace::Backtrace::force_capture();
        tracing::error!(target = "panic", %location, message = %msg, backtrace = %format!("{bt}"), "panic occurred");

        default_hook(info);
    }));
}

fn start(
    args: &Args,
    cmd: &StartCmd,
    mut config: config::Config,
    logging: LoggingConfig,
) -> Result<()> {
    config.logging = logging;

    let rt = runtime::build_runtime(config.runtime)?;

    info!(
        file = %args.get_config_file_path().unwrap_or_default().display(),
        "Loaded configuration",
    );
    trace!(?config, "Configuration");

    rt.block_on(cmd.run(config)).map_err(|error| eyre!("Failed to run the bridge: {error}"))
}

fn init(args: &Args, cmd: &InitCmd, logging: LoggingConfig) -> Result<()> {
    cmd.run(&args.get_config_file_path()?, logging)
        .map_err(|error| eyre!("Failed to run init command {error:?}"))
}
