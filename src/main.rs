mod cli;

use clap::Parser;
use cli::opts::{Cli, Commands};
use cortxfs_hist::config::Config;
use cortxfs_hist::constants::DEFAULT_CONFIG_PATH;
use cortxfs_hist::error::{self, Result};
use cortxfs_hist::logging;
use log::debug;
use std::path::Path;
use std::process::ExitCode;

/// Initialize simple console logging for init/completions commands
fn init_simple_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<()> {
    match &args.command {
        Some(Commands::Init { output, force }) => {
            init_simple_logging(args.verbose, args.quiet);
            cli::init::handle_init(output, *force)
        }
        Some(Commands::Completions { shell }) => {
            Cli::generate_completions(*shell);
            Ok(())
        }
        Some(Commands::Validate) => {
            let mut cfg = load_config(&args.config)?;
            cfg.validate()?;
            logging::override_level(&mut cfg.logging, args.verbose, args.quiet);
            logging::init_logging(&cfg.logging)?;
            cli::validate::handle_validate(&cfg)?;
            eprintln!("Configuration validation passed");
            Ok(())
        }
        None => {
            let mut cfg = load_config(&args.config)?;
            let report_cfg = args.report.resolve(&mut cfg)?;
            cfg.validate()?;
            logging::override_level(&mut cfg.logging, args.verbose, args.quiet);
            logging::init_logging(&cfg.logging)?;
            debug!("Using configuration: {cfg:?}");
            cli::run::handle_run(&cfg, &report_cfg)
        }
    }
}

/// 加载配置文件；文件不存在时使用默认配置
fn load_config(config_path: &str) -> Result<Config> {
    let path = Path::new(config_path);
    match Config::from_file(path) {
        Ok(c) => Ok(c),
        Err(error::Error::Config(error::ConfigError::NotFound(_))) => {
            if config_path != DEFAULT_CONFIG_PATH {
                eprintln!(
                    "Configuration file not found: {config_path}, using default configuration"
                );
                eprintln!("Tip: run 'cortxfs-hist init' to generate a configuration file");
            }
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}
