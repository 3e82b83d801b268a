//! Trackify library root.
//! Exposes the CLI parser, the high-level run() function, and the tracking
//! modules for embedding.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod tracking;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter (e.g. `trackify=debug`).
pub const LOG_ENV: &str = "TRACKIFY_LOG";

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Session => cli::commands::session::handle(cfg),
        Commands::Track { .. }
        | Commands::Click { .. }
        | Commands::Button { .. }
        | Commands::Link { .. }
        | Commands::Form { .. }
        | Commands::Hover { .. } => cli::commands::track::handle(&cli.command, cfg),
        Commands::Browse { .. } => cli::commands::browse::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Dashboard { .. } => cli::commands::dashboard::handle(&cli.command, cfg),
        Commands::Clear => cli::commands::clear::handle(cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr: `--log-level`, else `TRACKIFY_LOG`, else the config.
fn init_tracing(cli_level: Option<&str>, cfg_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cfg_level)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1) parse CLI
    let cli = Cli::parse();

    // 2) load config once
    let (mut cfg, load_error) = match Config::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // 3) logging, then report a config file we could not use
    init_tracing(cli.log_level.as_deref(), &cfg.log_level);
    if let Some(e) = load_error {
        tracing::warn!(path = %Config::config_file().display(), error = %e, "configuration unreadable, using defaults");
    }

    // 4) command-line database override
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(custom_db).to_string_lossy().to_string();
    }

    // 5) hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
