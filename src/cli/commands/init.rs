use crate::cli::parser::Cli;
use crate::cli::commands::audit;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1) CONFIGURATION
    //
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let path = Config::config_file();

    println!("⚙️  Initializing Trackify…");
    if cli.test {
        println!("📄 Config file : (test mode, not written)");
    } else {
        println!("📄 Config file : {}", path.display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    //
    // 2) DATABASE (tables + migrations)
    //
    DbPool::open(&cfg.database)?;
    success(format!("Database initialized at {}", &cfg.database));

    //
    // 3) INTERNAL LOG (non blocking)
    //
    audit(
        &cfg,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 Trackify initialization completed!");
    Ok(())
}
