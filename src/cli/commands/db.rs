use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::maintenance::{check_health, vacuum};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Maintenance on the configured database. Steps run in a fixed order over one connection.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum: compact,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *compact || *show_info) {
        info("Nothing to do: pass --migrate, --check, --vacuum or --info.");
        return Ok(());
    }

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        let applied = run_pending_migrations(&pool.conn)?;
        if applied.is_empty() {
            success("Schema already up to date.");
        } else {
            for id in &applied {
                info(format!("applied {id}"));
            }
            success(format!("{} migration(s) applied.", applied.len()));
        }
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        let report = check_health(&pool.conn)?;
        if report.integrity.is_empty() {
            success("Integrity check passed.");
        }
        for problem in &report.integrity {
            warning(format!("Integrity: {problem}"));
        }
        if report.unknown_types > 0 {
            warning(format!("{} row(s) with an unknown event type", report.unknown_types));
        }
        if report.bad_data > 0 {
            warning(format!("{} row(s) with unreadable event data", report.bad_data));
        }
    }

    if *compact {
        let (before, after) = vacuum(&pool.conn)?;
        success(format!("Vacuum completed ({before} → {after} pages)."));
    }

    Ok(())
}
