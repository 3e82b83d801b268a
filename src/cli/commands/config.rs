use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::check::{check_file, fill_missing};
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        fix,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        //
        // 1) PRINT
        //
        if *print_config {
            ConfigLogic::print(&path, cfg)?;
        }

        //
        // 2) CHECK (and optionally fill in defaults)
        //
        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; run `trackify init` to create one.",
                    path.display()
                ));
            } else {
                let report = check_file(&path)?;
                if report.is_clean() {
                    success("Configuration file is complete.");
                }
                for key in &report.unknown {
                    warning(format!("Unknown key '{key}' (ignored)"));
                }
                if !report.missing.is_empty() {
                    if *fix {
                        let added = fill_missing(&path)?;
                        success(format!("Added {} missing key(s): {}", added.len(), added.join(", ")));
                    } else {
                        for key in &report.missing {
                            info(format!("Missing key '{key}' (default applies)"));
                        }
                    }
                }
            }
        }

        //
        // 3) EDIT
        //
        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
