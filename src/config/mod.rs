use crate::errors::{AppError, AppResult};
use crate::tracking::instrument::ThresholdPolicy;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod check;

/// Environment variable that relocates the whole config directory.
pub const HOME_ENV: &str = "TRACKIFY_HOME";

pub const DEFAULT_THRESHOLDS: [u32; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
    #[serde(default = "default_thresholds")]
    pub scroll_thresholds: Vec<u32>,
    #[serde(default)]
    pub scroll_policy: ThresholdPolicy,
    #[serde(default = "default_dwell_interval")]
    pub dwell_interval_seconds: u64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_session_file() -> String {
    Config::session_file_path().to_string_lossy().to_string()
}
fn default_thresholds() -> Vec<u32> {
    DEFAULT_THRESHOLDS.to_vec()
}
fn default_dwell_interval() -> u64 {
    60
}
fn default_top_n() -> usize {
    5
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_locale() -> String {
    env::var("LANG")
        .ok()
        .and_then(|l| {
            // "it_IT.UTF-8" → "it-IT"
            let base = l.split('.').next()?.trim().replace('_', "-");
            if base.is_empty() || base == "C" || base == "POSIX" {
                None
            } else {
                Some(base)
            }
        })
        .unwrap_or_else(|| "en-US".to_string())
}
fn default_timezone() -> String {
    env::var("TZ")
        .ok()
        .map(|tz| tz.trim_start_matches(':').to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| "UTC".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            session_file: default_session_file(),
            scroll_thresholds: default_thresholds(),
            scroll_policy: ThresholdPolicy::default(),
            dwell_interval_seconds: default_dwell_interval(),
            top_n: default_top_n(),
            log_level: default_log_level(),
            locale: default_locale(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV)
            && !custom.trim().is_empty()
        {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("trackify")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".trackify")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("trackify.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("trackify.sqlite")
    }

    /// Durable storage of the session identity token
    pub fn session_file_path() -> PathBuf {
        Self::config_dir().join("session_id")
    }

    /// Load configuration from file, or return defaults if not found.
    /// A broken file is an error here; the caller reports it and falls back
    /// to defaults once logging is up, since tracking must still start.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let mut cfg: Config =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Expand `~` in paths, sort and dedupe thresholds (1..=100), keep intervals positive.
    pub fn normalize(&mut self) {
        self.database = expand_tilde(&self.database).to_string_lossy().to_string();
        self.session_file = expand_tilde(&self.session_file).to_string_lossy().to_string();

        let mut t: Vec<u32> = self
            .scroll_thresholds
            .iter()
            .copied()
            .filter(|v| (1..=100).contains(v))
            .collect();
        t.sort_unstable();
        t.dedup();
        if t.is_empty() {
            t = default_thresholds();
        }
        self.scroll_thresholds = t;

        if self.dwell_interval_seconds == 0 {
            self.dwell_interval_seconds = default_dwell_interval();
        }
        if self.top_n == 0 {
            self.top_n = default_top_n();
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// A `--db` value: absolute paths as given, bare names inside the config directory.
    pub fn resolve_database(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => Self::resolve_database(&name),
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save_to(&Self::config_file())?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.scroll_thresholds, vec![25, 50, 75, 100]);
        assert_eq!(cfg.dwell_interval_seconds, 60);
        assert_eq!(cfg.top_n, 5);
    }

    #[test]
    fn normalize_sorts_and_filters_thresholds() {
        let mut cfg = Config {
            scroll_thresholds: vec![75, 0, 25, 150, 25, 50],
            dwell_interval_seconds: 0,
            ..Config::default()
        };
        cfg.normalize();
        assert_eq!(cfg.scroll_thresholds, vec![25, 50, 75]);
        assert_eq!(cfg.dwell_interval_seconds, 60);
    }

    #[test]
    fn load_from_reports_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackify.conf");
        fs::write(&path, "scroll_thresholds: [oops").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackify.conf");
        let cfg = Config {
            dwell_interval_seconds: 15,
            scroll_thresholds: vec![10, 90],
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        let back = Config::load_from(&path).unwrap();
        assert_eq!(back.dwell_interval_seconds, 15);
        assert_eq!(back.scroll_thresholds, vec![10, 90]);
    }
}
