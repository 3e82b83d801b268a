//! Compare the YAML file on disk with the keys the current build knows.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Outcome of a config file check.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConfigCheck {
    /// Known keys absent from the file (their defaults apply).
    pub missing: Vec<String>,
    /// Keys in the file this build does not know.
    pub unknown: Vec<String>,
}

impl ConfigCheck {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

fn known_keys() -> AppResult<Vec<String>> {
    let defaults = serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))?;
    Ok(defaults
        .as_mapping()
        .map(|m| m.keys().filter_map(|k| k.as_str().map(str::to_string)).collect())
        .unwrap_or_default())
}

pub fn check_file(path: &Path) -> AppResult<ConfigCheck> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    check_str(&content)
}

pub fn check_str(content: &str) -> AppResult<ConfigCheck> {
    let doc: Value = if content.trim().is_empty() {
        Value::Mapping(Default::default())
    } else {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?
    };

    let Some(map) = doc.as_mapping() else {
        return Err(AppError::Config("top level is not a mapping".into()));
    };

    let present: Vec<String> = map
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect();
    let known = known_keys()?;

    Ok(ConfigCheck {
        missing: known.iter().filter(|k| !present.contains(k)).cloned().collect(),
        unknown: present.into_iter().filter(|k| !known.contains(k)).collect(),
    })
}

/// Append the missing keys with their default values; existing lines are kept.
pub fn fill_missing(path: &Path) -> AppResult<Vec<String>> {
    let report = check_file(path)?;
    if report.missing.is_empty() {
        return Ok(Vec::new());
    }

    let defaults = serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))?;
    let mut addition = serde_yaml::Mapping::new();
    if let Some(map) = defaults.as_mapping() {
        for key in &report.missing {
            if let Some(v) = map.get(key.as_str()) {
                addition.insert(Value::String(key.clone()), v.clone());
            }
        }
    }

    let mut content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&serde_yaml::to_string(&addition).map_err(|_| AppError::ConfigSave)?);
    fs::write(path, content)?;

    Ok(report.missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_and_unknown_keys() {
        let r = check_str("database: /tmp/x.sqlite\nlegacy_flag: true\n").unwrap();
        assert!(r.missing.contains(&"scroll_thresholds".to_string()));
        assert!(!r.missing.contains(&"database".to_string()));
        assert_eq!(r.unknown, vec!["legacy_flag".to_string()]);
        assert!(!r.is_clean());
    }

    #[test]
    fn full_default_file_is_clean() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(check_str(&yaml).unwrap().is_clean());
    }

    #[test]
    fn fill_missing_appends_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackify.conf");
        fs::write(&path, "top_n: 3\n").unwrap();

        let added = fill_missing(&path).unwrap();
        assert!(added.contains(&"dwell_interval_seconds".to_string()));

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.top_n, 3);
        assert!(check_file(&path).unwrap().is_clean());
    }
}
