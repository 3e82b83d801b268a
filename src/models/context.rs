use serde::{Deserialize, Serialize};

/// Device metadata merged into every event under `deviceInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub user_agent: String,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub platform: String,
}

/// Locale metadata merged into every event under `locationInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationInfo {
    pub time_zone: String,
    pub language: String,
}

/// What the host knows about the client the events come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientContext {
    pub device: DeviceInfo,
    pub location: LocationInfo,
}

impl ClientContext {
    /// Context of the terminal the CLI runs in.
    ///
    /// Screen and viewport are the terminal size from `COLUMNS`/`LINES`
    /// (80x24 when not exported).
    pub fn detect(locale: &str, time_zone: &str) -> Self {
        let columns = env_dimension("COLUMNS").unwrap_or(80);
        let lines = env_dimension("LINES").unwrap_or(24);

        Self {
            device: DeviceInfo {
                user_agent: format!(
                    "{}/{} ({}; {})",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION"),
                    std::env::consts::OS,
                    std::env::consts::ARCH
                ),
                language: locale.to_string(),
                screen_width: columns,
                screen_height: lines,
                viewport_width: columns,
                viewport_height: lines,
                platform: std::env::consts::OS.to_string(),
            },
            location: LocationInfo {
                time_zone: time_zone.to_string(),
                language: locale.to_string(),
            },
        }
    }
}

fn env_dimension(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.trim().parse().ok()
}
