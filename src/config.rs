use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "ev-dashboard.json";
/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "EV_DASHBOARD_DATA";
pub const DEFAULT_DATA_PATH: &str = "Electric_Vehicle_Population_Data.csv";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Precedence: CLI argument > env var > config file > defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl DashboardConfig {
    /// Read the config file (if present), then apply env and CLI overrides.
    pub fn load() -> Result<Self> {
        let file_text = read_optional(Path::new(CONFIG_FILE))?;
        let env_path = std::env::var(DATA_PATH_ENV).ok();
        let cli_path = std::env::args().nth(1);
        Self::resolve(file_text.as_deref(), env_path, cli_path)
    }

    /// Merge the individual sources; pure so it can be tested.
    pub fn resolve(
        file_text: Option<&str>,
        env_path: Option<String>,
        cli_path: Option<String>,
    ) -> Result<Self> {
        let mut config = match file_text {
            Some(text) => serde_json::from_str(text)
                .with_context(|| format!("parsing {CONFIG_FILE}"))?,
            None => DashboardConfig::default(),
        };

        if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = cli_path.filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}
