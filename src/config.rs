use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Top-level configuration. Every field has a default, so a partial
/// `dashboard.toml` only overrides the keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file with the integrity scores.
    pub data_path: PathBuf,
    pub columns: ColumnMapping,
    pub export: ExportConfig,
    pub chart: ChartConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("github/integridad.csv"),
            columns: ColumnMapping::default(),
            export: ExportConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

/// Source header names of the three required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub institution: String,
    pub program: String,
    pub score: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            institution: "Universidad".to_string(),
            program: "Licenciatura".to_string(),
            score: "Integridad Académica".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Required columns in the order they are reported when missing.
    pub fn required(&self) -> [&str; 3] {
        [
            self.institution.as_str(),
            self.program.as_str(),
            self.score.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name offered by the save dialog.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "grafica_integridad.png".to_string(),
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Average bars sharing a program label instead of one bar per row.
    pub average_duplicates: bool,
}

impl DashboardConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `dashboard.toml` from the working directory, falling back to
    /// the defaults (with a logged error) when it cannot be parsed.
    pub fn load() -> Self {
        match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}; using default configuration");
                Self::default()
            }
        }
    }
}
