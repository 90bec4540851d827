use crate::error::{PatchnovaError, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use dirs::config_dir;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub updates: UpdatesConfig,
    pub versions: VersionsConfig,
    pub inventory: InventoryConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for both log files; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub history_file: String,
    pub error_file: String,
    /// Size cap per file in bytes; 0 disables rotation
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            history_file: "update_history.log".to_string(),
            error_file: "error_log.log".to_string(),
            max_bytes: 1024 * 1024,
            backups: 5,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        match self.directory.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => PathBuf::from("."),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UpdatesConfig {
    /// Helper prefixed to Linux package-manager commands; empty to disable
    pub elevate_with: String,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            elevate_with: "sudo".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VersionOrdering {
    /// Numeric segments compare as numbers ("9" < "10")
    #[default]
    Natural,
    /// Plain string comparison ("9" > "10")
    Lexicographic,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VersionsConfig {
    pub ordering: VersionOrdering,
}

/// Where the name and version live in a listing tool's output
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListingLayout {
    pub program: String,
    pub args: Vec<String>,
    /// Header/banner lines dropped before parsing
    #[serde(default)]
    pub skip_lines: usize,
    pub name_column: usize,
    pub version_column: usize,
    /// Lines with fewer whitespace-separated fields are skipped
    pub min_fields: usize,
    /// Lines with more fields are skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fields: Option<usize>,
}

impl ListingLayout {
    pub fn dpkg() -> Self {
        Self {
            program: "dpkg".to_string(),
            args: vec!["-l".to_string()],
            skip_lines: 5,
            name_column: 1,
            version_column: 2,
            min_fields: 3,
            max_fields: None,
        }
    }

    pub fn rpm() -> Self {
        Self {
            program: "rpm".to_string(),
            args: vec![
                "-qa".to_string(),
                "--qf".to_string(),
                "%{NAME} %{VERSION}-%{RELEASE}\\n".to_string(),
            ],
            skip_lines: 0,
            name_column: 0,
            version_column: 1,
            min_fields: 2,
            max_fields: None,
        }
    }

    pub fn pacman() -> Self {
        Self {
            program: "pacman".to_string(),
            args: vec!["-Q".to_string()],
            skip_lines: 0,
            name_column: 0,
            version_column: 1,
            min_fields: 2,
            max_fields: None,
        }
    }

    pub fn brew() -> Self {
        Self {
            program: "brew".to_string(),
            args: vec!["list".to_string(), "--versions".to_string()],
            skip_lines: 0,
            name_column: 0,
            version_column: 1,
            min_fields: 2,
            max_fields: None,
        }
    }

    pub fn choco() -> Self {
        Self {
            program: "choco".to_string(),
            args: vec!["list".to_string(), "--local-only".to_string()],
            skip_lines: 1,
            name_column: 0,
            version_column: 1,
            min_fields: 2,
            max_fields: Some(2),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    /// Debian and Ubuntu derivatives
    #[serde(alias = "linux")]
    pub apt: ListingLayout,
    /// Fedora and CentOS derivatives
    pub dnf: ListingLayout,
    pub pacman: ListingLayout,
    pub macos: ListingLayout,
    pub windows: ListingLayout,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            apt: ListingLayout::dpkg(),
            dnf: ListingLayout::rpm(),
            pacman: ListingLayout::pacman(),
            macos: ListingLayout::brew(),
            windows: ListingLayout::choco(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    config_dir()
        .map(|p| p.join("patchnova/config.toml"))
        .unwrap_or_else(|| "patchnova.toml".into())
}

/// Load a config file; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_data = fs::read_to_string(path)?;
    parse_config(&config_data)
}

pub fn parse_config(config_data: &str) -> Result<Config> {
    let config: Config = toml::de::from_str(config_data)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    for (family, layout) in [
        ("apt", &config.inventory.apt),
        ("dnf", &config.inventory.dnf),
        ("pacman", &config.inventory.pacman),
        ("macos", &config.inventory.macos),
        ("windows", &config.inventory.windows),
    ] {
        let needed = layout.name_column.max(layout.version_column) + 1;
        if layout.min_fields < needed {
            return Err(PatchnovaError::Config(format!(
                "inventory.{}: min_fields must be at least {}",
                family, needed
            )));
        }
        if layout.max_fields.is_some_and(|max| max < layout.min_fields) {
            return Err(PatchnovaError::Config(format!(
                "inventory.{}: max_fields is below min_fields",
                family
            )));
        }
    }
    Ok(())
}

/// Write the config back, creating its directory when needed
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}
