use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FigdomError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.figma.com";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub images: ImagesConfig,
    pub output: OutputConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub prefer_component_images: bool,
    /// Pre-rendered images for library components, keyed by component name.
    pub component_images: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub save_document: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "index.html".to_string(),
            save_document: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub unwrap_types: Vec<String>,
    pub drop_names: Vec<String>,
    pub drop_hidden: bool,
    pub image_src_prefix: Option<String>,
    pub loops: Vec<LoopConfig>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            unwrap_types: vec!["GROUP".to_string()],
            drop_names: Vec::new(),
            drop_hidden: true,
            image_src_prefix: None,
            loops: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// `data-name` of the node rendered once as the loop body.
    pub name: String,
    pub open: String,
    pub close: String,
}

impl Config {
    /// `~/.config/figdom/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config/figdom/config.toml"))
    }

    /// Load from an explicit path, else the central path if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path() {
                Some(central) if central.is_file() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw).map_err(|e| {
            FigdomError::Config(format!("config file {}: {}", path.display(), e))
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| FigdomError::Config(format!("invalid TOML: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.timeout == 0 {
            return Err(FigdomError::Config(
                "api.timeout must be greater than zero".to_string(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(FigdomError::Config(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(FigdomError::Config(
                "output.file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
