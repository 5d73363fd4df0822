use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};

pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 64;
pub const DEFAULT_LABEL: &str = "canvas texture";

/// Serializable part of the canvas texture options.
///
/// ```toml
/// width = 128
/// height = 32
/// visible = true
/// label = "water ripples"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub visible: bool,
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            visible: false,
            label: default_label(),
        }
    }
}

impl CanvasConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: CanvasConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CanvasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::Invalid(format!(
                "surface dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.label.trim().is_empty() {
            return Err(CanvasError::Invalid("label must not be empty".into()));
        }
        Ok(())
    }
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}
