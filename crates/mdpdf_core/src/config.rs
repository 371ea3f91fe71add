use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ConfigError;
use crate::style::{DEFAULT_BODY_SIZE, DEFAULT_HEADING_SIZE};

/// Environment variables read by [`Config::with_env_overrides`].
pub const ENV_MARGIN: &str = "PDF_MARGIN";
pub const ENV_BODY_SIZE: &str = "PDF_FONT_SIZE_NORMAL";
pub const ENV_HEADING_SIZE: &str = "PDF_FONT_SIZE_HEADER";

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Width of an A4 page in millimetres; margins must leave room inside it.
const A4_WIDTH_MM: f64 = 210.0;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Applied to all four sides.
    pub margin_mm: f64,
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            margin_mm: 30.0,
            numbers: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Size of paragraph, list and quote text in points.
    pub body_size: f64,
    /// Size of level-1 headings in points; lower levels scale with it.
    pub heading_size: f64,
    /// Also search installed system fonts. Off by default so that output
    /// does not depend on the machine.
    pub system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            body_size: DEFAULT_BODY_SIZE,
            heading_size: DEFAULT_HEADING_SIZE,
            system_fonts: false,
        }
    }
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        // default_config.toml is validated by build.rs
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled default if the
    /// file does not exist. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PDF_MARGIN`, `PDF_FONT_SIZE_NORMAL` and `PDF_FONT_SIZE_HEADER`
    /// from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &'static str| -> Result<Option<f64>, ConfigError> {
            lookup(key)
                .map(|raw| {
                    raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                        key,
                        value: raw.clone(),
                    })
                })
                .transpose()
        };

        if let Some(margin) = number(ENV_MARGIN)? {
            self.page.margin_mm = margin;
        }
        if let Some(size) = number(ENV_BODY_SIZE)? {
            self.font.body_size = size;
        }
        if let Some(size) = number(ENV_HEADING_SIZE)? {
            self.font.heading_size = size;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject sizes that cannot produce a page.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let margin = self.page.margin_mm;
        if !margin.is_finite() || margin < 0.0 || margin * 2.0 >= A4_WIDTH_MM {
            return Err(ConfigError::InvalidValue {
                key: "page.margin_mm",
                value: margin.to_string(),
            });
        }
        for (key, size) in [
            ("font.body_size", self.font.body_size),
            ("font.heading_size", self.font.heading_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: size.to_string(),
                });
            }
        }
        Ok(())
    }
}
