use std::path::PathBuf;

use thiserror::Error;

/// The one failure a conversion can report.
///
/// Parsing and inline formatting are total, so this only ever comes from an
/// invalid configuration or from laying out or writing the document. No
/// output is produced alongside it.
#[derive(Error, Debug)]
#[error("Conversion failed: {cause}")]
pub struct ConversionError {
    cause: String,
}

impl ConversionError {
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// Failures inside the renderer, folded into [`ConversionError`] at the
/// crate boundary.
#[derive(Error, Debug)]
pub(crate) enum RenderError {
    #[error("layout failed: {0}")]
    Compile(String),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
    #[error("writing output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for ConversionError {
    fn from(err: RenderError) -> Self {
        ConversionError {
            cause: err.to_string(),
        }
    }
}

impl From<ConfigError> for ConversionError {
    fn from(err: ConfigError) -> Self {
        ConversionError {
            cause: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
