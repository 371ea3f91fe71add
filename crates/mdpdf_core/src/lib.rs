//! Markdown to PDF conversion in the style of a light editor preview theme.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`parse`] splits the source into [`Block`]s, one line at a time.
//! 2. [`format_blocks`] applies inline formatting and assigns each block a
//!    [`StyleId`].
//! 3. The [`StyleRegistry`] resolves style ids into fixed visual attributes.
//! 4. [`render()`] lays the elements out on A4 pages and returns a
//!    [`Document`] that can be written as PDF.
//!
//! Conversions share nothing but the read-only reference registry, so any
//! number of them may run in parallel.

mod block;
mod config;
mod element;
mod error;
mod inline;
mod parser;
mod render;
mod style;
mod typst;

use std::io::Write;
use std::path::Path;

pub use block::{Block, RichText, Span, SpanKind};
pub use config::{Config, ENV_BODY_SIZE, ENV_HEADING_SIZE, ENV_MARGIN, FontConfig, PageConfig};
pub use element::{Content, FormattedElement, format_blocks};
pub use error::{ConfigError, ConversionError};
pub use inline::format as format_inline;
pub use render::Document;
pub use style::{Border, BorderSide, Color, Font, StyleDescriptor, StyleId, StyleRegistry};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let blocks = parser::parse(markdown);
    tracing::debug!(blocks = blocks.len(), "Parsed markdown");
    blocks
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let elements = format_blocks(&parse(markdown));
    elements_to_typst(&elements, config)
}

/// Lay out formatted elements into pages. The configuration is validated
/// first, so out-of-range margins or sizes never reach the layout engine.
pub fn render(
    elements: &[FormattedElement],
    config: &Config,
) -> Result<Document, ConversionError> {
    config.validate()?;
    let markup = elements_to_typst(elements, config);
    Ok(render::compile(markup, &config.font)?)
}

/// Parse, format and lay out a markdown document.
pub fn compile(markdown: &str, config: &Config) -> Result<Document, ConversionError> {
    render(&format_blocks(&parse(markdown)), config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, ConversionError> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(
    markdown: &str,
    config: &Config,
) -> Result<Vec<u8>, ConversionError> {
    compile(markdown, config)?.to_pdf()
}

/// Convert markdown and write the PDF to `sink`.
pub fn convert<W: Write>(
    markdown: &str,
    config: &Config,
    sink: &mut W,
) -> Result<(), ConversionError> {
    compile(markdown, config)?.write_to(sink)
}

/// Convert markdown and write the PDF to `path`. On failure `path` is left
/// untouched.
pub fn convert_to_path(
    markdown: &str,
    config: &Config,
    path: &Path,
) -> Result<(), ConversionError> {
    compile(markdown, config)?.persist(path)
}

fn elements_to_typst(elements: &[FormattedElement], config: &Config) -> String {
    let registry = StyleRegistry::for_sizes(config.font.body_size, config.font.heading_size);
    typst::elements_to_typst(elements, &registry, &config.page)
}
