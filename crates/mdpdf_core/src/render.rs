use std::io::Write;
use std::path::Path;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

use crate::config::FontConfig;
use crate::error::{ConversionError, RenderError};

// Bundled sans faces, used whenever Helvetica is not installed
static DEJAVU_SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../fonts/DejaVuSans-Bold.ttf");
static DEJAVU_SANS_OBLIQUE: &[u8] = include_bytes!("../fonts/DejaVuSans-Oblique.ttf");
static DEJAVU_SANS_BOLD_OBLIQUE: &[u8] = include_bytes!("../fonts/DejaVuSans-BoldOblique.ttf");

/// A laid-out, paginated document ready to be serialised.
pub struct Document {
    inner: PagedDocument,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.inner.pages.len()
    }

    /// Serialise to PDF bytes.
    ///
    /// The default options carry no timestamp and derive the document
    /// identifier from its content, so equal documents give equal bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ConversionError> {
        Ok(self.serialize()?)
    }

    /// Serialise and write the whole PDF to `sink`. Nothing is written if
    /// serialisation fails.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(), ConversionError> {
        let bytes = self.serialize()?;
        sink.write_all(&bytes).map_err(RenderError::from)?;
        sink.flush().map_err(RenderError::from)?;
        Ok(())
    }

    /// Write the PDF to `path` through a temporary file in the same
    /// directory, replacing `path` only once all bytes are on disk.
    pub fn persist(&self, path: &Path) -> Result<(), ConversionError> {
        Ok(self.persist_inner(path)?)
    }

    fn serialize(&self) -> Result<Vec<u8>, RenderError> {
        typst_pdf::pdf(&self.inner, &PdfOptions::default()).map_err(|errors| {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            RenderError::Pdf(messages.join("; "))
        })
    }

    fn persist_inner(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.serialize()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| RenderError::Io(e.error))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote PDF");
        Ok(())
    }
}

/// Lay out Typst markup into pages.
pub(crate) fn compile(markup: String, fonts: &FontConfig) -> Result<Document, RenderError> {
    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(fonts.system_fonts);

    let engine = TypstEngine::builder()
        .main_file(markup)
        .fonts([
            DEJAVU_SANS,
            DEJAVU_SANS_BOLD,
            DEJAVU_SANS_OBLIQUE,
            DEJAVU_SANS_BOLD_OBLIQUE,
        ])
        .search_fonts_with(font_options)
        .build();

    let compiled = engine.compile();
    let output: Result<PagedDocument, _> = compiled.output;
    for warning in &compiled.warnings {
        tracing::debug!(message = %warning.message, "Typst warning");
    }

    let inner = output.map_err(|e| RenderError::Compile(format!("{e:?}")))?;
    tracing::debug!(pages = inner.pages.len(), "Laid out document");
    Ok(Document { inner })
}
