//! Writing itineraries out as Markdown, HTML or PDF.

pub mod markdown;
pub mod pdf;

pub use markdown::write_markdown;
pub use pdf::PdfExporter;

/// Export error types
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("wkhtmltopdf not found in PATH")]
    ConverterNotFound,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
