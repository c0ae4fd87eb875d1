//! HTML and PDF export.
//!
//! The itinerary is rendered into a standalone HTML document with an embedded
//! Tera template, then converted with `wkhtmltopdf` when it is installed.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use super::ExportError;
use crate::render;
use crate::types::Itinerary;

const TEMPLATE_NAME: &str = "itinerary.html";

#[derive(Clone, Debug)]
pub struct PdfExporter {
    tera: Tera,
    wkhtmltopdf_path: Option<PathBuf>,
}

impl PdfExporter {
    /// Load the embedded template and look for `wkhtmltopdf` in `PATH`.
    pub fn new() -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            TEMPLATE_NAME,
            include_str!("../../templates/itinerary.html.tera"),
        )
        .map_err(|e| ExportError::Template(e.to_string()))?;

        let wkhtmltopdf_path = which::which("wkhtmltopdf").ok();
        match &wkhtmltopdf_path {
            Some(path) => info!(path = %path.display(), "wkhtmltopdf found"),
            None => warn!("wkhtmltopdf not found in PATH - only HTML export is available"),
        }

        Ok(Self {
            tera,
            wkhtmltopdf_path,
        })
    }

    /// Use a specific converter binary, or none to disable PDF output.
    pub fn with_converter(mut self, path: Option<PathBuf>) -> Self {
        self.wkhtmltopdf_path = path;
        self
    }

    pub fn can_convert(&self) -> bool {
        self.wkhtmltopdf_path.is_some()
    }

    /// Standalone HTML document for the itinerary.
    pub fn render_html(&self, itinerary: &Itinerary) -> Result<String, ExportError> {
        let mut context = Context::new();
        context.insert("title", &itinerary.title());
        context.insert("day_count", &itinerary.days().len());
        context.insert("body", &render::itinerary_html(itinerary));

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ExportError::Template(e.to_string()))
    }

    pub fn write_html(&self, path: impl AsRef<Path>, itinerary: &Itinerary) -> Result<(), ExportError> {
        let path = path.as_ref();
        std::fs::write(path, self.render_html(itinerary)?)?;
        info!(path = %path.display(), "HTML itinerary written");
        Ok(())
    }

    /// Render to PDF at `path`. Fails with [`ExportError::ConverterNotFound`]
    /// when no converter is available.
    pub async fn write_pdf(&self, path: impl AsRef<Path>, itinerary: &Itinerary) -> Result<(), ExportError> {
        let converter = self
            .wkhtmltopdf_path
            .as_ref()
            .ok_or(ExportError::ConverterNotFound)?;
        let html = self.render_html(itinerary)?;

        let workdir = tempfile::tempdir()?;
        let html_path = workdir.path().join("itinerary.html");
        tokio::fs::write(&html_path, html).await?;

        let output = Command::new(converter)
            .arg("--page-size")
            .arg("A4")
            .arg("--margin-top")
            .arg("10mm")
            .arg("--margin-bottom")
            .arg("10mm")
            .arg("--encoding")
            .arg("utf-8")
            .arg("--quiet")
            .arg(&html_path)
            .arg(path.as_ref())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "wkhtmltopdf failed");
            return Err(ExportError::Conversion(stderr.to_string()));
        }

        info!(path = %path.as_ref().display(), "PDF itinerary written");
        Ok(())
    }
}
