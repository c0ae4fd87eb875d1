use std::path::Path;

use tracing::info;

use super::ExportError;
use crate::types::Itinerary;

/// Save the itinerary as a Markdown document.
pub fn write_markdown(path: impl AsRef<Path>, itinerary: &Itinerary) -> Result<(), ExportError> {
    let path = path.as_ref();
    let markdown = itinerary.to_markdown();
    std::fs::write(path, &markdown)?;
    info!(path = %path.display(), bytes = markdown.len(), "markdown itinerary written");
    Ok(())
}
