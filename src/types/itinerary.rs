use serde::{Deserialize, Serialize};

use crate::segment::{DaySection, HeaderMatch, Segmentation};

/// A generated itinerary: the model's reply and its day sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Destination the itinerary was requested for
    pub destination: String,
    /// Reply text exactly as returned by the model
    pub raw: String,
    pub segmentation: Segmentation,
}

impl Itinerary {
    pub fn new(destination: impl Into<String>, raw: impl Into<String>, segmentation: Segmentation) -> Self {
        Self {
            destination: destination.into(),
            raw: raw.into(),
            segmentation,
        }
    }

    pub fn title(&self) -> String {
        format!("Itinerary for {}", self.destination)
    }

    pub fn preamble(&self) -> &str {
        &self.segmentation.preamble
    }

    pub fn days(&self) -> &[DaySection] {
        &self.segmentation.days
    }

    pub fn header_match(&self) -> HeaderMatch {
        self.segmentation.header_match
    }

    /// Markdown document for export. Day sections are re-emitted under
    /// uniform `## Day N` headings; a reply without sections is kept as is.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![format!("# {}", self.title()), String::new()];

        if !self.segmentation.has_days() {
            lines.push(self.raw.trim().to_string());
            return lines.join("\n") + "\n";
        }

        if !self.preamble().is_empty() {
            lines.push(self.preamble().to_string());
            lines.push(String::new());
        }

        for day in self.days() {
            lines.push(format!("## {}", day.heading()));
            lines.push(String::new());
            lines.push(day.body.clone());
            lines.push(String::new());
        }

        lines.join("\n")
    }

    /// Short plain-text overview for terminals and logs.
    pub fn outline(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("=== {} ===", self.title()));
        lines.push(format!("Days: {}", self.days().len()));

        for (idx, day) in self.days().iter().enumerate() {
            let first_line = day.body.lines().next().unwrap_or_default();
            lines.push(format!("{}. {} | {}", idx + 1, day.heading(), first_line));
        }

        lines.join("\n")
    }
}
