//! Splitting a model reply into per-day sections.
//!
//! The header contract is explicit: a [`HeaderRule`] is a single-line regular
//! expression whose first capture group is the section label. The default
//! strict rule is `^Day (\d+.*)$`, case-sensitive, evaluated on every line of
//! the reply. If the strict rule finds nothing, the configured fallback rule
//! gets a second pass; it tolerates the usual near-misses such as
//! `### Day 1`, `**Day 1:**` or leading whitespace. Text before the first
//! header becomes the preamble, and a reply with no header at all is returned
//! whole as the preamble with no days. Segmentation never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

const STRICT_PATTERN: &str = r"^Day (\d+.*)$";
const LENIENT_PATTERN: &str =
    r"^\s*(?:#{1,6}\s*)?(?:[*_]{1,3}\s*)?(?i:day)\s+(\d+.*?)\s*(?:[*_]{1,3})?\s*$";

const MARKDOWN_HEADING_PATTERN: &str = r"^#{1,6}\s*Day (\d+.*)$";

static STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRICT_PATTERN).expect("strict day header pattern compiles"));
static LENIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LENIENT_PATTERN).expect("lenient day header pattern compiles"));
static MARKDOWN_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(MARKDOWN_HEADING_PATTERN).expect("markdown day heading pattern compiles")
});

/// A line-level day header pattern.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    regex: Regex,
}

impl HeaderRule {
    /// Build a rule from a custom pattern. The pattern is matched against one
    /// line at a time; capture group 1 is the label, or the whole match when
    /// the pattern has no group.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// `Day <n>` at the very start of a line, exact case.
    pub fn strict() -> Self {
        Self {
            regex: STRICT.clone(),
        }
    }

    /// `### Day <n>`: a Markdown heading of any level, the format the
    /// itinerary prompt asks for. Plain `Day 1 total: ...` lines do not match.
    pub fn markdown_heading() -> Self {
        Self {
            regex: MARKDOWN_HEADING.clone(),
        }
    }

    /// Accepts heading marks, emphasis, indentation and any case of "day".
    pub fn lenient() -> Self {
        Self {
            regex: LENIENT.clone(),
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Label of `line` if it is a header.
    pub fn label(&self, line: &str) -> Option<String> {
        let captures = self.regex.captures(line)?;
        let matched = captures.get(1).or_else(|| captures.get(0))?;
        Some(
            matched
                .as_str()
                .replace("**", "")
                .replace("__", "")
                .trim()
                .to_string(),
        )
    }
}

/// Which rule produced the day sections. `Strict` means the configured
/// primary rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatch {
    Strict,
    Fallback,
    None,
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySection {
    /// Header text after `Day `, e.g. `1: Montmartre`
    pub label: String,
    pub body: String,
}

impl DaySection {
    /// Heading as it should be displayed (`Day 1: Montmartre`).
    pub fn heading(&self) -> String {
        format!("Day {}", self.label)
    }
}

/// Result of segmenting a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub preamble: String,
    pub days: Vec<DaySection>,
    pub header_match: HeaderMatch,
}

impl Segmentation {
    pub fn has_days(&self) -> bool {
        !self.days.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub header: HeaderRule,
    /// Second pass used only when `header` matches no line.
    pub fallback: Option<HeaderRule>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            header: HeaderRule::strict(),
            fallback: Some(HeaderRule::lenient()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseSegmenter {
    config: SegmenterConfig,
}

impl ResponseSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Strict rule only; unmatched replies end up entirely in the preamble.
    pub fn strict_only() -> Self {
        Self::new(SegmenterConfig {
            header: HeaderRule::strict(),
            fallback: None,
        })
    }

    /// Primary rule `^#{1,6}\s*Day (\d+.*)$` with the lenient fallback. Used
    /// by the planner, whose prompt requests `### Day N` headings.
    pub fn markdown_headings() -> Self {
        Self::new(SegmenterConfig {
            header: HeaderRule::markdown_heading(),
            fallback: Some(HeaderRule::lenient()),
        })
    }

    pub fn segment(&self, raw: &str) -> Segmentation {
        let text = raw.replace("\r\n", "\n");
        let lines: Vec<&str> = text.split('\n').collect();

        if let Some(segmentation) = split_on(&lines, &self.config.header, HeaderMatch::Strict) {
            return segmentation;
        }

        if let Some(fallback) = &self.config.fallback {
            if let Some(segmentation) = split_on(&lines, fallback, HeaderMatch::Fallback) {
                debug!(
                    target: "trip_planner::segment",
                    pattern = fallback.pattern(),
                    days = segmentation.days.len(),
                    "strict day headers missing, used fallback rule"
                );
                return segmentation;
            }
        }

        debug!(
            target: "trip_planner::segment",
            "no day headers found, returning reply as preamble"
        );
        Segmentation {
            preamble: trim_blank_lines(&lines),
            days: Vec::new(),
            header_match: HeaderMatch::None,
        }
    }
}

/// Convenience wrapper using the default configuration.
pub fn segment(raw: &str) -> Segmentation {
    ResponseSegmenter::default().segment(raw)
}

fn split_on(lines: &[&str], rule: &HeaderRule, header_match: HeaderMatch) -> Option<Segmentation> {
    let headers: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| rule.label(line).map(|label| (idx, label)))
        .collect();

    let first = headers.first()?.0;
    let preamble = trim_blank_lines(&lines[..first]);

    let days = headers
        .iter()
        .enumerate()
        .filter_map(|(pos, (start, label))| {
            let end = headers
                .get(pos + 1)
                .map(|(next, _)| *next)
                .unwrap_or(lines.len());
            let body = trim_blank_lines(&lines[start + 1..end]);
            if body.is_empty() {
                None
            } else {
                Some(DaySection {
                    label: label.clone(),
                    body,
                })
            }
        })
        .collect();

    Some(Segmentation {
        preamble,
        days,
        header_match,
    })
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end]
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(label: &str, body: &str) -> DaySection {
        DaySection {
            label: label.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn empty_reply() {
        let result = segment("");
        assert_eq!(result.preamble, "");
        assert!(result.days.is_empty());
        assert_eq!(result.header_match, HeaderMatch::None);
    }

    #[test]
    fn splits_on_day_headers() {
        let result = segment("Day 1: x\nfoo\nDay 2: y\nbar");
        assert_eq!(result.preamble, "");
        assert_eq!(result.days, vec![day("1: x", "foo"), day("2: y", "bar")]);
        assert_eq!(result.header_match, HeaderMatch::Strict);
    }

    #[test]
    fn keeps_preamble() {
        let result = segment("intro text\nDay 1:\nbody");
        assert_eq!(result.preamble, "intro text");
        assert_eq!(result.days, vec![day("1:", "body")]);
    }

    #[test]
    fn drops_empty_days() {
        let result = segment("Day 1:\n\nDay 2:\nbar");
        assert_eq!(result.days, vec![day("2:", "bar")]);
    }

    #[test]
    fn no_headers_means_whole_preamble() {
        let result = ResponseSegmenter::strict_only().segment("\nJust some advice.\n\nEnjoy!\n");
        assert_eq!(result.preamble, "Just some advice.\n\nEnjoy!");
        assert!(!result.has_days());
    }

    #[test]
    fn preserves_order_and_repeats() {
        let result = segment("Day 2: b\ntwo\nDay 1: a\none\nDay 2: c\nagain");
        let labels: Vec<&str> = result.days.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["2: b", "1: a", "2: c"]);
    }

    #[test]
    fn trims_blank_lines_but_keeps_inner_layout() {
        let result = segment("Day 1: Arrival\n\n#### Morning\n  - Louvre\n\n#### Evening\n- Seine cruise\n\n");
        assert_eq!(
            result.days[0].body,
            "#### Morning\n  - Louvre\n\n#### Evening\n- Seine cruise"
        );
    }

    #[test]
    fn strict_rule_is_case_sensitive_and_anchored() {
        let result = ResponseSegmenter::strict_only().segment("day 1: a\nx\n Day 2: b\ny");
        assert_eq!(result.header_match, HeaderMatch::None);
    }

    #[test]
    fn fallback_handles_markdown_headers() {
        let reply = "Here is your plan.\n\n### Day 1: Arrival\n#### Morning\n- Louvre\n\n**Day 2:**\n- Versailles";
        let result = segment(reply);
        assert_eq!(result.header_match, HeaderMatch::Fallback);
        assert_eq!(result.preamble, "Here is your plan.");
        assert_eq!(
            result.days,
            vec![
                day("1: Arrival", "#### Morning\n- Louvre"),
                day("2:", "- Versailles"),
            ]
        );
        assert_eq!(result.days[0].heading(), "Day 1: Arrival");
    }

    #[test]
    fn strict_match_wins_over_fallback() {
        let result = segment("### Day 1\nignored header style\nDay 2: real\nbody");
        assert_eq!(result.header_match, HeaderMatch::Strict);
        assert_eq!(result.preamble, "### Day 1\nignored header style");
        assert_eq!(result.days, vec![day("2: real", "body")]);
    }

    #[test]
    fn markdown_headings_keep_daily_totals_in_their_day() {
        let reply = "Welcome!\n### Day 1: Arrival\n#### Morning\n- Louvre\nDay 1 total: 3000\n### Day 2: Versailles\n#### Morning\n- Palace\nDay 2 total: 4000";
        let result = ResponseSegmenter::markdown_headings().segment(reply);

        assert_eq!(result.header_match, HeaderMatch::Strict);
        assert_eq!(result.preamble, "Welcome!");
        assert_eq!(
            result.days,
            vec![
                day("1: Arrival", "#### Morning\n- Louvre\nDay 1 total: 3000"),
                day("2: Versailles", "#### Morning\n- Palace\nDay 2 total: 4000"),
            ]
        );
    }

    #[test]
    fn custom_rule() {
        let rule = HeaderRule::new(r"^Tag (\d+)$").unwrap();
        let segmenter = ResponseSegmenter::new(SegmenterConfig {
            header: rule,
            fallback: None,
        });
        let result = segmenter.segment("Tag 1\nBerlin\nTag 2\nPotsdam");
        assert_eq!(result.days, vec![day("1", "Berlin"), day("2", "Potsdam")]);
    }

    #[test]
    fn handles_crlf() {
        let result = segment("Day 1: x\r\nfoo\r\n");
        assert_eq!(result.days, vec![day("1: x", "foo")]);
    }
}
