//! HTML rendering for itinerary text.
//!
//! Only the Markdown the itinerary prompt asks for is understood: `#` to
//! `####` headings, `-`/`*` bullets, `**bold**` and `[text](url)` links. Bold
//! text becomes a `highlight` span. Everything else is escaped and passed
//! through as paragraphs.

use regex::Regex;
use std::sync::LazyLock;
use tera::escape_html;

use crate::segment::DaySection;
use crate::types::Itinerary;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)\*\*(.+?)\*\*").expect("bold pattern compiles"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("link pattern compiles")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern compiles"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+(.*)$").expect("bullet pattern compiles"));

/// Inline formatting for one line of text. Link targets and all other text
/// are escaped with Tera's HTML escaper.
pub fn render_inline(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut last = 0;

    for captures in LINK.captures_iter(text) {
        let Some(link) = captures.get(0) else {
            continue;
        };
        html.push_str(&escape_html(&text[last..link.start()]));
        html.push_str(&format!(
            r#"<a href="{}" target="_blank">{}</a>"#,
            escape_html(&captures[2]),
            escape_html(&captures[1])
        ));
        last = link.end();
    }
    html.push_str(&escape_html(&text[last..]));

    BOLD.replace_all(&html, r#"$1<span class="highlight">$2</span>"#)
        .into_owned()
}

/// Convert the supported Markdown subset to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = Vec::new();
    let mut in_list = false;

    for line in markdown.lines() {
        if let Some(captures) = BULLET.captures(line) {
            if !in_list {
                html.push("<ul>".to_string());
                in_list = true;
            }
            html.push(format!("<li>{}</li>", render_inline(&captures[1])));
            continue;
        }

        if in_list {
            html.push("</ul>".to_string());
            in_list = false;
        }

        if line.trim().is_empty() {
            continue;
        }

        if let Some(captures) = HEADING.captures(line.trim_start()) {
            // `###` day headers are already shown by the day box, so nested
            // headings start one level lower.
            let level = (captures[1].len() + 1).min(6);
            html.push(format!(
                "<h{level}>{}</h{level}>",
                render_inline(captures[2].trim())
            ));
        } else {
            html.push(format!("<p>{}</p>", render_inline(line.trim())));
        }
    }

    if in_list {
        html.push("</ul>".to_string());
    }

    html.join("\n")
}

/// One day wrapped in its styled box.
pub fn day_box(day: &DaySection) -> String {
    format!(
        "<div class=\"day-box\">\n<h3>{}</h3>\n{}\n</div>",
        render_inline(&day.heading()),
        markdown_to_html(&day.body)
    )
}

/// Body fragment for a whole itinerary. Without day sections the preamble
/// (the full reply) is rendered alone.
pub fn itinerary_html(itinerary: &Itinerary) -> String {
    let mut parts = Vec::new();

    if !itinerary.preamble().is_empty() {
        parts.push(format!(
            "<div class=\"preamble\">\n{}\n</div>",
            markdown_to_html(itinerary.preamble())
        ));
    }

    parts.extend(itinerary.days().iter().map(day_box));
    parts.join("\n")
}
