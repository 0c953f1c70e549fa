//! Lightweight markup formatter: raw result text to a small HTML subset.
//!
//! Only headers (`#`, `##`, `###` at column 0), `**strong**`, `*em*` and flat
//! `-`/`1.` lists are recognised. Every newline in the output becomes `<br>`,
//! including the ones next to block tags.

use std::sync::LazyLock;

use regex::Regex;

use crate::page::escape_html;
use crate::{PrepareResponse, RenderedResult, ResultSource};

pub const NO_RESULTS_PLACEHOLDER: &str = "No results available";

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# ([^\r\n]*)").expect("valid regex"));
static H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## ([^\r\n]*)").expect("valid regex"));
static H3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### ([^\r\n]*)").expect("valid regex"));
static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static EM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s+").expect("valid regex"));

const LIST_ITEM_OPEN: &str = "<li>";

/// Formats raw text into HTML. Total over any input, including `""`.
pub fn format_markup(text: &str) -> String {
    let escaped = escape_html(text);

    // Inline and header rules run on the whole text before line-based list detection.
    let formatted = H1.replace_all(&escaped, "<h1>$1</h1>");
    let formatted = H2.replace_all(&formatted, "<h2>$1</h2>");
    let formatted = H3.replace_all(&formatted, "<h3>$1</h3>");
    let formatted = STRONG.replace_all(&formatted, "<strong>$1</strong>");
    let formatted = EM.replace_all(&formatted, "<em>$1</em>");

    let mut html_lines = Vec::new();
    let mut in_list = false;
    for line in formatted.split('\n') {
        let line = list_item(line);
        let is_item = line.starts_with(LIST_ITEM_OPEN);
        if is_item && !in_list {
            html_lines.push("<ul>".to_string());
            in_list = true;
        } else if !is_item && in_list {
            html_lines.push("</ul>".to_string());
            in_list = false;
        }
        html_lines.push(line);
    }
    if in_list {
        html_lines.push("</ul>".to_string());
    }

    html_lines.join("\n").replace('\n', "<br>")
}

/// Formats the server's raw `result`, substituting the placeholder when it is missing or empty.
pub fn format_result(raw: Option<&str>) -> String {
    let text = raw
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_RESULTS_PLACEHOLDER);
    format_markup(text)
}

/// Server-rendered HTML wins; the formatter is only the fallback for raw text.
pub fn render_response(response: &PrepareResponse) -> RenderedResult {
    match response.html_result.as_deref() {
        Some(html) if !html.is_empty() => RenderedResult {
            html: html.to_string(),
            source: ResultSource::Server,
        },
        _ => RenderedResult {
            html: format_result(response.result.as_deref()),
            source: ResultSource::Formatted,
        },
    }
}

fn list_item(line: &str) -> String {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix("- ") {
        return format!("<li>{rest}</li>");
    }
    if let Some(marker) = ORDERED_MARKER.find(trimmed) {
        return format!("<li>{}</li>", &trimmed[marker.end()..]);
    }
    line.to_string()
}
