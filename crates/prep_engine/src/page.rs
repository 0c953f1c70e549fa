//! Exported result page.
//!
//! The page keeps the element ids the interactive form uses (`meetingForm`,
//! `company_name`, `loading`, `result`, `resultContent`) so an exported result
//! can be dropped back into the same stylesheet and scripts.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<'a> {
    pub company_name: Option<&'a str>,
    /// Contents of `#resultContent`: augmented result HTML or an error panel.
    pub content_html: &'a str,
    pub generated_utc: &'a str,
}

/// Escapes text for use in HTML text content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    escape_html(value).replace('"', "&quot;")
}

/// Inline error panel shown in place of the result.
pub fn error_panel_html(message: &str, hint: &str) -> String {
    format!(
        "<div class=\"alert alert-danger\" role=\"alert\">\
         <h4><i class=\"fas fa-exclamation-circle me-2\"></i>Error</h4>\
         <p class=\"error-message\">{}</p>\
         <p class=\"error-hint\">{}</p>\
         </div>",
        escape_html(message),
        escape_html(hint)
    )
}

pub fn render_result_page(page: &ResultPage<'_>) -> String {
    let company = page.company_name.unwrap_or_default();
    let title = if company.is_empty() {
        "Meeting Preparation".to_string()
    } else {
        format!("Meeting Preparation for {}", escape_html(company))
    };
    let company = escape_attr(company);

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<!-- generated {generated} -->\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n",
        generated = escape_html(page.generated_utc),
    );
    let _ = write!(
        html,
        "<form id=\"meetingForm\">\n\
         <input id=\"company_name\" name=\"company_name\" class=\"form-control\" value=\"{company}\">\n\
         <button type=\"submit\">Prepare Meeting</button>\n</form>\n\
         <div id=\"loading\" style=\"display: none\"><p class=\"loading-text\"></p></div>\n"
    );
    let _ = write!(
        html,
        "<div id=\"result\">\n<div id=\"resultContent\">{content}</div>\n</div>\n</body>\n</html>\n",
        content = page.content_html,
    );
    html
}

#[cfg(test)]
mod tests {
    use super::{error_panel_html, escape_attr, escape_html};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn error_panel_contains_escaped_message_and_hint() {
        let panel = error_panel_html("missing <API> key", "check config");
        assert!(panel.contains("<p class=\"error-message\">missing &lt;API&gt; key</p>"));
        assert!(panel.contains("<p class=\"error-hint\">check config</p>"));
    }
}
