//! Per-section copy controls over a rendered result.
//!
//! A section is never materialised: it is a level-2 heading plus every sibling
//! node after it, up to the next level-2 heading or the end of the parent.
//! Boundaries are re-derived from the document on every copy.

use std::fmt::Write;

use ego_tree::{NodeId, NodeRef};
use scraper::node::{Element, Node, Text};
use scraper::{ElementRef, Html};

use prep_logging::{prep_debug, prep_error, prep_info};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::page::escape_html;

/// Marker attribute carried by every injected copy control.
pub const COPY_CONTROL_ATTR: &str = "data-copy-section";

const SECTION_HEADING: &str = "h2";

const COPY_CONTROL_HTML: &str = concat!(
    r#"<button type="button" class="copy-section btn btn-sm btn-outline-primary ms-2" "#,
    r#"data-copy-section="" title="Copy section" aria-label="Copy section">Copy</button>"#
);

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyFormat {
    /// Heading label, blank line, then the section rendered as plain text.
    #[default]
    PlainText,
    /// Section markup with the copy controls stripped out.
    HtmlStripped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    pub index: usize,
    pub label: String,
    pub has_copy_control: bool,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CopyError {
    #[error("no section with index {index}")]
    MissingSection { index: usize },
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// A detached result fragment, i.e. the contents of `#resultContent`.
#[derive(Debug, Clone)]
pub struct ResultDocument {
    html: Html,
}

impl ResultDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_fragment(html),
        }
    }

    /// Appends a copy control as the last child of every level-2 heading that
    /// does not already carry one. Returns the number of controls added.
    pub fn augment(&mut self) -> usize {
        let targets: Vec<NodeId> = self
            .section_headings()
            .filter(|heading| !has_copy_control(*heading))
            .map(|heading| heading.id())
            .collect();
        if targets.is_empty() {
            return 0;
        }

        let Some(template) = ControlTemplate::parse() else {
            prep_error!("copy control template failed to parse");
            return 0;
        };
        let mut added = 0;
        for id in targets {
            if let Some(mut heading) = self.html.tree.get_mut(id) {
                heading
                    .append(Node::Element(template.element.clone()))
                    .append(Node::Text(template.label.clone()));
                added += 1;
            }
        }
        prep_debug!("added {} copy controls", added);
        added
    }

    pub fn headings(&self) -> Vec<SectionHeading> {
        self.section_headings()
            .enumerate()
            .map(|(index, heading)| SectionHeading {
                index,
                label: heading_label(heading),
                has_copy_control: has_copy_control(heading),
            })
            .collect()
    }

    /// Content of the section owned by the `index`-th level-2 heading.
    pub fn section_content(&self, index: usize, format: CopyFormat) -> Option<String> {
        let heading = self.section_headings().nth(index)?;
        let body = heading
            .next_siblings()
            .take_while(|node| !is_section_heading(*node));

        let content = match format {
            CopyFormat::PlainText => {
                let label = heading_label(heading);
                let mut renderer = TextRenderer::new();
                for node in body {
                    renderer.visit_node(node);
                }
                let text = renderer.finish();
                if text.is_empty() {
                    label
                } else {
                    format!("{label}\n\n{text}")
                }
            }
            CopyFormat::HtmlStripped => {
                let mut markup = String::new();
                write_markup(*heading, &mut markup);
                for node in body {
                    write_markup(node, &mut markup);
                }
                markup.trim().to_string()
            }
        };
        Some(content)
    }

    /// Serialised fragment content, copy controls included.
    pub fn to_html(&self) -> String {
        self.html.root_element().inner_html()
    }

    /// Whole fragment as plain text, copy controls excluded.
    pub fn plain_text(&self) -> String {
        let mut renderer = TextRenderer::new();
        for child in self.html.root_element().children() {
            renderer.visit_node(child);
        }
        renderer.finish()
    }

    fn section_headings(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == SECTION_HEADING)
    }
}

/// Copies one section to the clipboard and returns what was copied.
pub fn copy_section(
    document: &ResultDocument,
    index: usize,
    format: CopyFormat,
    clipboard: &dyn Clipboard,
) -> Result<String, CopyError> {
    let content = document
        .section_content(index, format)
        .ok_or(CopyError::MissingSection { index })?;
    clipboard.set_text(&content)?;
    prep_info!(
        "copied section {} ({} chars, {:?})",
        index,
        content.chars().count(),
        format
    );
    Ok(content)
}

struct ControlTemplate {
    element: Element,
    label: Text,
}

impl ControlTemplate {
    fn parse() -> Option<Self> {
        let fragment = Html::parse_fragment(COPY_CONTROL_HTML);
        let button = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)?;
        let label = button.children().find_map(|child| match child.value() {
            Node::Text(text) => Some(text.clone()),
            _ => None,
        })?;
        Some(Self {
            element: button.value().clone(),
            label,
        })
    }
}

fn is_copy_control(element: &Element) -> bool {
    element.attr(COPY_CONTROL_ATTR).is_some()
}

fn has_copy_control(heading: ElementRef<'_>) -> bool {
    heading
        .children()
        .filter_map(ElementRef::wrap)
        .any(|child| is_copy_control(child.value()))
}

fn is_section_heading(node: NodeRef<'_, Node>) -> bool {
    ElementRef::wrap(node).is_some_and(|element| element.value().name() == SECTION_HEADING)
}

fn heading_label(heading: ElementRef<'_>) -> String {
    let mut renderer = TextRenderer::new();
    for child in heading.children() {
        renderer.visit_node(child);
    }
    renderer.finish()
}

fn write_markup(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Element(element) => {
            if is_copy_control(element) {
                return;
            }
            let name = element.name();
            out.push('<');
            out.push_str(name);
            for (attr, value) in element.attrs() {
                let _ = write!(out, " {attr}=\"{}\"", escape_html(value).replace('"', "&quot;"));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&name) {
                return;
            }
            for child in node.children() {
                write_markup(child, out);
            }
            let _ = write!(out, "</{name}>");
        }
        _ => {}
    }
}

/// Plain-text rendering in the spirit of `innerText`: whitespace collapses,
/// blocks and `<br>` break lines, list items get a `- ` prefix.
struct TextRenderer {
    builder: String,
    last_char: Option<char>,
}

impl TextRenderer {
    fn new() -> Self {
        Self {
            builder: String::new(),
            last_char: None,
        }
    }

    fn visit_node(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => self.append_text(text),
            Node::Element(element) => {
                if is_copy_control(element) {
                    return;
                }
                self.visit_element(node, element);
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_element(&mut self, node: NodeRef<'_, Node>, element: &Element) {
        match element.name() {
            "br" => self.ensure_newline(),
            "li" => {
                self.ensure_newline();
                self.append_text("- ");
                self.visit_children(node);
                self.ensure_newline();
            }
            "p" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre"
            | "table" => {
                self.ensure_blank_line();
                self.visit_children(node);
                self.ensure_blank_line();
            }
            "div" | "section" | "article" | "header" | "footer" | "tr" | "hr" => {
                self.ensure_newline();
                self.visit_children(node);
                self.ensure_newline();
            }
            "script" | "style" | "template" => {}
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            self.visit_node(child);
        }
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last_char, None | Some(' ') | Some('\n')) {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.last_char == Some('\n') || self.builder.is_empty() {
            return;
        }
        self.push_char('\n');
    }

    fn ensure_blank_line(&mut self) {
        if self.builder.is_empty() || self.builder.ends_with("\n\n") {
            return;
        }
        self.ensure_newline();
        self.push_char('\n');
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }

    fn finish(self) -> String {
        self.builder
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CopyFormat, ResultDocument};

    #[test]
    fn renderer_collapses_whitespace_and_breaks_lines() {
        let doc = ResultDocument::parse("<h2>T</h2>  one\n  two<br>three<p>four</p><p>five</p>");
        assert_eq!(
            doc.section_content(0, CopyFormat::PlainText).as_deref(),
            Some("T\n\none two\nthree\n\nfour\n\nfive")
        );
    }

    #[test]
    fn heading_without_body_copies_only_label() {
        let doc = ResultDocument::parse("<h2>Only</h2>");
        assert_eq!(
            doc.section_content(0, CopyFormat::PlainText).as_deref(),
            Some("Only")
        );
    }
}
