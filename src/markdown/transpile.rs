//! Recursive CNXML → Markdown tree walk.

use std::collections::BTreeSet;

use log::debug;

use super::figures::{
    ALT_ID_DELIMITER, FigureRegistry, MEDIA_URL_TOKEN, MISSING_ALT_TEXT, dangling_references,
    placeholder,
};
use crate::xml::Element;

/// Elements carrying this class are teacher-only and never rendered.
const TEACHER_CLASS: &str = "os-teacher";

/// The CNXML vocabulary understood by the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Content,
    Section,
    List,
    Title,
    Para,
    Item,
    Emphasis,
    Sup,
    Newline,
    Note,
    Figure,
    Link,
    Table,
    TGroup,
    TBody,
    Row,
    Entry,
    /// Anything else. Its content is dropped.
    Unknown,
}

impl Tag {
    /// Classify a (namespace-free) tag name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "content" => Tag::Content,
            "section" => Tag::Section,
            "list" => Tag::List,
            "title" => Tag::Title,
            "para" => Tag::Para,
            "item" => Tag::Item,
            "emphasis" => Tag::Emphasis,
            "sup" => Tag::Sup,
            "newline" => Tag::Newline,
            "note" => Tag::Note,
            "figure" => Tag::Figure,
            "link" => Tag::Link,
            "table" => Tag::Table,
            "tgroup" => Tag::TGroup,
            "tbody" => Tag::TBody,
            "row" => Tag::Row,
            "entry" => Tag::Entry,
            _ => Tag::Unknown,
        }
    }
}

/// True when the element is a teacher-only annotation.
pub fn is_teacher_only(node: &Element) -> bool {
    node.attr("class") == Some(TEACHER_CLASS)
}

/// Transpiler state for a single module.
///
/// Owns the figure registry and the bookkeeping gathered during the walk.
/// Create one per module; nothing here is shared between modules.
#[derive(Debug, Default)]
pub struct Transpiler {
    figures: FigureRegistry,
    references: BTreeSet<String>,
    unknown_tags: BTreeSet<String>,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Figures numbered so far.
    pub fn figures(&self) -> &FigureRegistry {
        &self.figures
    }

    /// Target ids of every figure link emitted so far.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(String::as_str)
    }

    /// Referenced ids with no figure registered under them (yet).
    pub fn dangling_references(&self) -> Vec<&str> {
        dangling_references(self.references(), &self.figures)
    }

    /// Tags that were encountered and dropped, sorted.
    pub fn unknown_tags(&self) -> impl Iterator<Item = &str> {
        self.unknown_tags.iter().map(String::as_str)
    }

    /// Render one element at the given section depth.
    pub fn transpile(&mut self, node: &Element, depth: usize) -> String {
        if is_teacher_only(node) {
            return String::new();
        }

        match Tag::from_name(&node.tag) {
            Tag::Content | Tag::Section | Tag::List => self.children(node, depth + 1),

            Tag::Note => {
                let body = self.children(node, depth + 1);
                body.lines()
                    .map(|line| format!("> {line}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }

            Tag::Newline => "\n".to_string(),

            Tag::Para => format!("{}\n\n", self.text(node, depth)),

            Tag::Sup => format!("<sup>{}</sup>", self.text(node, depth)),

            Tag::Title => format!("{} {}", "#".repeat(depth), self.text(node, depth)),

            Tag::Item => format!("* {}", self.text(node, depth)),

            Tag::Figure => self.figure(node, depth),

            Tag::Link => match node.attr("target-id") {
                Some(id) => {
                    self.references.insert(id.to_string());
                    format!("[Figure {}](#{id})", placeholder(id))
                }
                None => String::new(),
            },

            Tag::Emphasis => {
                let marker = match node.attr("effect") {
                    Some("italics") => "*",
                    _ => "**",
                };
                format!("{marker}{}{marker}", self.text(node, depth))
            }

            Tag::Table | Tag::TGroup => self.text(node, depth),

            Tag::TBody => {
                let body = format!("<table>{}</table>", self.text(node, depth));
                let mut body = body.replace('\n', "");
                body.push('\n');
                body
            }

            Tag::Row => format!("<tr>{}</tr>", self.text(node, depth)),

            Tag::Entry => format!("<td>{}</td>", self.text(node, depth)),

            Tag::Unknown => {
                if self.unknown_tags.insert(node.tag.clone()) {
                    debug!(tag = node.tag.as_str(); "Dropping unsupported element");
                }
                String::new()
            }
        }
    }

    /// Flattened inline text: leading text, then each child's rendering
    /// followed by its tail, trimmed.
    pub fn text(&mut self, node: &Element, depth: usize) -> String {
        let mut content = node.text.clone();
        for child in &node.children {
            content.push_str(&self.transpile(child, depth));
            content.push_str(&child.tail);
        }
        content.trim().to_string()
    }

    fn children(&mut self, node: &Element, depth: usize) -> String {
        node.children
            .iter()
            .map(|child| self.transpile(child, depth))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn figure(&mut self, node: &Element, depth: usize) -> String {
        let media = node.find("media");
        let alt = media
            .and_then(|m| m.attr("alt"))
            .unwrap_or(MISSING_ALT_TEXT);
        let file = media
            .and_then(|m| m.find("image"))
            .and_then(|image| image.attr("src"))
            .map(file_name)
            .unwrap_or_default();

        let id = node.attr("id");
        let number = self.figures.register(id);

        let mut out = format!(
            "![{alt}{ALT_ID_DELIMITER}{}]({MEDIA_URL_TOKEN}{file})",
            id.unwrap_or_default()
        );

        if let Some(caption) = node.find("caption") {
            let caption = self.text(caption, depth);
            out.push_str(&format!("\n***Figure {number}** {caption}*"));
        }

        out.push('\n');
        out
    }
}

/// Final path segment of an image source.
fn file_name(src: &str) -> &str {
    src.rsplit('/').next().unwrap_or(src)
}
