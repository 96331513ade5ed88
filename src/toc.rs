//! Table of contents built from a collection manifest.
//!
//! A collection nests `subcollection` elements (each with a `title` and a
//! `content` wrapper) around `module` references. The outline keeps that
//! nesting; page titles come from the converted modules.

use log::warn;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::Result;
use crate::module::ModuleTable;
use crate::xml::Element;

/// Title used for pages whose module was never converted and for sections
/// without a title.
pub const NO_TITLE: &str = "No Title Found";

/// A node of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocNode {
    /// A module page.
    Page { title: String, id: String },
    /// A titled group of pages and sections.
    Section {
        title: String,
        subsections: Vec<TocNode>,
    },
}

impl TocNode {
    pub fn title(&self) -> &str {
        match self {
            TocNode::Page { title, .. } | TocNode::Section { title, .. } => title,
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, TocNode::Page { .. })
    }

    /// Child nodes; pages have none.
    pub fn subsections(&self) -> &[TocNode] {
        match self {
            TocNode::Page { .. } => &[],
            TocNode::Section { subsections, .. } => subsections,
        }
    }

    /// Ids of every page, depth-first in document order.
    pub fn page_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_page_ids(&mut ids);
        ids
    }

    fn collect_page_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            TocNode::Page { id, .. } => ids.push(id),
            TocNode::Section { subsections, .. } => {
                for child in subsections {
                    child.collect_page_ids(ids);
                }
            }
        }
    }

    /// Pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

impl Serialize for TocNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TocNode::Page { title, id } => {
                let mut state = serializer.serialize_struct("Page", 3)?;
                state.serialize_field("is_page", &true)?;
                state.serialize_field("title", title)?;
                state.serialize_field("id", id)?;
                state.end()
            }
            TocNode::Section { title, subsections } => {
                let mut state = serializer.serialize_struct("Section", 3)?;
                state.serialize_field("is_page", &false)?;
                state.serialize_field("title", title)?;
                state.serialize_field("subsections", subsections)?;
                state.end()
            }
        }
    }
}

/// Build the table of contents for a (namespace-free) collection root.
///
/// Must run after every referenced module has been added to `modules`.
/// The root section takes the collection's `metadata/title`.
pub fn build_toc(root: &Element, modules: &ModuleTable) -> TocNode {
    let mut toc = build_node(root, modules);

    if let TocNode::Section { title, .. } = &mut toc
        && let Some(collection_title) = root
            .find("metadata")
            .and_then(|metadata| metadata.find_text("title"))
    {
        *title = collection_title.to_string();
    }

    toc
}

fn build_node(node: &Element, modules: &ModuleTable) -> TocNode {
    if node.tag == "module" {
        return build_page(node, modules);
    }

    let mut title: Option<String> = None;
    let mut subsections = Vec::new();

    for child in &node.children {
        match child.tag.as_str() {
            // Only the first title names the section.
            "title" => {
                title.get_or_insert_with(|| child.text.clone());
            }
            "metadata" => {}
            "content" => subsections.extend(
                child
                    .children
                    .iter()
                    .map(|grandchild| build_node(grandchild, modules)),
            ),
            _ => subsections.push(build_node(child, modules)),
        }
    }

    TocNode::Section {
        title: title.unwrap_or_else(|| NO_TITLE.to_string()),
        subsections,
    }
}

fn build_page(node: &Element, modules: &ModuleTable) -> TocNode {
    let id = node.attr("document").unwrap_or_default().to_string();
    let title = match modules.title(&id) {
        Some(title) => title.to_string(),
        None => {
            warn!(id = id.as_str(); "Collection references a module that was not converted");
            NO_TITLE.to_string()
        }
    };
    TocNode::Page { title, id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;
    use crate::xml::{parse_document, strip_namespaces};

    fn parse(xml: &str) -> Element {
        let mut root = parse_document(xml).unwrap();
        strip_namespaces(&mut root);
        root
    }

    fn table(entries: &[(&str, &str)]) -> ModuleTable {
        entries
            .iter()
            .map(|(id, title)| Module {
                id: id.to_string(),
                title: title.to_string(),
                ..Module::default()
            })
            .collect()
    }

    fn page(title: &str, id: &str) -> TocNode {
        TocNode::Page {
            title: title.to_string(),
            id: id.to_string(),
        }
    }

    fn section(title: &str, subsections: Vec<TocNode>) -> TocNode {
        TocNode::Section {
            title: title.to_string(),
            subsections,
        }
    }

    #[test]
    fn test_content_root() {
        let root = parse(
            r#"<content><module document="m1"/><subcollection><title>Intro</title><content><module document="m2"/></content></subcollection></content>"#,
        );
        let toc = build_toc(&root, &table(&[("m1", "First"), ("m2", "Second")]));
        assert_eq!(
            toc,
            section(
                NO_TITLE,
                vec![
                    page("First", "m1"),
                    section("Intro", vec![page("Second", "m2")]),
                ]
            )
        );
    }

    #[test]
    fn test_first_title_names_section() {
        let root = parse(
            r#"<content><subcollection><title>First</title><title>Second</title><content><module document="m1"/></content></subcollection></content>"#,
        );
        let toc = build_toc(&root, &table(&[("m1", "Page")]));
        assert_eq!(
            toc,
            section(NO_TITLE, vec![section("First", vec![page("Page", "m1")])])
        );
    }

    #[test]
    fn test_collection_document() {
        let root = parse(
            r#"<col:collection xmlns:col="http://cnx.rice.edu/collxml" xmlns:md="http://cnx.rice.edu/mdml">
                <col:metadata><md:title>Physics</md:title></col:metadata>
                <col:content>
                    <col:module document="m1"/>
                    <col:subcollection>
                        <md:title>Kinematics</md:title>
                        <col:content>
                            <col:module document="m2"/>
                            <col:module document="m3"/>
                        </col:content>
                    </col:subcollection>
                </col:content>
            </col:collection>"#,
        );
        let toc = build_toc(&root, &table(&[("m1", "Preface"), ("m2", "Intro")]));
        assert_eq!(
            toc,
            section(
                "Physics",
                vec![
                    page("Preface", "m1"),
                    section("Kinematics", vec![page("Intro", "m2"), page(NO_TITLE, "m3")]),
                ]
            )
        );
        assert_eq!(toc.page_ids(), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_json_shape() {
        let toc = section("Book", vec![page("First", "m1"), section("Part", vec![])]);
        let value: serde_json::Value = serde_json::from_str(&toc.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "is_page": false,
                "title": "Book",
                "subsections": [
                    {"is_page": true, "title": "First", "id": "m1"},
                    {"is_page": false, "title": "Part", "subsections": []}
                ]
            })
        );
    }

    #[test]
    fn test_json_indent() {
        let json = page("First", "m1").to_json().unwrap();
        assert_eq!(
            json,
            "{\n    \"is_page\": true,\n    \"title\": \"First\",\n    \"id\": \"m1\"\n}"
        );
    }

    #[test]
    fn test_accessors() {
        let toc = section("Book", vec![page("First", "m1")]);
        assert!(!toc.is_page());
        assert_eq!(toc.title(), "Book");
        assert_eq!(toc.subsections().len(), 1);
        assert!(toc.subsections()[0].is_page());
        assert!(toc.subsections()[0].subsections().is_empty());
    }
}
