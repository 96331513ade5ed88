//! CNXML modules and the module table.
//!
//! A module document has a fixed top-level shape: `title`, `metadata`
//! (holding `content-id`), `content` and an optional `glossary`. Assembly
//! only looks at those direct children.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

use crate::markdown::{Transpiler, resolve_references};
use crate::xml::Element;

/// Title used when a module document has none.
pub const MISSING_TITLE: &str = "{Page missing title}";

/// Id used when a module's metadata has no `content-id`.
pub const MISSING_ID: &str = "noid";

/// One converted textbook page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub title: String,
    pub id: String,
    /// Rendered markup, starting with a level-1 heading of the title.
    pub content: String,
    /// Reserved; glossary definitions are not converted yet.
    pub glossary: BTreeMap<String, String>,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            title: MISSING_TITLE.to_string(),
            id: MISSING_ID.to_string(),
            content: String::new(),
            glossary: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}, id: {}, content_length: {}, glossary_length: {}",
            self.title,
            self.id,
            self.content.len(),
            self.glossary.len()
        )
    }
}

/// Assemble a module from its (namespace-free) root element.
///
/// Runs the transpiler with fresh per-module state and resolves figure
/// cross-references, so the returned content is final.
pub fn assemble_module(root: &Element) -> Module {
    let mut transpiler = Transpiler::new();
    let mut module = assemble_module_with(root, &mut transpiler);
    module.content = resolve_references(&module.content, transpiler.figures());

    for id in transpiler.dangling_references() {
        warn!(module = module.id.as_str(), reference = id; "Figure reference has no matching figure");
    }
    debug!(
        module = module.id.as_str(),
        figures = transpiler.figures().count();
        "Assembled module"
    );

    module
}

/// Assemble a module using a caller-supplied transpiler.
///
/// Figure placeholders are left unresolved; the transpiler's registry holds
/// the numbers needed to resolve them.
pub fn assemble_module_with(root: &Element, transpiler: &mut Transpiler) -> Module {
    let mut module = Module::default();

    for component in &root.children {
        match component.tag.as_str() {
            "title" => {
                if !component.text.is_empty() {
                    module.title = component.text.clone();
                }
            }
            "metadata" => {
                if let Some(id) = component.find_text("content-id")
                    && !id.is_empty()
                {
                    module.id = id.to_string();
                }
            }
            "content" => module.content = transpiler.transpile(component, 0),
            // Reserved for glossary conversion
            "glossary" => {}
            _ => {}
        }
    }

    module.content = format!("# {}\n{}", module.title, module.content);
    module
}

/// Converted modules keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: BTreeMap<String, Module>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module under its id. A module already stored under the same
    /// id is replaced and returned.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        let previous = self.modules.insert(module.id.clone(), module);
        if let Some(previous) = &previous {
            warn!(id = previous.id.as_str(); "Duplicate module id, keeping the later module");
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Title of the module with the given id.
    pub fn title(&self, id: &str) -> Option<&str> {
        self.get(id).map(|m| m.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }
}

impl FromIterator<Module> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut table = ModuleTable::new();
        for module in iter {
            table.insert(module);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{parse_document, strip_namespaces};

    const MODULE: &str = r#"<?xml version="1.0"?>
<document xmlns="http://cnx.rice.edu/cnxml" xmlns:md="http://cnx.rice.edu/mdml">
  <title>Vectors</title>
  <metadata>
    <md:content-id>m42128</md:content-id>
    <md:title>ignored</md:title>
  </metadata>
  <content>
    <para>See <link target-id="fig-v"/>.</para>
    <figure id="fig-v"><media alt="arrow"><image src="media/v.jpg"/></media><caption>A vector.</caption></figure>
  </content>
  <glossary><definition><term>vector</term></definition></glossary>
</document>"#;

    fn parse(xml: &str) -> Element {
        let mut root = parse_document(xml).unwrap();
        strip_namespaces(&mut root);
        root
    }

    #[test]
    fn test_assemble_module() {
        let module = assemble_module(&parse(MODULE));
        assert_eq!(module.title, "Vectors");
        assert_eq!(module.id, "m42128");
        assert!(module.glossary.is_empty());
        assert_eq!(
            module.content,
            "# Vectors\nSee [Figure 1](#fig-v).\n\n\n\
             ![arrow__ALT__fig-v](__MEDIA_URL__v.jpg)\n***Figure 1** A vector.*\n"
        );
    }

    #[test]
    fn test_assemble_with_keeps_placeholders() {
        let mut transpiler = Transpiler::new();
        let module = assemble_module_with(&parse(MODULE), &mut transpiler);
        assert!(module.content.contains("__REPLACE_fig-v__"));
        assert_eq!(transpiler.figures().number("fig-v"), Some(1));
    }

    #[test]
    fn test_sentinels() {
        let module = assemble_module(&parse("<document><content><para>x</para></content></document>"));
        assert_eq!(module.title, MISSING_TITLE);
        assert_eq!(module.id, MISSING_ID);
        assert_eq!(module.content, "# {Page missing title}\nx\n\n");
    }

    #[test]
    fn test_only_direct_children_considered() {
        let module = assemble_module(&parse(
            "<document><wrapper><title>Nested</title></wrapper><title>Top</title></document>",
        ));
        assert_eq!(module.title, "Top");
        assert_eq!(module.content, "# Top\n");
    }

    #[test]
    fn test_display() {
        let module = Module {
            title: "T".to_string(),
            id: "m1".to_string(),
            content: "abc".to_string(),
            glossary: BTreeMap::new(),
        };
        assert_eq!(
            module.to_string(),
            "Title: T, id: m1, content_length: 3, glossary_length: 0"
        );
    }

    #[test]
    fn test_module_table() {
        let table: ModuleTable = [
            Module {
                id: "m2".to_string(),
                title: "Second".to_string(),
                ..Module::default()
            },
            Module {
                id: "m1".to_string(),
                title: "First".to_string(),
                ..Module::default()
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.title("m1"), Some("First"));
        assert_eq!(table.title("m3"), None);
        let ids: Vec<&str> = table.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn test_duplicate_id_replaced() {
        let mut table = ModuleTable::new();
        assert!(table.insert(Module::default()).is_none());
        let previous = table.insert(Module {
            title: "Later".to_string(),
            ..Module::default()
        });
        assert_eq!(previous.map(|m| m.title), Some(MISSING_TITLE.to_string()));
        assert_eq!(table.title(MISSING_ID), Some("Later"));
    }
}
