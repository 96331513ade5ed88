//! End-to-end conversion of a textbook.
//!
//! [`Book::convert`] takes the collection manifest and every module's source
//! text, converts the modules in parallel (each with its own transpiler
//! state), then builds the table of contents once all modules are in the
//! table.

use log::{debug, info};
use rayon::prelude::*;

use crate::error::Result;
use crate::markdown::resolve_media_urls;
use crate::module::{Module, ModuleTable, assemble_module};
use crate::toc::{TocNode, build_toc};
use crate::xml::{Element, parse_document, strip_namespaces};

/// Rendering options applied to every module.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base URL replacing the media token in image targets. When unset the
    /// token is kept for downstream tooling.
    pub media_url: Option<String>,
}

/// Source text of one module document.
#[derive(Debug, Clone)]
pub struct ModuleSource {
    /// Where the source came from (directory name or path), for errors and logs.
    pub name: String,
    pub xml: String,
}

impl ModuleSource {
    pub fn new(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }
}

/// A fully converted textbook.
#[derive(Debug, Clone)]
pub struct Book {
    pub modules: ModuleTable,
    pub toc: TocNode,
}

impl Book {
    /// Convert a collection and its modules.
    ///
    /// Fails on the first module (or the collection) that is not well-formed
    /// XML; the error names the offending source.
    pub fn convert(
        collection_xml: &str,
        sources: &[ModuleSource],
        options: &RenderOptions,
    ) -> Result<Book> {
        let collection = parse_tree(collection_xml).map_err(|e| e.in_file("collection"))?;

        let converted = sources
            .par_iter()
            .map(|source| convert_module(source, options))
            .collect::<Result<Vec<Module>>>()?;

        // All modules must be in the table before page titles are looked up
        let modules: ModuleTable = converted.into_iter().collect();
        let toc = build_toc(&collection, &modules);

        info!(modules = modules.len(), pages = toc.page_ids().len(); "Converted book");

        Ok(Book { modules, toc })
    }

    /// Modules in the order the table of contents lists them, skipping ids
    /// that were never converted.
    pub fn modules_in_reading_order(&self) -> impl Iterator<Item = &Module> {
        self.toc
            .page_ids()
            .into_iter()
            .filter_map(|id| self.modules.get(id))
    }
}

/// Parse and convert a single module document.
pub fn convert_module(source: &ModuleSource, options: &RenderOptions) -> Result<Module> {
    let root = parse_tree(&source.xml).map_err(|e| e.in_file(&source.name))?;
    let mut module = assemble_module(&root);

    if let Some(base) = &options.media_url {
        module.content = resolve_media_urls(&module.content, base);
    }

    debug!(source = source.name.as_str(); "{module}");
    Ok(module)
}

fn parse_tree(xml: &str) -> Result<Element> {
    let mut root = parse_document(xml)?;
    strip_namespaces(&mut root);
    Ok(root)
}
