//! # cnxmd
//!
//! Convert CNXML textbooks (CNX/OpenStax module documents plus a collection
//! manifest) into Markdown pages and a JSON table of contents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use cnxmd::{Book, RenderOptions, export, import};
//!
//! let root = Path::new("osbooks-physics");
//! let collection = import::read_xml(&import::collection_path(&root.join("collections"), "physics"))?;
//! let sources = import::read_module_sources(&root.join("modules"))?;
//!
//! let book = Book::convert(&collection, &sources, &RenderOptions::default())?;
//! export::write_book(&book, &root.join("content"), &root.join("toc.json"))?;
//! # Ok::<(), cnxmd::Error>(())
//! ```
//!
//! ## Converting a single module
//!
//! ```
//! use cnxmd::xml::{parse_document, strip_namespaces};
//! use cnxmd::assemble_module;
//!
//! let mut root = parse_document(
//!     "<document><title>Units</title><content><para>Hello</para></content></document>",
//! )?;
//! strip_namespaces(&mut root);
//!
//! let module = assemble_module(&root);
//! assert_eq!(module.content, "# Units\nHello\n\n");
//! # Ok::<(), cnxmd::Error>(())
//! ```

pub mod book;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod markdown;
pub mod module;
pub mod toc;
pub(crate) mod util;
pub mod xml;

pub use book::{Book, ModuleSource, RenderOptions, convert_module};
pub use error::{Error, Result};
pub use module::{MISSING_ID, MISSING_TITLE, Module, ModuleTable, assemble_module};
pub use toc::{NO_TITLE, TocNode, build_toc};
