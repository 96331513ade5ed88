//! Minimal XML element tree for CNXML documents.
//!
//! Documents are parsed with quick-xml into an owned [`Element`] tree that
//! mirrors the ElementTree model: every element carries its leading text and
//! the tail text that follows its closing tag. Tags keep whatever qualified
//! form the document used until [`strip_namespaces`] reduces them to local
//! names.

mod element;
mod namespace;
mod parser;

pub use element::Element;
pub use namespace::{local_name, strip_namespaces};
pub use parser::{parse_bytes, parse_document, resolve_entity};
