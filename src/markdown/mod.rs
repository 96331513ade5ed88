//! CNXML → Markdown transpilation.
//!
//! This module turns the content subtree of a CNXML module into a Markdown
//! superset (headings, emphasis, bullets, images, plus raw HTML for tables and
//! superscripts). The design is split in two passes:
//!
//! - [`transpile`]: the recursive tree walk. Dispatch is a closed [`Tag`]
//!   enum over the supported vocabulary; anything else is dropped.
//! - [`figures`]: the per-module [`FigureRegistry`] and the cross-reference
//!   placeholders emitted during the walk, resolved once numbering is final.
//!
//! ## Output tokens
//!
//! Several tokens are left in the output for downstream tooling:
//!
//! - `__REPLACE_<id>__` inside figure links, replaced by the figure number
//!   after the walk ([`resolve_references`])
//! - `<alt>__ALT__<id>` in image alt text, carrying the figure element id
//! - `__MEDIA_URL__<file>` as the image target, optionally rewritten to a
//!   base URL ([`resolve_media_urls`])

mod figures;
mod transpile;

pub use figures::{
    ALT_ID_DELIMITER, FigureRegistry, MEDIA_URL_TOKEN, MISSING_ALT_TEXT, dangling_references,
    placeholder, resolve_media_urls, resolve_references,
};
pub use transpile::{Tag, Transpiler, is_teacher_only};
