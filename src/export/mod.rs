//! Writing converted books to disk.
//!
//! Each module becomes `<content_dir>/<id>.mdx`; the table of contents is
//! written as pretty-printed JSON.

use std::fs;
use std::path::{Component, Path};

use log::info;

use crate::book::Book;
use crate::error::{Error, Result};
use crate::module::ModuleTable;
use crate::toc::TocNode;

/// Extension of the per-module output files.
pub const CONTENT_EXTENSION: &str = "mdx";

/// Write every module's content, creating `content_dir` if needed.
///
/// Returns the number of files written. Every module id is checked before
/// anything is written, so a bad id leaves the content directory untouched.
pub fn write_modules(modules: &ModuleTable, content_dir: &Path) -> Result<usize> {
    let files = modules
        .iter()
        .map(|module| Ok((output_file_name(&module.id)?, &module.content)))
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(content_dir).map_err(|e| Error::from(e).in_file(content_dir))?;

    for (name, content) in &files {
        let path = content_dir.join(name);
        fs::write(&path, content).map_err(|e| Error::from(e).in_file(&path))?;
    }
    Ok(files.len())
}

/// File name for a module's content, which must stay inside the content
/// directory.
fn output_file_name(id: &str) -> Result<String> {
    let mut components = Path::new(id).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain || id.contains(['/', '\\']) {
        return Err(Error::InvalidModuleId(id.to_string()));
    }
    Ok(format!("{id}.{CONTENT_EXTENSION}"))
}

/// Write the table of contents as JSON.
pub fn write_toc(toc: &TocNode, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::from(e).in_file(parent))?;
    }
    fs::write(path, toc.to_json()?).map_err(|e| Error::from(e).in_file(path))
}

/// Write all module documents and the table of contents.
pub fn write_book(book: &Book, content_dir: &Path, toc_path: &Path) -> Result<()> {
    let written = write_modules(&book.modules, content_dir)?;
    write_toc(&book.toc, toc_path)?;
    info!(
        files = written,
        content_dir = content_dir.display().to_string(),
        toc = toc_path.display().to_string();
        "Wrote book"
    );
    Ok(())
}
