//! Reading book sources from disk.
//!
//! The expected layout is the one used by CNX/OpenStax book repositories:
//!
//! ```text
//! <root>/collections/<book>.collection.xml
//! <root>/modules/<module-dir>/index.cnxml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::book::ModuleSource;
use crate::error::{Error, Result};
use crate::util::decode_xml;

/// File name of the CNXML document inside each module directory.
pub const MODULE_FILE: &str = "index.cnxml";

/// Path of a book's collection manifest.
pub fn collection_path(collections_dir: &Path, book_id: &str) -> PathBuf {
    collections_dir.join(format!("{book_id}.collection.xml"))
}

/// Read a text file containing XML, decoding legacy encodings.
pub fn read_xml(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::from(e).in_file(path))?;
    Ok(decode_xml(&bytes).into_owned())
}

/// Read every module document below `modules_dir`.
///
/// Each subdirectory holding an `index.cnxml` is one module. Results are
/// sorted by directory name; directories without a module document are
/// skipped with a warning.
pub fn read_module_sources(modules_dir: &Path) -> Result<Vec<ModuleSource>> {
    let entries = fs::read_dir(modules_dir).map_err(|e| Error::from(e).in_file(modules_dir))?;

    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    let mut sources = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let file = dir.join(MODULE_FILE);
        if !file.is_file() {
            warn!(dir = dir.display().to_string(); "Skipping directory without a module document");
            continue;
        }
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(module = name.as_str(); "Reading module");
        sources.push(ModuleSource::new(name, read_xml(&file)?));
    }

    Ok(sources)
}
