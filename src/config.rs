//! Configuration file loading for the CLI.
//!
//! Settings come from a TOML file: an explicit `--config` path, otherwise
//! `cnxmd.toml` in the book root, otherwise built-in defaults. Relative
//! paths are resolved against the book root.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::book::RenderOptions;
use crate::error::{Error, Result};
use crate::import::collection_path;

/// Name of the configuration file looked up in the book root.
pub const CONFIG_FILE: &str = "cnxmd.toml";

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Book identifier; selects `<collections_dir>/<book_id>.collection.xml`.
    pub book_id: String,
    pub collections_dir: PathBuf,
    pub modules_dir: PathBuf,
    /// Where the per-module `.mdx` files are written.
    pub content_dir: PathBuf,
    pub toc_file: PathBuf,
    /// Base URL for images; the media token is kept when unset.
    pub media_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            book_id: "physics".to_string(),
            collections_dir: PathBuf::from("collections"),
            modules_dir: PathBuf::from("modules"),
            content_dir: PathBuf::from("content"),
            toc_file: PathBuf::from("toc.json"),
            media_url: None,
        }
    }
}

impl Config {
    /// Collection manifest path under `root`.
    pub fn collection_file(&self, root: &Path) -> PathBuf {
        collection_path(&root.join(&self.collections_dir), &self.book_id)
    }

    pub fn modules_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.modules_dir)
    }

    pub fn content_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir)
    }

    pub fn toc_file(&self, root: &Path) -> PathBuf {
        root.join(&self.toc_file)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            media_url: self.media_url.clone(),
        }
    }
}

/// Find and load the configuration for a book root.
///
/// An explicit path must exist; the implicit `cnxmd.toml` is optional.
pub fn load_config(root: &Path, explicit_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = root.join(CONFIG_FILE);
    if local.is_file() {
        info!(path = local.display().to_string(); "Loading configuration from book root");
        return load_config_file(&local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}

fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "missing configuration file: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| Error::from(e).in_file(path))?;
    parse_config(&content).map_err(|e| e.in_file(path))
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}
