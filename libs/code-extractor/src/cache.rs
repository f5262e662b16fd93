//! On-disk cache of converted trees.

use code_model::{read_json, write_json, Ast, FormatError};
use config::constants::CACHE_FILE_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding one JSON document per source file.
///
/// # Examples
/// ```
/// use code_extractor::JsonCache;
/// use std::path::Path;
///
/// let cache = JsonCache::new("/var/cache/ast");
/// assert_eq!(cache.entry_path(Path::new("drivers/net/e1000.c")),
///            Path::new("/var/cache/ast/drivers%2Fnet%2Fe1000.c.json"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonCache {
    dir: PathBuf,
}

impl JsonCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if needed.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Entry file for `source`, one flat file name per distinct path.
    ///
    /// Path separators, drive colons, `%` and every byte outside printable
    /// ASCII are percent-encoded, so the mapping is injective.
    pub fn entry_path(&self, source: &Path) -> PathBuf {
        let mut name = String::new();
        for &byte in source.as_os_str().as_encoded_bytes() {
            let literal = (b' '..=b'~').contains(&byte) && !matches!(byte, b'/' | b'\\' | b':' | b'%');
            if literal {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.{CACHE_FILE_EXTENSION}"))
    }

    /// Cached tree of `source`, or `None` when there is no entry.
    pub fn read(&self, source: &Path) -> Result<Option<Ast>, FormatError> {
        let entry = self.entry_path(source);
        if !entry.is_file() {
            return Ok(None);
        }
        debug!(source = %source.display(), entry = %entry.display(), "reading cached tree");
        read_json(&entry).map(Some)
    }

    pub fn write(&self, source: &Path, ast: &Ast) -> Result<(), FormatError> {
        let entry = self.entry_path(source);
        debug!(source = %source.display(), entry = %entry.display(), "caching tree");
        write_json(ast, &entry)
    }
}
