//! Sources of front-end parse trees.

use crate::error::SourceError;
use code_model::RawNode;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Supplies the raw parse tree of a source file.
///
/// Implementations are shared between worker threads.
pub trait SourceProvider: Send + Sync {
    fn load(&self, path: &Path) -> Result<RawNode, SourceError>;
}

/// Parse trees held in memory, keyed by source path.
///
/// # Examples
/// ```
/// use code_extractor::{InMemorySources, SourceProvider};
/// use code_model::RawNode;
/// use std::path::Path;
///
/// let mut sources = InMemorySources::default();
/// sources.insert("a.c", RawNode::unit("unit", vec![]));
/// assert!(sources.load(Path::new("a.c")).is_ok());
/// assert!(sources.load(Path::new("b.c")).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemorySources {
    trees: HashMap<PathBuf, RawNode>,
}

impl InMemorySources {
    /// Inserts or replaces the tree of `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, tree: RawNode) {
        self.trees.insert(path.into(), tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl SourceProvider for InMemorySources {
    fn load(&self, path: &Path) -> Result<RawNode, SourceError> {
        self.trees
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound { path: path.to_path_buf() })
    }
}

/// Parse trees exported by the front end as JSON files.
///
/// The tree of `src/a.c` lives at `<root>/src/a.c.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSources {
    root: PathBuf,
}

impl JsonFileSources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the exported tree for `path`.
    pub fn tree_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        self.root.join(name)
    }
}

impl SourceProvider for JsonFileSources {
    fn load(&self, path: &Path) -> Result<RawNode, SourceError> {
        let file = self.tree_path(path);
        let text = std::fs::read_to_string(&file).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SourceError::NotFound { path: path.to_path_buf() },
            _ => SourceError::Io { path: path.to_path_buf(), source },
        })?;
        RawNode::from_json_str(&text).map_err(|source| SourceError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}
