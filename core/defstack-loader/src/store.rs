//! Backing stores that hold resource documents.

use defstack_model::{DefError, DefResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A source of parsed resource documents keyed by resource path.
pub trait DocumentStore {
    /// Every resource path the store holds. Called once, when the index is built.
    fn scan(&self) -> DefResult<Vec<String>>;

    /// Reads and parses the document at `path`.
    fn read(&self, path: &str) -> DefResult<Value>;
}

/// Documents on disk under `root`, one file per resource.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    extension: String,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> PathBuf {
        let mut file = self.root.join(path);
        file.as_mut_os_string().push(format!(".{}", self.extension));
        file
    }
}

impl DocumentStore for DirStore {
    fn scan(&self) -> DefResult<Vec<String>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| DefError::Io {
                path: self.root.display().to_string(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file()
                || entry.path().extension().is_none_or(|ext| ext != self.extension.as_str())
            {
                continue;
            }
            if let Some(key) = resource_key(&self.root, entry.path()) {
                paths.push(key);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> DefResult<Value> {
        let file = self.file_path(path);
        let text = std::fs::read_to_string(&file).map_err(|source| DefError::Io {
            path: file.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DefError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

/// Resource path of `file` under `root`: relative, extension stripped,
/// components joined with `/`.
pub fn resource_key(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Pre-parsed documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, document: Value) {
        self.documents.insert(path.into(), document);
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<String>, document: Value) -> Self {
        self.insert(path, document);
        self
    }
}

impl FromIterator<(String, Value)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn scan(&self) -> DefResult<Vec<String>> {
        let mut paths: Vec<String> = self.documents.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> DefResult<Value> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| DefError::ResourceNotFound(path.to_owned()))
    }
}
