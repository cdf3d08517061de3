//! Storage collaborators that hold the raw document records.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

/// A storage backend for document records.
///
/// `read_documents` must return records in a deterministic order for a fixed
/// storage state; the corpus ordering (and so every vector ordinal) is taken
/// from it as-is.
pub trait DocumentSource: Send + Sync {
    /// Human-readable description used in logs and errors.
    fn describe(&self) -> String;

    /// Read every document, in the source's canonical order.
    fn read_documents(&self) -> Result<Vec<Document>>;

    /// Whether the source currently holds no documents.
    fn is_empty(&self) -> Result<bool>;

    /// Persist the given documents into the source.
    fn write_documents(&self, documents: &[Document]) -> Result<()>;
}

/// A directory holding one `<id>.json` file per document.
///
/// Only `*.json` files directly inside the root are considered, ordered by
/// file name. A missing directory is treated as empty.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(RagError::corpus_load(self.describe(), "not a directory"));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| RagError::corpus_load(self.describe(), e.to_string()))?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "json")
            {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// `<id>.json`, provided the id names a single plain path component.
    fn file_name(&self, id: &str) -> Result<String> {
        let mut components = Path::new(id).components();
        let plain = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none()
            && !id.contains(['/', '\\']);
        if !plain {
            return Err(RagError::corpus_load(
                self.describe(),
                format!("document id '{id}' cannot be used as a file name"),
            ));
        }
        Ok(format!("{id}.json"))
    }
}

impl DocumentSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn read_documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for path in self.json_files()? {
            let name = path.display().to_string();
            let raw = fs::read_to_string(&path)
                .map_err(|e| RagError::corpus_load(&name, e.to_string()))?;
            let document: Document = serde_json::from_str(&raw)
                .map_err(|e| RagError::corpus_load(&name, format!("malformed document: {e}")))?;
            debug!(path = %name, document.id = %document.id, "read document");
            documents.push(document);
        }
        Ok(documents)
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.json_files()?.is_empty())
    }

    fn write_documents(&self, documents: &[Document]) -> Result<()> {
        let names = documents
            .iter()
            .map(|document| self.file_name(&document.id))
            .collect::<Result<Vec<_>>>()?;
        fs::create_dir_all(&self.root)
            .map_err(|e| RagError::corpus_load(self.describe(), e.to_string()))?;
        for (document, name) in documents.iter().zip(names) {
            let path = self.root.join(name);
            let body = serde_json::to_string_pretty(document).map_err(|e| {
                RagError::corpus_load(path.display().to_string(), e.to_string())
            })?;
            fs::write(&path, body)
                .map_err(|e| RagError::corpus_load(path.display().to_string(), e.to_string()))?;
        }
        Ok(())
    }
}

/// A document source held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemorySource {
    documents: RwLock<Vec<Document>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self { documents: RwLock::new(documents) }
    }
}

impl DocumentSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory".to_string()
    }

    fn read_documents(&self) -> Result<Vec<Document>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RagError::corpus_load(self.describe(), "lock poisoned"))?;
        Ok(documents.clone())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.read_documents()?.is_empty())
    }

    fn write_documents(&self, new_documents: &[Document]) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RagError::corpus_load(self.describe(), "lock poisoned"))?;
        documents.extend_from_slice(new_documents);
        Ok(())
    }
}
