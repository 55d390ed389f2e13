//! Corpus sources: where the documents of a retrieval engine come from.
//!
//! A [`CorpusSource`] yields `(text, label)` pairs in a stable order. The
//! order decides the synthetic ids assigned at load time, so it must be
//! reproducible across runs.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{RagError, Result};

/// One raw document as discovered by a [`CorpusSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// Raw, untrimmed text.
    pub text: String,
    /// Display label, typically a file name.
    pub label: String,
}

impl SourceText {
    /// Create a new source text.
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self { text: text.into(), label: label.into() }
    }
}

/// An enumerable collection of raw documents in deterministic order.
pub trait CorpusSource: Send + Sync {
    /// Read every document of the corpus.
    fn read(&self) -> Result<Vec<SourceText>>;
}

/// The top-level files of one directory with a given extension, sorted by path.
///
/// A missing directory is treated as an empty corpus.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    extension: String,
}

impl DirectoryCorpus {
    /// Markdown files (`*.md`) directly inside `root`.
    pub fn markdown(root: impl Into<PathBuf>) -> Self {
        Self::new(root, "md")
    }

    /// Files with `extension` directly inside `root`.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self { root: root.into(), extension: extension.into() }
    }

    /// The directory this corpus reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            warn!(root = %self.root.display(), "corpus directory does not exist");
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(RagError::CorpusError {
                path: self.root.clone(),
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                warn!(path = %path.display(), error = %e, "failed to list corpus entry");
                RagError::CorpusError { path, message: e.to_string() }
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == self.extension.as_str())
            {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl CorpusSource for DirectoryCorpus {
    fn read(&self) -> Result<Vec<SourceText>> {
        let files = self.discover()?;
        debug!(root = %self.root.display(), file_count = files.len(), "discovered corpus files");

        files
            .into_iter()
            .map(|path| {
                let text = std::fs::read_to_string(&path).map_err(|e| RagError::CorpusError {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let label = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Ok(SourceText { text, label })
            })
            .collect()
    }
}

/// A fixed list of documents held in memory, read back in the given order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    texts: Vec<SourceText>,
}

impl InMemoryCorpus {
    /// Create a corpus from `(text, label)` pairs.
    pub fn new<T, L>(pairs: impl IntoIterator<Item = (T, L)>) -> Self
    where
        T: Into<String>,
        L: Into<String>,
    {
        let texts = pairs.into_iter().map(|(text, label)| SourceText::new(text, label)).collect();
        Self { texts }
    }
}

impl CorpusSource for InMemoryCorpus {
    fn read(&self) -> Result<Vec<SourceText>> {
        Ok(self.texts.clone())
    }
}
