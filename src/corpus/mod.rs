//! corpus
//!
//! Discovery and loading of skill documents.
//!
//! # Discovery
//!
//! The references directory is walked recursively. Every `*.md` file whose
//! name does not start with an ignored prefix is loaded; paths are sorted
//! so the load order, and everything derived from it, is stable.
//!
//! # Failure
//!
//! Loading is all-or-nothing: a missing directory, a walk error or an
//! unreadable file aborts the load. Malformed frontmatter is not a load
//! failure; the document is kept without metadata and reported by the
//! validator.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::document::SkillDocument;

/// Errors from loading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("references directory '{0}' does not exist")]
    MissingDirectory(PathBuf),

    #[error("failed to walk '{path}': {source}")]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read skill file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Options controlling discovery.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// File name prefixes to skip (e.g. `_`, `README`)
    pub ignore_prefixes: Vec<String>,
}

impl LoadOptions {
    fn is_ignored(&self, file_name: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }
}

/// All documents of one corpus, in path order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Directory the documents were loaded from
    pub root: PathBuf,
    /// Loaded documents, sorted by path
    pub documents: Vec<SkillDocument>,
}

impl Corpus {
    /// Load every skill document under `references_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or any file cannot be
    /// read.
    pub fn load(references_dir: &Path, options: &LoadOptions) -> Result<Self, CorpusError> {
        if !references_dir.is_dir() {
            return Err(CorpusError::MissingDirectory(references_dir.to_path_buf()));
        }

        let paths = discover(references_dir, options)?;
        tracing::debug!(
            dir = %references_dir.display(),
            files = paths.len(),
            "skill files discovered"
        );

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|e| CorpusError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            let doc = SkillDocument::from_content(path, &content);
            if doc.metadata.is_none() {
                tracing::debug!(path = %doc.path.display(), "document has no frontmatter");
            }
            documents.push(doc);
        }

        Ok(Self {
            root: references_dir.to_path_buf(),
            documents,
        })
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents were loaded.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Sorted paths of the skill files under `dir`.
fn discover(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, CorpusError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| CorpusError::WalkError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if options.is_ignored(name) {
            continue;
        }
        out.push(path.to_path_buf());
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> LoadOptions {
        LoadOptions {
            ignore_prefixes: vec!["_".into(), "README".into()],
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_markdown_sorted_and_skips_ignored() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "molecules/card.md", "---\nid: m-card\n---\n");
        write(temp.path(), "atoms/icon.md", "---\nid: a-icon\n---\n");
        write(temp.path(), "atoms/_draft.md", "---\nid: a-draft\n---\n");
        write(temp.path(), "README.md", "# Skills");
        write(temp.path(), "atoms/notes.txt", "not a skill");

        let corpus = Corpus::load(temp.path(), &options()).unwrap();

        let ids: Vec<_> = corpus
            .documents
            .iter()
            .map(|d| d.skill_id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a-icon", "m-card"]);
    }

    #[test]
    fn malformed_frontmatter_is_kept_without_metadata() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "atoms/bad.md", "---\nid: [unclosed\n---\nbody");

        let corpus = Corpus::load(temp.path(), &options()).unwrap();

        assert_eq!(corpus.len(), 1);
        assert!(corpus.documents[0].metadata.is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = Corpus::load(&temp.path().join("nope"), &options());
        assert!(matches!(result, Err(CorpusError::MissingDirectory(_))));
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let temp = TempDir::new().unwrap();
        let corpus = Corpus::load(temp.path(), &LoadOptions::default()).unwrap();
        assert!(corpus.is_empty());
    }
}
