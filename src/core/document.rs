//! core::document
//!
//! A loaded skill document: where it lives, its metadata and its body.

use std::path::{Path, PathBuf};

use super::metadata::{parse_document, SkillMetadata};
use super::types::SkillId;

/// One skill file of the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDocument {
    /// Absolute (or corpus-rooted) path of the file
    pub path: PathBuf,
    /// Parsed frontmatter; `None` when missing or malformed
    pub metadata: Option<SkillMetadata>,
    /// Markdown body after the frontmatter
    pub body: String,
}

impl SkillDocument {
    /// Build a document by parsing raw file content.
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        let parsed = parse_document(content);
        Self {
            path: path.into(),
            metadata: parsed.metadata,
            body: parsed.body,
        }
    }

    /// Build a document from already-parsed parts.
    pub fn new(path: impl Into<PathBuf>, metadata: Option<SkillMetadata>, body: &str) -> Self {
        Self {
            path: path.into(),
            metadata,
            body: body.to_string(),
        }
    }

    /// Name of the directory containing the file (e.g. `atoms`).
    pub fn directory(&self) -> Option<&str> {
        self.path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }

    /// The declared identifier, if valid.
    pub fn skill_id(&self) -> Option<SkillId> {
        self.metadata.as_ref().and_then(SkillMetadata::skill_id)
    }
}
