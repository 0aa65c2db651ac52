//! Memory retrieval — the filesystem-backed collaborator behind the
//! filesystem context source.
//!
//! The [`MemoryRetriever`] trait is the consumed contract: given a query
//! and the current message context, return relevant memory text or the
//! fixed [`NO_RESULTS`] sentinel. [`FileMemoryStore`] is the in-tree
//! implementation, a plain keyword search over a directory of markdown
//! and text notes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::schema::{CanonicalMessage, ChannelContext};

/// Sentinel returned when retrieval finds nothing.
///
/// Distinct from an empty string so "nothing found" is observable at the
/// collaborator seam; the filesystem source normalizes it to `""`.
pub const NO_RESULTS: &str = "NO_MEMORIES_FOUND";

/// File extensions the store scans.
const MEMORY_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Retrieves memory text relevant to a query.
#[async_trait]
pub trait MemoryRetriever: Send + Sync {
    /// Return memory text matching the query, or [`NO_RESULTS`].
    async fn retrieve(
        &self,
        query: &str,
        channel: Option<&ChannelContext>,
        message: Option<&CanonicalMessage>,
    ) -> anyhow::Result<String>;
}

/// Keyword search over a directory of `.md`/`.txt` memory files.
///
/// Matching is case-insensitive per query term; a paragraph matches when
/// it contains any term. Matches are labeled with the file stem and
/// returned in lexicographic file order.
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    dir: PathBuf,
}

impl FileMemoryStore {
    /// Store reading from `dir`. A missing directory yields no results,
    /// not an error.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_owned(),
        }
    }

    /// Lowercased query terms, punctuation-insensitive, short words dropped.
    fn query_terms(query: &str) -> Vec<String> {
        query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(str::to_lowercase)
            .collect()
    }

    /// Paragraphs of `content` containing any of `terms`.
    fn matching_paragraphs<'a>(content: &'a str, terms: &[String]) -> Vec<&'a str> {
        content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| {
                if p.is_empty() {
                    return false;
                }
                let lower = p.to_lowercase();
                terms.iter().any(|t| lower.contains(t.as_str()))
            })
            .collect()
    }

    /// Memory files under the store directory, sorted by file name.
    fn memory_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| MEMORY_EXTENSIONS.contains(&ext))
            })
            .collect();
        files.sort();
        files
    }
}

#[async_trait]
impl MemoryRetriever for FileMemoryStore {
    async fn retrieve(
        &self,
        query: &str,
        _channel: Option<&ChannelContext>,
        _message: Option<&CanonicalMessage>,
    ) -> anyhow::Result<String> {
        let terms = Self::query_terms(query);
        if terms.is_empty() {
            return Ok(NO_RESULTS.to_owned());
        }

        let mut sections: Vec<String> = Vec::new();
        for path in self.memory_files() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            let matches = Self::matching_paragraphs(&content, &terms);
            if matches.is_empty() {
                continue;
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("memory")
                .to_owned();
            sections.push(format!("[{stem}]\n{}", matches.join("\n")));
        }

        if sections.is_empty() {
            debug!(query, "no memory matches");
            return Ok(NO_RESULTS.to_owned());
        }

        debug!(query, files = sections.len(), "memory matches found");
        Ok(sections.join("\n\n"))
    }
}
