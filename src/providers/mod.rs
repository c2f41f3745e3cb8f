//! # Providers Module
//!
//! This module handles access to repository content hosted elsewhere.
//! Rules never talk to a provider directly: they go through
//! [`crate::cache::RuleContext`], which memoizes every lookup.
//!
//! ## Implementations
//!
//! - [`github::GitHubProvider`] - GitHub REST API through `octocrab`
//! - [`local::LocalProvider`] - a checkout on the local filesystem
//! - [`memory::InMemoryProvider`] - an in-memory repository, used by tests
//!
//! ## Examples
//!
//! ```rust
//! use repofmt::providers::{memory::InMemoryProvider, ContentProvider, RepositoryRef};
//!
//! let repo = RepositoryRef::new("octo", "demo");
//! let provider = InMemoryProvider::new(repo.clone()).with_file("README.md", "# Demo");
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let content = rt.block_on(provider.get_content(&repo, "")).unwrap();
//! assert!(content.is_directory());
//! ```

pub mod github;
pub mod local;
pub mod memory;

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProviderError;

/// Identity of a repository: owner plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` string
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Get the full repository name (owner/name)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of a directory entry, as reported by the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

impl EntryKind {
    pub fn from_api(kind: &str) -> Self {
        match kind {
            "dir" => Self::Dir,
            "symlink" => Self::Symlink,
            "submodule" => Self::Submodule,
            _ => Self::File,
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Path from the repository root, without a leading slash
    pub path: String,
}

impl DirectoryEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self::with_kind(path, EntryKind::File)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::with_kind(path, EntryKind::Dir)
    }

    fn with_kind(path: impl Into<String>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self { name, kind, path }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// A file payload. GitHub ships file bodies base64-encoded with embedded
/// line breaks; [`FileBlob::text`] undoes that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub path: String,
    pub content: String,
    /// `Some("base64")` for encoded payloads, `None` for plain text
    pub encoding: Option<String>,
}

impl FileBlob {
    pub fn plain(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: None,
        }
    }

    pub fn base64(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: Some("base64".to_string()),
        }
    }

    /// Decode the payload into UTF-8 text
    pub fn text(&self) -> Result<String, ProviderError> {
        match self.encoding.as_deref() {
            Some("base64") => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| ProviderError::Decode {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })?;
                String::from_utf8(bytes).map_err(|e| ProviderError::Decode {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
            Some(other) => Err(ProviderError::Decode {
                path: self.path.clone(),
                message: format!("unsupported encoding '{}'", other),
            }),
            None => Ok(self.content.clone()),
        }
    }
}

/// Result of a content lookup: an array response is a directory listing,
/// anything else is a file payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Directory(Vec<DirectoryEntry>),
    File(FileBlob),
}

impl Content {
    pub fn is_directory(&self) -> bool {
        matches!(self, Content::Directory(_))
    }
}

/// Remote content access for one hosting platform.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &'static str;

    /// Fetch a directory listing or a file payload. The root directory is the empty path.
    async fn get_content(
        &self,
        repository: &RepositoryRef,
        path: &str,
    ) -> Result<Content, ProviderError>;

    /// Enumerate the repositories visible to the authenticated account
    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ref_parse() {
        let repo = RepositoryRef::parse("octo/demo").unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "demo");
        assert_eq!(repo.full_name(), "octo/demo");

        assert!(RepositoryRef::parse("octo").is_none());
        assert!(RepositoryRef::parse("/demo").is_none());
        assert!(RepositoryRef::parse("a/b/c").is_none());
    }

    #[test]
    fn test_directory_entry_name_from_path() {
        let entry = DirectoryEntry::file(".github/workflows/ci.yml");
        assert_eq!(entry.name, "ci.yml");
        assert!(entry.is_file());

        let root = DirectoryEntry::dir("docs");
        assert_eq!(root.name, "docs");
        assert!(root.is_dir());
    }

    #[test]
    fn test_entry_kind_from_api() {
        assert_eq!(EntryKind::from_api("dir"), EntryKind::Dir);
        assert_eq!(EntryKind::from_api("file"), EntryKind::File);
        assert_eq!(EntryKind::from_api("submodule"), EntryKind::Submodule);
    }

    #[test]
    fn test_file_blob_decodes_wrapped_base64() {
        // GitHub wraps base64 bodies at 60 columns
        let blob = FileBlob::base64("README.md", "IyBEZW1v\nCg==\n");
        assert_eq!(blob.text().unwrap(), "# Demo\n");
    }

    #[test]
    fn test_file_blob_rejects_invalid_base64() {
        let blob = FileBlob::base64("README.md", "!!!");
        assert!(matches!(blob.text(), Err(ProviderError::Decode { .. })));
    }

    #[test]
    fn test_file_blob_plain_text() {
        let blob = FileBlob::plain("a.txt", "hello");
        assert_eq!(blob.text().unwrap(), "hello");
    }
}
