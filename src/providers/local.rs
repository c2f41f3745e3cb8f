//! Local checkout provider
//!
//! Serves a repository cloned on disk through the same interface as the
//! hosting platform, so a rule set can be evaluated before pushing.
//! Entries ignored by `.gitignore` and the `.git` directory are not listed,
//! matching what the remote side would expose.

use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

use super::{Content, ContentProvider, DirectoryEntry, EntryKind, FileBlob, RepositoryRef};
use crate::error::ProviderError;

/// Content provider for a single local checkout
pub struct LocalProvider {
    root: PathBuf,
    repository: RepositoryRef,
}

impl LocalProvider {
    /// Create a provider for the checkout at `root`.
    ///
    /// The repository identity is `local/<directory name>`.
    pub fn new(root: PathBuf) -> Self {
        let name = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "repository".to_string());
        Self {
            root,
            repository: RepositoryRef::new("local", name),
        }
    }

    /// The repository served by this provider
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ProviderError> {
        let relative = Path::new(path.trim_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ProviderError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn list(&self, dir: &Path, path: &str) -> Vec<DirectoryEntry> {
        let walker = WalkBuilder::new(dir)
            .max_depth(Some(1))
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .require_git(false)
            .build();

        let mut entries = Vec::new();
        for entry in walker.flatten() {
            if entry.depth() == 0 {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name == ".git" {
                continue;
            }
            let kind = match entry.file_type() {
                Some(t) if t.is_dir() => EntryKind::Dir,
                Some(t) if t.is_symlink() => EntryKind::Symlink,
                _ => EntryKind::File,
            };
            let entry_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", path, name)
            };
            entries.push(DirectoryEntry {
                name,
                kind,
                path: entry_path,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

#[async_trait::async_trait]
impl ContentProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get_content(
        &self,
        repository: &RepositoryRef,
        path: &str,
    ) -> Result<Content, ProviderError> {
        if repository != &self.repository {
            return Err(ProviderError::NotFound {
                path: repository.full_name(),
            });
        }

        let path = path.trim_matches('/');
        let full_path = self.resolve(path)?;

        if full_path.is_dir() {
            return Ok(Content::Directory(self.list(&full_path, path)));
        }

        if full_path.is_file() {
            let text = std::fs::read_to_string(&full_path).map_err(|e| ProviderError::Io {
                path: path.to_string(),
                message: e.to_string(),
            })?;
            return Ok(Content::File(FileBlob::plain(path, text)));
        }

        Err(ProviderError::NotFound {
            path: path.to_string(),
        })
    }

    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, ProviderError> {
        Ok(vec![self.repository.clone()])
    }
}
