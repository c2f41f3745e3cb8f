//! Content access cache
//!
//! This module memoizes repository content lookups for the lifetime of one
//! evaluation run. Every rule reaches repository content through a
//! [`RuleContext`], so a path fetched by one rule is served from memory to
//! every later rule.
//!
//! Only successful lookups are stored. A failed lookup is returned to the
//! caller untouched and a later request for the same path goes back to the
//! provider.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use crate::error::ProviderError;
use crate::providers::{Content, ContentProvider, DirectoryEntry, RepositoryRef};

/// Per-repository content access with memoization
pub struct RuleContext {
    /// Remote content source
    provider: Arc<dyn ContentProvider>,

    /// Repository every lookup targets
    repository: RepositoryRef,

    /// Successful lookups indexed by `owner/name:path`
    entries: Mutex<HashMap<String, Content>>,

    /// Recursive file listing, materialized on first use
    all_files: OnceCell<Vec<DirectoryEntry>>,
}

impl RuleContext {
    /// Create an empty context for one repository
    pub fn new(provider: Arc<dyn ContentProvider>, repository: RepositoryRef) -> Self {
        Self {
            provider,
            repository,
            entries: Mutex::new(HashMap::new()),
            all_files: OnceCell::new(),
        }
    }

    /// Get the repository this context reads from
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    fn cache_key(&self, path: &str) -> String {
        format!("{}:{}", self.repository.full_name(), path)
    }

    fn lookup(&self, key: &str) -> Option<Content> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn store(&self, key: String, content: Content) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, content);
        }
    }

    /// Fetch a directory listing or file payload, at most once per path
    pub async fn get_content(&self, path: &str) -> Result<Content, ProviderError> {
        let path = path.trim_matches('/');
        let key = self.cache_key(path);

        if let Some(content) = self.lookup(&key) {
            tracing::trace!(path = path, "Content cache hit");
            return Ok(content);
        }

        tracing::debug!(
            repository = %self.repository,
            provider = self.provider.name(),
            path = path,
            "Content cache miss"
        );
        let content = self.provider.get_content(&self.repository, path).await?;
        self.store(key, content.clone());
        Ok(content)
    }

    /// List a directory. The root directory is the empty path.
    pub async fn get_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, ProviderError> {
        match self.get_content(path).await? {
            Content::Directory(entries) => Ok(entries),
            Content::File(_) => Err(ProviderError::NotADirectory {
                path: path.to_string(),
            }),
        }
    }

    /// Fetch a file and decode it to text
    pub async fn get_file_text(&self, path: &str) -> Result<String, ProviderError> {
        match self.get_content(path).await? {
            Content::File(blob) => blob.text(),
            Content::Directory(_) => Err(ProviderError::NotAFile {
                path: path.to_string(),
            }),
        }
    }

    /// Every file of the repository, walking directories breadth-first from
    /// the root. The walk happens once per context; any listing failure
    /// aborts it and leaves nothing memoized but the listings that succeeded.
    pub async fn get_all_files(&self) -> Result<&[DirectoryEntry], ProviderError> {
        let files = self
            .all_files
            .get_or_try_init(|| async {
                let mut files = Vec::new();
                let mut pending = VecDeque::from([String::new()]);

                while let Some(dir) = pending.pop_front() {
                    for entry in self.get_directory(&dir).await? {
                        if entry.is_dir() {
                            pending.push_back(entry.path);
                        } else if entry.is_file() {
                            files.push(entry);
                        }
                    }
                }

                tracing::debug!(
                    repository = %self.repository,
                    files = files.len(),
                    "Materialized repository file tree"
                );
                Ok::<_, ProviderError>(files)
            })
            .await?;
        Ok(files.as_slice())
    }

    /// Number of memoized lookups
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if nothing has been memoized yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::InMemoryProvider;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo")
    }

    fn context(provider: InMemoryProvider) -> (Arc<InMemoryProvider>, RuleContext) {
        let provider = Arc::new(provider);
        let ctx = RuleContext::new(provider.clone(), repo());
        (provider, ctx)
    }

    #[tokio::test]
    async fn test_same_path_fetched_once() {
        let (provider, ctx) = context(InMemoryProvider::new(repo()).with_file("README.md", "# Demo"));

        assert_eq!(ctx.get_file_text("README.md").await.unwrap(), "# Demo");
        assert_eq!(ctx.get_file_text("README.md").await.unwrap(), "# Demo");

        assert_eq!(provider.fetches_for(&repo(), "README.md"), 1);
        assert_eq!(ctx.len(), 1);
    }

    #[tokio::test]
    async fn test_root_is_empty_path() {
        let (provider, ctx) = context(InMemoryProvider::new(repo()).with_file("README.md", "x"));

        let entries = ctx.get_directory("").await.unwrap();
        assert_eq!(entries.len(), 1);
        ctx.get_directory("/").await.unwrap();
        assert_eq!(provider.fetches_for(&repo(), ""), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_memoized() {
        let (provider, ctx) = context(
            InMemoryProvider::new(repo())
                .with_file("README.md", "x")
                .with_transient_failure("README.md", 1),
        );

        assert!(ctx.get_file_text("README.md").await.is_err());
        assert!(ctx.is_empty());
        assert_eq!(ctx.get_file_text("README.md").await.unwrap(), "x");
        assert_eq!(provider.fetches_for(&repo(), "README.md"), 2);
    }

    #[tokio::test]
    async fn test_directory_as_file_is_an_error() {
        let (_provider, ctx) = context(InMemoryProvider::new(repo()).with_file("docs/a.md", "x"));

        let err = ctx.get_file_text("docs").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NotAFile {
                path: "docs".to_string()
            }
        );
        let err = ctx.get_directory("docs/a.md").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotADirectory { .. }));
    }

    #[tokio::test]
    async fn test_all_files_walks_tree_once() {
        let (provider, ctx) = context(
            InMemoryProvider::new(repo())
                .with_file("README.md", "x")
                .with_file("src/main.rs", "fn main() {}")
                .with_file("src/bin/tool.rs", "fn main() {}")
                .with_dir("empty"),
        );

        let paths: Vec<_> = ctx
            .get_all_files()
            .await
            .unwrap()
            .iter()
            .map(|e| e.path.clone())
            .collect();
        assert_eq!(paths, vec!["README.md", "src/main.rs", "src/bin/tool.rs"]);

        let fetches = provider.fetch_count();
        ctx.get_all_files().await.unwrap();
        assert_eq!(provider.fetch_count(), fetches);
    }

    #[tokio::test]
    async fn test_all_files_reuses_memoized_listings() {
        let (provider, ctx) = context(InMemoryProvider::new(repo()).with_file("src/lib.rs", "x"));

        ctx.get_directory("src").await.unwrap();
        ctx.get_all_files().await.unwrap();
        assert_eq!(provider.fetches_for(&repo(), "src"), 1);
    }

    #[tokio::test]
    async fn test_all_files_failure_can_be_retried() {
        let (_provider, ctx) = context(
            InMemoryProvider::new(repo())
                .with_file("src/lib.rs", "x")
                .with_transient_failure("src", 1),
        );

        assert!(ctx.get_all_files().await.is_err());
        assert_eq!(ctx.get_all_files().await.unwrap().len(), 1);
    }
}
