//! In-memory content provider
//!
//! Serves repositories described entirely in memory. Every lookup is
//! counted so tests can assert how often the remote side would be hit.

use base64::Engine;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{Content, ContentProvider, DirectoryEntry, FileBlob, RepositoryRef};
use crate::error::ProviderError;

#[derive(Debug, Default)]
struct RepositoryFixture {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
}

/// Content provider backed by in-memory repositories
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    repositories: Vec<RepositoryRef>,
    fixtures: HashMap<String, RepositoryFixture>,
    /// Remaining forced failures per `owner/name:path`
    failures: Mutex<HashMap<String, usize>>,
    fetches: Mutex<HashMap<String, usize>>,
    total_fetches: AtomicUsize,
}

impl InMemoryProvider {
    /// Create a provider serving a single, empty repository
    pub fn new(repository: RepositoryRef) -> Self {
        Self::default().with_repository(repository)
    }

    /// Add a repository; subsequent `with_*` calls populate it
    pub fn with_repository(mut self, repository: RepositoryRef) -> Self {
        self.fixtures.entry(repository.full_name()).or_default();
        self.repositories.push(repository);
        self
    }

    /// Add a file to the most recently added repository
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        let path = normalize(path);
        if let Some(fixture) = self.current_fixture() {
            fixture.files.insert(path, content.to_string());
        }
        self
    }

    /// Add an empty directory to the most recently added repository
    pub fn with_dir(mut self, path: &str) -> Self {
        let path = normalize(path);
        if let Some(fixture) = self.current_fixture() {
            fixture.dirs.insert(path);
        }
        self
    }

    /// Make the next `times` lookups of `path` fail with an API error
    pub fn with_transient_failure(self, path: &str, times: usize) -> Self {
        if let Some(repo) = self.repositories.last() {
            let key = cache_key(repo, &normalize(path));
            if let Ok(mut failures) = self.failures.lock() {
                failures.insert(key, times);
            }
        }
        self
    }

    /// Total number of `get_content` calls served
    pub fn fetch_count(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }

    /// Number of `get_content` calls for one path of one repository
    pub fn fetches_for(&self, repository: &RepositoryRef, path: &str) -> usize {
        self.fetches
            .lock()
            .map(|f| {
                f.get(&cache_key(repository, &normalize(path)))
                    .copied()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    fn current_fixture(&mut self) -> Option<&mut RepositoryFixture> {
        let key = self.repositories.last()?.full_name();
        self.fixtures.get_mut(&key)
    }

    fn record_fetch(&self, key: &str) {
        self.total_fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(key.to_string()).or_insert(0) += 1;
        }
    }

    fn take_failure(&self, key: &str) -> bool {
        let Ok(mut failures) = self.failures.lock() else {
            return false;
        };
        match failures.get_mut(key) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

fn cache_key(repository: &RepositoryRef, path: &str) -> String {
    format!("{}:{}", repository.full_name(), path)
}

fn list_directory(fixture: &RepositoryFixture, dir: &str) -> Option<Vec<DirectoryEntry>> {
    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{}/", dir)
    };

    let mut files = BTreeSet::new();
    let mut dirs = BTreeSet::new();
    let mut exists = dir.is_empty() || fixture.dirs.contains(dir);

    let all_paths = fixture
        .files
        .keys()
        .map(|p| (p, true))
        .chain(fixture.dirs.iter().map(|p| (p, false)));

    for (path, is_file) in all_paths {
        let Some(rest) = path.strip_prefix(&prefix) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        exists = true;
        match rest.split_once('/') {
            Some((child, _)) => {
                dirs.insert(format!("{}{}", prefix, child));
            }
            None if is_file => {
                files.insert(path.clone());
            }
            None => {
                dirs.insert(path.clone());
            }
        }
    }

    if !exists {
        return None;
    }

    let mut entries: Vec<DirectoryEntry> = dirs
        .into_iter()
        .map(DirectoryEntry::dir)
        .chain(files.into_iter().map(DirectoryEntry::file))
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Some(entries)
}

#[async_trait::async_trait]
impl ContentProvider for InMemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_content(
        &self,
        repository: &RepositoryRef,
        path: &str,
    ) -> Result<Content, ProviderError> {
        let path = normalize(path);
        let key = cache_key(repository, &path);
        self.record_fetch(&key);

        if self.take_failure(&key) {
            return Err(ProviderError::Api {
                message: "simulated failure".to_string(),
            });
        }

        let fixture = self
            .fixtures
            .get(&repository.full_name())
            .ok_or_else(|| ProviderError::NotFound { path: path.clone() })?;

        if let Some(text) = fixture.files.get(&path) {
            let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
            return Ok(Content::File(FileBlob::base64(path, encoded)));
        }

        list_directory(fixture, &path)
            .map(Content::Directory)
            .ok_or(ProviderError::NotFound { path })
    }

    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, ProviderError> {
        Ok(self.repositories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo")
    }

    #[tokio::test]
    async fn test_root_listing_contains_files_and_dirs() {
        let provider = InMemoryProvider::new(repo())
            .with_file("README.md", "# Demo")
            .with_file(".github/workflows/ci.yml", "jobs: {}");

        let Content::Directory(entries) = provider.get_content(&repo(), "").await.unwrap() else {
            panic!("expected a directory");
        };
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".github", "README.md"]);
        assert!(entries[0].is_dir());
        assert!(entries[1].is_file());
    }

    #[tokio::test]
    async fn test_file_is_served_base64_encoded() {
        let provider = InMemoryProvider::new(repo()).with_file("README.md", "# Demo");

        let Content::File(blob) = provider.get_content(&repo(), "README.md").await.unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(blob.encoding.as_deref(), Some("base64"));
        assert_eq!(blob.text().unwrap(), "# Demo");
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let provider = InMemoryProvider::new(repo());
        let err = provider.get_content(&repo(), "docs").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NotFound {
                path: "docs".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transient_failure_then_success() {
        let provider = InMemoryProvider::new(repo())
            .with_file("README.md", "x")
            .with_transient_failure("README.md", 1);

        assert!(provider.get_content(&repo(), "README.md").await.is_err());
        assert!(provider.get_content(&repo(), "README.md").await.is_ok());
        assert_eq!(provider.fetches_for(&repo(), "README.md"), 2);
    }

    #[tokio::test]
    async fn test_empty_dir_is_listed() {
        let provider = InMemoryProvider::new(repo()).with_dir("docs");
        let content = provider.get_content(&repo(), "docs").await.unwrap();
        assert_eq!(content, Content::Directory(vec![]));
    }
}
