//! GitHub provider - Interactions with the GitHub REST API via octocrab

use octocrab::Octocrab;
use std::process::Command;
use tracing::debug;

use super::{Content, ContentProvider, DirectoryEntry, EntryKind, FileBlob, RepositoryRef};
use crate::error::ProviderError;

/// GitHub provider for repository content
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    /// Create a provider authenticated with the token found in the environment
    /// or, failing that, with the token of the `gh` CLI session.
    pub fn from_env() -> Result<Self, ProviderError> {
        let token = resolve_token().ok_or(ProviderError::NotAuthenticated)?;
        Self::with_token(token)
    }

    /// Create a provider authenticated with a personal access token
    pub fn with_token(token: String) -> Result<Self, ProviderError> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(api_error)?;
        Ok(Self { client })
    }
}

/// Look up a token in `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`
fn resolve_token() -> Option<String> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                debug!(source = var, "Using GitHub token from environment");
                return Some(token.trim().to_string());
            }
        }
    }

    let gh = which::which("gh").ok()?;
    let output = Command::new(gh).args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return None;
    }
    debug!(source = "gh", "Using GitHub token from gh CLI");
    Some(token)
}

fn api_error(err: octocrab::Error) -> ProviderError {
    ProviderError::Api {
        message: err.to_string(),
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

/// The fields of an API content item that matter for classification
struct ContentItem {
    name: String,
    path: String,
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
}

impl From<octocrab::models::repos::Content> for ContentItem {
    fn from(item: octocrab::models::repos::Content) -> Self {
        Self {
            name: item.name,
            path: item.path,
            kind: item.r#type,
            content: item.content,
            encoding: item.encoding,
        }
    }
}

/// Classify an API content response. A single `file` item carrying inline
/// content is a file payload; anything else is a directory listing.
fn classify(path: &str, mut items: Vec<ContentItem>) -> Content {
    if items.len() == 1 && items[0].kind == "file" && items[0].path == path {
        let item = items.remove(0);
        match item.content {
            Some(content) => {
                return Content::File(FileBlob {
                    path: item.path,
                    content,
                    encoding: item.encoding,
                })
            }
            None => items.push(item),
        }
    }

    Content::Directory(
        items
            .into_iter()
            .map(|item| DirectoryEntry {
                kind: EntryKind::from_api(&item.kind),
                name: item.name,
                path: item.path,
            })
            .collect(),
    )
}

#[async_trait::async_trait]
impl ContentProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_content(
        &self,
        repository: &RepositoryRef,
        path: &str,
    ) -> Result<Content, ProviderError> {
        let path = path.trim_matches('/');
        debug!(repository = %repository, path = path, "Fetching content");

        let repos = self.client.repos(&repository.owner, &repository.name);
        let mut request = repos.get_content();
        if !path.is_empty() {
            request = request.path(path);
        }

        let items = request.send().await.map_err(|e| {
            if is_not_found(&e) {
                ProviderError::NotFound {
                    path: path.to_string(),
                }
            } else {
                api_error(e)
            }
        })?;

        Ok(classify(
            path,
            items.items.into_iter().map(ContentItem::from).collect(),
        ))
    }

    async fn list_repositories(&self) -> Result<Vec<RepositoryRef>, ProviderError> {
        let first_page = self
            .client
            .current()
            .list_repos_for_authenticated_user()
            .per_page(100)
            .send()
            .await
            .map_err(api_error)?;

        let repositories = self
            .client
            .all_pages(first_page)
            .await
            .map_err(api_error)?;

        Ok(repositories
            .into_iter()
            .filter_map(|repo| {
                let owner = repo.owner?.login;
                Some(RepositoryRef::new(owner, repo.name))
            })
            .collect())
    }
}
