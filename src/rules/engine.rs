//! Rules evaluation engine

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, span, warn, Instrument, Level};

use super::results::{RepositoryResult, RuleOutcome};
use super::schema::{self, ValidatedRule};
use crate::cache::RuleContext;
use crate::config::Config;
use crate::error::RepoFmtError;
use crate::providers::{ContentProvider, RepositoryRef};

/// Main rules evaluation engine
#[derive(Clone)]
pub struct RulesEngine {
    config: Arc<Config>,
    only_rules: Option<Arc<Vec<String>>>,
    skip_rules: Option<Arc<Vec<String>>>,
}

impl RulesEngine {
    /// Create a new rules engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            only_rules: None,
            skip_rules: None,
        }
    }

    /// Set rule names to exclusively run
    pub fn set_only_rules(&mut self, rules: Vec<String>) {
        self.only_rules = Some(Arc::new(rules));
    }

    /// Set rule names to skip
    pub fn set_skip_rules(&mut self, rules: Vec<String>) {
        self.skip_rules = Some(Arc::new(rules));
    }

    /// Check if a rule should be run
    fn should_run_rule(&self, rule: &str) -> bool {
        if let Some(only) = &self.only_rules {
            return only.iter().any(|r| r == rule);
        }

        if let Some(skip) = &self.skip_rules {
            return !skip.iter().any(|r| r == rule);
        }

        true
    }

    /// Validate every configured rule, stopping at the first invalid one
    fn validated_rules(&self, repository: &RepositoryRef) -> Result<Vec<ValidatedRule>, RepoFmtError> {
        self.config
            .rules
            .iter()
            .map(|raw| {
                schema::validate(raw).map_err(|source| RepoFmtError::Rule {
                    repository: repository.full_name(),
                    rule: raw.name.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Run the configured rules, in order, against one repository.
    ///
    /// Rules share one content cache. A configuration error aborts the
    /// repository before any rule runs.
    pub async fn run_repository(
        &self,
        provider: Arc<dyn ContentProvider>,
        repository: &RepositoryRef,
    ) -> Result<RepositoryResult, RepoFmtError> {
        let rules = self.validated_rules(repository)?;
        let ctx = RuleContext::new(provider, repository.clone());
        let mut result = RepositoryResult::new(repository.full_name());

        for rule in rules {
            let kind = rule.kind();
            if !self.should_run_rule(kind.as_str()) {
                debug!(rule = %kind, "Skipping rule");
                continue;
            }

            let violations = rule
                .rule
                .evaluate(&ctx, &rule.exceptions)
                .instrument(span!(Level::DEBUG, "rule", rule = %kind))
                .await;
            let messages: Vec<String> = violations.into_iter().map(|v| v.message).collect();

            debug!(
                rule = %kind,
                violations = messages.len(),
                exceptions = rule.exceptions.len(),
                "Rule completed"
            );

            if !messages.is_empty() {
                result.add_outcome(RuleOutcome::new(kind, rule.level, messages));
            }
        }

        info!(
            repository = %repository,
            errors = result.error_count(),
            warnings = result.warning_count(),
            fetched = ctx.len(),
            "Repository evaluated"
        );

        Ok(result)
    }

    /// Like [`run_repository`](Self::run_repository), recording a fatal
    /// error in the result instead of returning it
    pub async fn evaluate(
        &self,
        provider: Arc<dyn ContentProvider>,
        repository: &RepositoryRef,
    ) -> RepositoryResult {
        let span = span!(Level::INFO, "repository", repository = %repository);
        match self.run_repository(provider, repository).instrument(span).await {
            Ok(result) => result,
            Err(e) => {
                warn!(repository = %repository, error = %e, "Evaluation aborted");
                RepositoryResult::failed(repository.full_name(), e.to_string())
            }
        }
    }

    /// Evaluate several repositories. Results come back in input order.
    pub async fn run(
        &self,
        provider: Arc<dyn ContentProvider>,
        repositories: Vec<RepositoryRef>,
    ) -> Vec<RepositoryResult> {
        let limit = self.config.concurrency.max(1);
        info!(
            repositories = repositories.len(),
            rules = self.config.rules.len(),
            concurrency = limit,
            "Starting evaluation"
        );

        if limit == 1 || repositories.len() <= 1 {
            let mut results = Vec::with_capacity(repositories.len());
            for repository in &repositories {
                results.push(self.evaluate(provider.clone(), repository).await);
            }
            return results;
        }

        let mut results: Vec<RepositoryResult> = repositories
            .iter()
            .map(|r| RepositoryResult::failed(r.full_name(), "evaluation did not complete"))
            .collect();

        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();
        for (index, repository) in repositories.into_iter().enumerate() {
            let engine = self.clone();
            let provider = provider.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, engine.evaluate(provider, &repository).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = result,
                Err(e) => warn!(error = %e, "Evaluation task failed"),
            }
        }

        results
    }
}
