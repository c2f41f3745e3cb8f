//! repofmt library
//!
//! Evaluates declarative compliance rules (required files, forbidden files,
//! README conventions, manifest keys, CI workflow hygiene, dependency
//! ordering) against repositories fetched through a [`providers::ContentProvider`].
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use repofmt::config::Config;
//! use repofmt::providers::local::LocalProvider;
//! use repofmt::rules::engine::RulesEngine;
//!
//! # async fn demo() -> Result<(), repofmt::RepoFmtError> {
//! let config = Config::load(None, Path::new("."))?;
//! let provider = LocalProvider::new(".".into());
//! let repository = provider.repository().clone();
//! let results = RulesEngine::new(config)
//!     .run(Arc::new(provider), vec![repository])
//!     .await;
//! println!("{:?}", results);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod providers;
pub mod rules;

pub use error::RepoFmtError;
