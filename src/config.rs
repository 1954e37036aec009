//! Runtime configuration from the environment and an optional `.env` file.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::backend::{API_URL_ENV, BackendClient, BackendClientBuilder, BackendError};
use crate::pipeline::PipelineOptions;
use crate::utils::get_cache_path;

/// Overrides the answer cache location.
pub const CACHE_PATH_ENV: &str = "DIETNERD_CACHE_PATH";

/// Keeps full article sets on fetched answers when truthy.
pub const RETAIN_ARTICLES_ENV: &str = "DIETNERD_RETAIN_ARTICLES";

/// Settings resolved from the environment. Unset values fall back to the
/// defaults of the component that uses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub retain_all_articles: bool,
}

impl Config {
    /// Loads `.env` from the working directory or its parents, then reads the
    /// environment. Variables already set take precedence over the file.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => warn!(error = %err, "ignoring unreadable .env"),
        }
        Self::from_env()
    }

    /// Reads configuration from the process environment only.
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var(API_URL_ENV),
            cache_path: non_empty_var(CACHE_PATH_ENV).map(PathBuf::from),
            retain_all_articles: non_empty_var(RETAIN_ARTICLES_ENV)
                .is_some_and(|value| is_truthy(&value)),
        }
    }

    /// Configured cache path, or the per-user default.
    pub fn cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(path) => Ok(path.clone()),
            None => get_cache_path(),
        }
    }

    /// Builds a backend client for the configured URL.
    pub fn backend_client(&self) -> Result<BackendClient, BackendError> {
        let builder = BackendClientBuilder::new();
        match &self.api_url {
            Some(url) => builder.base_url(url.clone()).build(),
            None => builder.build(),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            retain_all_articles: self.retain_all_articles,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
