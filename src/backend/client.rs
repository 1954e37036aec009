//! Answer backend HTTP client implementation.
//!
//! This module provides `BackendClient` for making synchronous HTTP requests to
//! the answer backend, along with error types and a builder for configuration.
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::models::AnswerPayload;

use super::types::{
    AllArticlesResponse, Article, ArticleMatch, CheckValidResponse, CollectArticlesResponse,
    FinalResponse, QueryGenerationResponse, QueryVerdict, ReliabilityResponse, SimilarQuestion,
    parse_cached_answer,
};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "DIETNERD_API_URL";

/// Base URL used when neither the builder nor the environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Synthesis can take minutes on a cold question.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when interacting with the answer backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Backend responded with something the client cannot use
    #[error("Backend API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Network(err)
        }
    }
}

/// Builder for constructing `BackendClient` instances.
///
/// # Examples
///
/// ```
/// use dietnerd::backend::BackendClientBuilder;
///
/// let client = BackendClientBuilder::new()
///     .base_url("http://localhost:8000")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8000");
/// ```
#[derive(Debug, Default)]
pub struct BackendClientBuilder {
    base_url: Option<String>,
}

impl BackendClientBuilder {
    /// Creates a new `BackendClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the backend (e.g., "https://api.example.org").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `BackendClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, this method will check the
    /// `DIETNERD_API_URL` environment variable. If not set, it defaults to
    /// `http://localhost:8000`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the URL cannot serve as a base.
    pub fn build(self) -> Result<BackendClient, BackendError> {
        // Determine base URL: use builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        let base = Url::parse(&base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(format!(
                "{}: cannot be used as a base URL",
                base_url
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(BackendError::Network)?;

        Ok(BackendClient {
            client,
            base,
            base_url,
        })
    }
}

/// Synchronous HTTP client for the answer backend.
///
/// It should be constructed using `BackendClientBuilder`. Failed requests are
/// not retried.
pub struct BackendClient {
    client: reqwest::blocking::Client,
    base: Url,
    base_url: String,
}

/// Trait for answer backend operations.
///
/// This trait enables mocking in unit tests; the pipeline only depends on it.
pub trait BackendClientTrait: Send + Sync {
    /// Screens a question. Questions the service will not answer come back
    /// as `QueryVerdict::Rejected` with the message to show.
    fn check_valid(&self, question: &str) -> Result<QueryVerdict, BackendError>;

    /// Expands a question into literature search phrases.
    fn query_generation(&self, question: &str) -> Result<Vec<String>, BackendError>;

    /// Collects deduplicated articles for the search phrases.
    fn collect_articles(&self, phrases: &[String]) -> Result<Vec<Article>, BackendError>;

    /// Splits articles into those already analyzed and those still to process.
    fn article_matching(&self, articles: &[Article]) -> Result<ArticleMatch, BackendError>;

    /// Runs reliability analysis, returning summaries of the relevant articles.
    fn reliability_analysis(
        &self,
        articles: &[Article],
        question: &str,
    ) -> Result<Vec<Article>, BackendError>;

    /// Stores article summaries on the backend.
    fn write_articles(&self, summaries: &[Article]) -> Result<(), BackendError>;

    /// Merges new summaries with previously matched articles.
    fn all_articles(
        &self,
        summaries: &[Article],
        matched: &[Article],
    ) -> Result<Vec<Article>, BackendError>;

    /// Synthesizes the final answer from the relevant articles.
    fn generate_final_response(
        &self,
        articles: &[Article],
        question: &str,
    ) -> Result<FinalResponse, BackendError>;

    /// Fetches the stored answer for a question, if there is one.
    fn cached_answer(&self, question: &str) -> Result<Option<AnswerPayload>, BackendError>;

    /// Lists previously answered questions similar to `question`, best first.
    fn similar_questions(&self, question: &str) -> Result<Vec<SimilarQuestion>, BackendError>;
}

impl BackendClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an endpoint URL below the base, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        decode(checked(response)?)
    }

    /// POSTs to `/{path}/`; the backend routes these with a trailing slash.
    fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.post(path, body)?;
        decode(response)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let url = self.endpoint(&[path, ""])?;
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send()?;
        checked(response)
    }
}

fn checked(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Http {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(BackendError::Serialization)
}

impl BackendClientTrait for BackendClient {
    fn check_valid(&self, question: &str) -> Result<QueryVerdict, BackendError> {
        let response: CheckValidResponse = self.get_json(&["check_valid", question])?;
        Ok(QueryVerdict::from_response(response.response))
    }

    fn query_generation(&self, question: &str) -> Result<Vec<String>, BackendError> {
        let response: QueryGenerationResponse = self.get_json(&["query_generation", question])?;
        Ok(response.query_list)
    }

    fn collect_articles(&self, phrases: &[String]) -> Result<Vec<Article>, BackendError> {
        let response: CollectArticlesResponse = self.post_json("collect_articles", phrases)?;
        Ok(response.deduplicated_articles_collected)
    }

    fn article_matching(&self, articles: &[Article]) -> Result<ArticleMatch, BackendError> {
        self.post_json("article_matching", articles)
    }

    fn reliability_analysis(
        &self,
        articles: &[Article],
        question: &str,
    ) -> Result<Vec<Article>, BackendError> {
        let body = json!({
            "articles_to_process": articles,
            "user_query": question,
        });
        let response: ReliabilityResponse =
            self.post_json("reliability_analysis_processing", &body)?;
        Ok(response.relevant_article_summaries)
    }

    fn write_articles(&self, summaries: &[Article]) -> Result<(), BackendError> {
        self.post("write_articles_to_db", summaries)?;
        Ok(())
    }

    fn all_articles(
        &self,
        summaries: &[Article],
        matched: &[Article],
    ) -> Result<Vec<Article>, BackendError> {
        let body = json!({
            "relevant_article_summaries": summaries,
            "matched_articles": matched,
        });
        let response: AllArticlesResponse = self.post_json("get_all_articles", &body)?;
        Ok(response.all_relevant_articles)
    }

    fn generate_final_response(
        &self,
        articles: &[Article],
        question: &str,
    ) -> Result<FinalResponse, BackendError> {
        let body = json!({
            "all_relevant_articles": articles,
            "user_query": question,
        });
        self.post_json("generate_final_response", &body)
    }

    fn cached_answer(&self, question: &str) -> Result<Option<AnswerPayload>, BackendError> {
        let rows: Vec<Vec<Value>> = self.get_json(&["db_get", question])?;
        parse_cached_answer(&rows)
    }

    fn similar_questions(&self, question: &str) -> Result<Vec<SimilarQuestion>, BackendError> {
        self.get_json(&["db_sim_search", question])
    }
}
