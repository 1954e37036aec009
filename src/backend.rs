//! Answer backend HTTP client module.
//!
//! This module provides a blocking client for the answer backend: cached
//! answer lookup, similarity search, and the stages of the generation pipeline.
mod client;
mod types;

pub use client::{
    API_URL_ENV, BackendClient, BackendClientBuilder, BackendClientTrait, BackendError,
    DEFAULT_API_URL,
};
pub use types::{
    Article, ArticleMatch, FinalResponse, QueryVerdict, SimilarQuestion, parse_cached_answer,
};
