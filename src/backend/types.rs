use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::AnswerPayload;

use super::BackendError;

/// Article records are passed between pipeline stages without inspection.
pub type Article = Value;

/// Verdict of the backend's question screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryVerdict {
    Valid,
    /// The backend refuses the question; the message is shown to the user.
    Rejected(String),
}

impl QueryVerdict {
    const ACCEPTED: &'static str = "good";

    pub(crate) fn from_response(response: String) -> Self {
        if response == Self::ACCEPTED {
            Self::Valid
        } else {
            Self::Rejected(response)
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckValidResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryGenerationResponse {
    pub query_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectArticlesResponse {
    pub deduplicated_articles_collected: Vec<Article>,
}

/// Split of collected articles into already-known and still-to-analyze.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMatch {
    #[serde(default)]
    pub matched_articles: Vec<Article>,
    #[serde(default)]
    pub articles_to_process: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReliabilityResponse {
    pub relevant_article_summaries: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllArticlesResponse {
    pub all_relevant_articles: Vec<Article>,
}

/// Output of the synthesis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResponse {
    pub final_output: String,
    #[serde(default)]
    pub response_obj: Value,
}

/// A previously answered question close to the one asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, String)", into = "(f64, String)")]
pub struct SimilarQuestion {
    pub score: f64,
    pub question: String,
}

impl From<(f64, String)> for SimilarQuestion {
    fn from((score, question): (f64, String)) -> Self {
        Self { score, question }
    }
}

impl From<SimilarQuestion> for (f64, String) {
    fn from(similar: SimilarQuestion) -> Self {
        (similar.score, similar.question)
    }
}

/// Extracts the stored answer from `db_get` rows.
///
/// Rows are `[question, answer_json, ...]`; the answer column is usually a
/// JSON-encoded string but an inline object is accepted too. No rows means
/// the question has not been answered yet.
pub fn parse_cached_answer(rows: &[Vec<Value>]) -> Result<Option<AnswerPayload>, BackendError> {
    let Some(row) = rows.first() else {
        return Ok(None);
    };
    let column = row.get(1).ok_or_else(|| BackendError::Api {
        message: "Answer row has no answer column".to_string(),
    })?;

    let payload = match column {
        Value::String(json) => serde_json::from_str(json),
        other => serde_json::from_value(other.clone()),
    }
    .map_err(BackendError::Serialization)?;

    Ok(Some(payload))
}
