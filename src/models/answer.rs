use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::MetadataStore;

/// Numbered list items at the start of a line, e.g. `\n2. `.
static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\n)(\d+)\.\s").expect("numbered line pattern is valid"));

/// Stored answer as the backend returns it from its question/answer table.
///
/// Field names follow the wire format, including the misspelled
/// `relevent_articles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub end_output: String,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub citations_obj: MetadataStore,
    #[serde(default, rename = "relevent_articles")]
    pub relevant_articles: Vec<serde_json::Value>,
}

impl AnswerPayload {
    /// Converts the wire payload into the record threaded through rendering
    /// and export.
    ///
    /// Article bodies are large and only needed by some callers, so they are
    /// dropped unless `retain_articles` is set.
    pub fn into_record(self, question: impl Into<String>, retain_articles: bool) -> AnswerRecord {
        AnswerRecord {
            question: question.into(),
            output: normalize_numbered_lines(&self.end_output),
            citations: self.citations,
            metadata: self.citations_obj,
            articles: retain_articles.then_some(self.relevant_articles),
        }
    }
}

/// One synthesized answer with everything needed to render and export it.
///
/// Records are immutable snapshots: a new question produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The question as the user asked it.
    pub question: String,
    /// Narrative answer text, including its `References:` section.
    pub output: String,
    /// Citation strings in backend order.
    pub citations: Vec<String>,
    /// Metadata keyed by exact citation string.
    pub metadata: MetadataStore,
    /// Full article set, when the caller asked to keep it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<serde_json::Value>>,
}

/// Puts every numbered line into its own paragraph.
///
/// # Examples
///
/// ```
/// use dietnerd::models::normalize_numbered_lines;
///
/// assert_eq!(normalize_numbered_lines("Intro\n1. One\n2. Two"), "Intro\n\n1. One\n\n2. Two");
/// ```
pub fn normalize_numbered_lines(output: &str) -> String {
    NUMBERED_LINE.replace_all(output, "\n\n${2}. ").into_owned()
}
