//! Types for answer lookup and generation results.

use std::fmt;

use crate::backend::SimilarQuestion;
use crate::models::AnswerRecord;

/// Switches that distinguish callers of the same pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Keep the full relevant-article set on returned records.
    pub retain_all_articles: bool,
}

/// Progress milestones reported while generating an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Search phrases have been generated.
    Expanded,
    /// This many collected articles were already analyzed.
    Matched(usize),
    /// This many articles go through reliability analysis.
    Processing(usize),
    /// The answer is being synthesized.
    Synthesizing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expanded => write!(f, "Generated search phrases..."),
            Self::Matched(n) => write!(f, "Matched {n} articles already in our database..."),
            Self::Processing(n) => write!(f, "Processing {n} articles..."),
            Self::Synthesizing => write!(
                f,
                "Synthesizing articles to build an answer for your question..."
            ),
        }
    }
}

/// Outcome of looking a question up.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Answered(AnswerRecord),
    /// No stored answer; these answered questions are close, best first.
    Missing { similar: Vec<SimilarQuestion> },
}

/// Outcome of generating an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Answered(AnswerRecord),
    /// The question was screened out; the message explains why.
    Rejected(String),
    /// Synthesis finished but the backend has not stored the answer yet.
    Pending(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_messages() {
        assert_eq!(PipelineStage::Expanded.to_string(), "Generated search phrases...");
        assert_eq!(
            PipelineStage::Matched(3).to_string(),
            "Matched 3 articles already in our database..."
        );
        assert_eq!(PipelineStage::Processing(12).to_string(), "Processing 12 articles...");
    }

    #[test]
    fn options_default_drops_articles() {
        assert!(!PipelineOptions::default().retain_all_articles);
    }
}
