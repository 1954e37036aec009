//! Answer lookup and generation over the backend client.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{BackendClientTrait, BackendError, QueryVerdict};
use crate::models::AnswerRecord;

use super::types::{Generation, Lookup, PipelineOptions, PipelineStage};

/// Sequences backend calls for one question at a time.
pub struct AnswerPipeline {
    client: Arc<dyn BackendClientTrait>,
    options: PipelineOptions,
}

impl AnswerPipeline {
    /// Creates a pipeline with default options.
    #[must_use]
    pub fn new(client: Arc<dyn BackendClientTrait>) -> Self {
        Self {
            client,
            options: PipelineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Fetches the stored answer for `question` as a record.
    pub fn fetch(&self, question: &str) -> Result<Option<AnswerRecord>, BackendError> {
        let payload = self.client.cached_answer(question)?;
        Ok(payload.map(|p| p.into_record(question, self.options.retain_all_articles)))
    }

    /// Returns the stored answer, or similar answered questions when there is
    /// none.
    pub fn lookup(&self, question: &str) -> Result<Lookup, BackendError> {
        if let Some(record) = self.fetch(question)? {
            debug!(question, "answer found");
            return Ok(Lookup::Answered(record));
        }

        let similar = self.client.similar_questions(question)?;
        debug!(question, similar = similar.len(), "no stored answer");
        Ok(Lookup::Missing { similar })
    }

    /// Generates an answer for `question`, reporting progress to `on_stage`.
    ///
    /// Storing article summaries is best effort: a failure there is logged
    /// and generation continues.
    pub fn generate<F>(&self, question: &str, mut on_stage: F) -> Result<Generation, BackendError>
    where
        F: FnMut(&PipelineStage),
    {
        if let QueryVerdict::Rejected(message) = self.client.check_valid(question)? {
            info!(question, "question rejected");
            return Ok(Generation::Rejected(message));
        }

        let phrases = self.client.query_generation(question)?;
        on_stage(&PipelineStage::Expanded);

        let collected = self.client.collect_articles(&phrases)?;
        let matching = self.client.article_matching(&collected)?;
        on_stage(&PipelineStage::Matched(matching.matched_articles.len()));
        on_stage(&PipelineStage::Processing(matching.articles_to_process.len()));

        let summaries = self
            .client
            .reliability_analysis(&matching.articles_to_process, question)?;

        if let Err(err) = self.client.write_articles(&summaries) {
            warn!(error = %err, "failed to store article summaries");
        }

        let relevant = self
            .client
            .all_articles(&summaries, &matching.matched_articles)?;
        on_stage(&PipelineStage::Synthesizing);

        let response = self.client.generate_final_response(&relevant, question)?;
        info!(question, articles = relevant.len(), "answer synthesized");

        match self.fetch(question)? {
            Some(record) => Ok(Generation::Answered(record)),
            None => Ok(Generation::Pending(response.final_output)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Article, ArticleMatch, FinalResponse, SimilarQuestion};
    use crate::models::AnswerPayload;
    use serde_json::json;

    struct MockBackendClient {
        verdict: QueryVerdict,
        stored: Option<AnswerPayload>,
    }

    impl BackendClientTrait for MockBackendClient {
        fn check_valid(&self, _question: &str) -> Result<QueryVerdict, BackendError> {
            Ok(self.verdict.clone())
        }

        fn query_generation(&self, _question: &str) -> Result<Vec<String>, BackendError> {
            Ok(vec!["fiber satiety".to_string()])
        }

        fn collect_articles(&self, _phrases: &[String]) -> Result<Vec<Article>, BackendError> {
            Ok(vec![json!({"PMID": "1"}), json!({"PMID": "2"})])
        }

        fn article_matching(&self, articles: &[Article]) -> Result<ArticleMatch, BackendError> {
            Ok(ArticleMatch {
                matched_articles: articles[..1].to_vec(),
                articles_to_process: articles[1..].to_vec(),
            })
        }

        fn reliability_analysis(
            &self,
            articles: &[Article],
            _question: &str,
        ) -> Result<Vec<Article>, BackendError> {
            Ok(articles.to_vec())
        }

        fn write_articles(&self, _summaries: &[Article]) -> Result<(), BackendError> {
            Err(BackendError::Http { status: 500 })
        }

        fn all_articles(
            &self,
            summaries: &[Article],
            matched: &[Article],
        ) -> Result<Vec<Article>, BackendError> {
            Ok(summaries.iter().chain(matched).cloned().collect())
        }

        fn generate_final_response(
            &self,
            _articles: &[Article],
            _question: &str,
        ) -> Result<FinalResponse, BackendError> {
            Ok(FinalResponse {
                final_output: "Fresh answer".to_string(),
                response_obj: json!({}),
            })
        }

        fn cached_answer(&self, _question: &str) -> Result<Option<AnswerPayload>, BackendError> {
            Ok(self.stored.clone())
        }

        fn similar_questions(
            &self,
            _question: &str,
        ) -> Result<Vec<SimilarQuestion>, BackendError> {
            Ok(vec![SimilarQuestion {
                score: 0.8,
                question: "Is bran good?".to_string(),
            }])
        }
    }

    fn payload() -> AnswerPayload {
        serde_json::from_value(json!({
            "end_output": "Yes.\n1. First",
            "relevent_articles": [{"PMID": "1"}]
        }))
        .unwrap()
    }

    fn pipeline(verdict: QueryVerdict, stored: Option<AnswerPayload>) -> AnswerPipeline {
        AnswerPipeline::new(Arc::new(MockBackendClient { verdict, stored }))
    }

    #[test]
    fn lookup_returns_normalized_record() {
        let lookup = pipeline(QueryVerdict::Valid, Some(payload()))
            .lookup("Is fiber good?")
            .unwrap();
        let Lookup::Answered(record) = lookup else {
            panic!("expected an answer");
        };
        assert_eq!(record.question, "Is fiber good?");
        assert_eq!(record.output, "Yes.\n\n1. First");
        assert!(record.articles.is_none());
    }

    #[test]
    fn lookup_without_answer_lists_similar_questions() {
        let lookup = pipeline(QueryVerdict::Valid, None).lookup("q").unwrap();
        let Lookup::Missing { similar } = lookup else {
            panic!("expected similar questions");
        };
        assert_eq!(similar[0].question, "Is bran good?");
    }

    #[test]
    fn retain_option_keeps_articles() {
        let record = pipeline(QueryVerdict::Valid, Some(payload()))
            .with_options(PipelineOptions {
                retain_all_articles: true,
            })
            .fetch("q")
            .unwrap()
            .unwrap();
        assert_eq!(record.articles.map(|a| a.len()), Some(1));
    }

    #[test]
    fn rejected_question_reports_no_stages() {
        let mut stages = Vec::new();
        let generation = pipeline(QueryVerdict::Rejected("Ask a vet".to_string()), None)
            .generate("Can my dog eat grapes?", |stage| stages.push(*stage))
            .unwrap();
        assert_eq!(generation, Generation::Rejected("Ask a vet".to_string()));
        assert!(stages.is_empty());
    }

    #[test]
    fn generation_survives_failed_persist_and_reports_stages() {
        let mut stages = Vec::new();
        let generation = pipeline(QueryVerdict::Valid, None)
            .generate("q", |stage| stages.push(*stage))
            .unwrap();
        assert_eq!(generation, Generation::Pending("Fresh answer".to_string()));
        assert_eq!(
            stages,
            vec![
                PipelineStage::Expanded,
                PipelineStage::Matched(1),
                PipelineStage::Processing(1),
                PipelineStage::Synthesizing,
            ]
        );
    }

    #[test]
    fn generation_returns_stored_answer_when_available() {
        let generation = pipeline(QueryVerdict::Valid, Some(payload()))
            .generate("q", |_| {})
            .unwrap();
        assert!(matches!(generation, Generation::Answered(_)));
    }
}
