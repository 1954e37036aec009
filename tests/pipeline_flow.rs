/// Integration tests for answer lookup and generation against a scripted backend.
use std::sync::{Arc, Mutex};

use dietnerd::backend::{
    Article, ArticleMatch, BackendClientTrait, BackendError, FinalResponse, QueryVerdict,
    SimilarQuestion,
};
use dietnerd::citation::build_reference_list;
use dietnerd::models::AnswerPayload;
use dietnerd::{AnswerCache, AnswerPipeline, Generation, Lookup, PipelineOptions, PipelineStage};
use serde_json::json;

/// Backend double that records calls and stores the answer once synthesized.
struct ScriptedBackend {
    calls: Mutex<Vec<&'static str>>,
    stored: Mutex<Option<AnswerPayload>>,
    fail_collection: bool,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stored: Mutex::new(None),
            fail_collection: false,
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

fn stored_answer() -> AnswerPayload {
    serde_json::from_value(json!({
        "end_output": "Fiber helps [1].\nReferences:\n1. Doe J. Fiber. J Nutr.",
        "citations": ["1. Doe J. Fiber. J Nutr."],
        "citations_obj": {
            "1. Doe J. Fiber. J Nutr.": {
                "Summary": "RCT in 40 adults",
                "PMID": 31,
                "PMCID": null,
                "URL": "https://pubmed.ncbi.nlm.nih.gov/31/"
            }
        },
        "relevent_articles": [{"PMID": "31"}, {"PMID": "32"}]
    }))
    .unwrap()
}

impl BackendClientTrait for ScriptedBackend {
    fn check_valid(&self, question: &str) -> Result<QueryVerdict, BackendError> {
        self.record("check_valid");
        if question.contains("recipe") {
            Ok(QueryVerdict::Rejected("Please speak to a dietitian.".to_string()))
        } else {
            Ok(QueryVerdict::Valid)
        }
    }

    fn query_generation(&self, _question: &str) -> Result<Vec<String>, BackendError> {
        self.record("query_generation");
        Ok(vec!["fiber".to_string(), "satiety".to_string()])
    }

    fn collect_articles(&self, phrases: &[String]) -> Result<Vec<Article>, BackendError> {
        self.record("collect_articles");
        if self.fail_collection {
            return Err(BackendError::Http { status: 502 });
        }
        Ok(phrases.iter().map(|p| json!({ "phrase": p })).collect())
    }

    fn article_matching(&self, articles: &[Article]) -> Result<ArticleMatch, BackendError> {
        self.record("article_matching");
        Ok(ArticleMatch {
            matched_articles: Vec::new(),
            articles_to_process: articles.to_vec(),
        })
    }

    fn reliability_analysis(
        &self,
        articles: &[Article],
        _question: &str,
    ) -> Result<Vec<Article>, BackendError> {
        self.record("reliability_analysis");
        Ok(articles.to_vec())
    }

    fn write_articles(&self, _summaries: &[Article]) -> Result<(), BackendError> {
        self.record("write_articles");
        Ok(())
    }

    fn all_articles(
        &self,
        summaries: &[Article],
        matched: &[Article],
    ) -> Result<Vec<Article>, BackendError> {
        self.record("all_articles");
        Ok(summaries.iter().chain(matched).cloned().collect())
    }

    fn generate_final_response(
        &self,
        _articles: &[Article],
        _question: &str,
    ) -> Result<FinalResponse, BackendError> {
        self.record("generate_final_response");
        *self.stored.lock().unwrap() = Some(stored_answer());
        Ok(FinalResponse {
            final_output: "Fiber helps [1].".to_string(),
            response_obj: json!({}),
        })
    }

    fn cached_answer(&self, _question: &str) -> Result<Option<AnswerPayload>, BackendError> {
        self.record("cached_answer");
        Ok(self.stored.lock().unwrap().clone())
    }

    fn similar_questions(&self, _question: &str) -> Result<Vec<SimilarQuestion>, BackendError> {
        self.record("similar_questions");
        Ok(vec![SimilarQuestion {
            score: 0.5,
            question: "Does fiber help?".to_string(),
        }])
    }
}

#[test]
fn generation_runs_stages_in_order_then_fetches_answer() {
    let backend = Arc::new(ScriptedBackend::new());
    let pipeline = AnswerPipeline::new(backend.clone());

    let mut stages = Vec::new();
    let generation = pipeline
        .generate("Is fiber good?", |stage| stages.push(*stage))
        .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "check_valid",
            "query_generation",
            "collect_articles",
            "article_matching",
            "reliability_analysis",
            "write_articles",
            "all_articles",
            "generate_final_response",
            "cached_answer",
        ]
    );
    assert_eq!(
        stages,
        vec![
            PipelineStage::Expanded,
            PipelineStage::Matched(0),
            PipelineStage::Processing(2),
            PipelineStage::Synthesizing,
        ]
    );

    let Generation::Answered(record) = generation else {
        panic!("expected stored answer");
    };
    assert_eq!(record.question, "Is fiber good?");
    assert_eq!(record.output, "Fiber helps [1].\nReferences:\n\n1. Doe J. Fiber. J Nutr.");
    assert_eq!(record.metadata["1. Doe J. Fiber. J Nutr."].pmid, "31");
}

#[test]
fn rejected_question_stops_after_screening() {
    let backend = Arc::new(ScriptedBackend::new());
    let pipeline = AnswerPipeline::new(backend.clone());

    let generation = pipeline.generate("Give me a recipe", |_| {}).unwrap();
    assert_eq!(
        generation,
        Generation::Rejected("Please speak to a dietitian.".to_string())
    );
    assert_eq!(backend.calls(), vec!["check_valid"]);
}

#[test]
fn stage_failure_propagates() {
    let backend = Arc::new(ScriptedBackend {
        fail_collection: true,
        ..ScriptedBackend::new()
    });
    let pipeline = AnswerPipeline::new(backend.clone());

    let result = pipeline.generate("Is fiber good?", |_| {});
    assert!(matches!(result, Err(BackendError::Http { status: 502 })));
    assert_eq!(backend.calls().last(), Some(&"collect_articles"));
}

#[test]
fn lookup_then_render_and_cache() {
    let backend = Arc::new(ScriptedBackend::new());
    *backend.stored.lock().unwrap() = Some(stored_answer());
    let pipeline = AnswerPipeline::new(backend).with_options(PipelineOptions {
        retain_all_articles: true,
    });

    let Lookup::Answered(record) = pipeline.lookup("Is fiber good?").unwrap() else {
        panic!("expected answer");
    };
    assert_eq!(record.articles.as_ref().map(Vec::len), Some(2));

    let references =
        build_reference_list(&record.output, &record.citations, &record.metadata).unwrap();
    assert_eq!(references.len(), 1);

    let cache = AnswerCache::in_memory().unwrap();
    cache.put(&record).unwrap();
    assert_eq!(cache.get("Is fiber good?").unwrap(), Some(record));
}

#[test]
fn missing_answer_offers_similar_questions() {
    let backend = Arc::new(ScriptedBackend::new());
    let pipeline = AnswerPipeline::new(backend.clone());

    let Lookup::Missing { similar } = pipeline.lookup("Is fiber good?").unwrap() else {
        panic!("expected no answer");
    };
    assert_eq!(similar[0].question, "Does fiber help?");
    assert_eq!(backend.calls(), vec!["cached_answer", "similar_questions"]);
}
