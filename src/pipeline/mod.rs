//! Answer pipeline orchestration.
//!
//! This module provides `AnswerPipeline`, which sequences backend calls to
//! look up stored answers and to generate new ones.

mod orchestrator;
mod types;

pub use orchestrator::AnswerPipeline;
pub use types::{Generation, Lookup, PipelineOptions, PipelineStage};
