pub mod backend;
pub mod cache;
pub mod citation;
pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use backend::{BackendClient, BackendClientBuilder, BackendClientTrait, BackendError};
pub use cache::AnswerCache;
pub use citation::{ReferenceList, build_reference_list, extract_references, parse_citation};
pub use config::Config;
pub use export::{EXPORT_FILE_NAME, ExportError, save_pdf};
pub use models::{
    AnswerRecord, CitationMetadata, EvidenceQuality, MarkerForm, MetadataStore, ReferenceMarker,
};
pub use pipeline::{AnswerPipeline, Generation, Lookup, PipelineOptions, PipelineStage};
