mod answer;
mod marker;
mod metadata;

pub use answer::{AnswerPayload, AnswerRecord, normalize_numbered_lines};
pub use marker::{MarkerForm, ReferenceMarker};
pub use metadata::{ABSENT_IDENTIFIER, CitationMetadata, EvidenceQuality, MetadataStore};
