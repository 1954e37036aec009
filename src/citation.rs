//! Citation engine.
//!
//! Parses backend citation strings, pulls reference markers out of answer
//! text and resolves them against the citation store and its metadata. All
//! functions are pure: callers pass the current [`AnswerRecord`] snapshot in.
//!
//! [`AnswerRecord`]: crate::models::AnswerRecord
mod detail;
mod parser;
mod references;

pub use detail::{ReferenceDetail, citation_number, reference_detail};
pub use parser::{CitationError, CitationParts, parse_citation};
pub use references::{
    NO_REFERENCES, REFERENCES_DELIMITER, ReferenceEntry, ReferenceList, build_reference_list,
    extract_references, find_citation, render_references_html,
};
