//! Reference detail view: one citation's metadata, looked up by marker.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{EvidenceQuality, MetadataStore, ReferenceMarker};
use crate::render::{escape_html, inline_format};

use super::parser::{CitationParts, parse_citation};

static CITATION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?(\d+)\]?\.?").expect("citation number pattern is valid"));

const NOT_FOUND: &str = "Reference content not found.";

/// Leading index of a citation string, e.g. `3` for `[3] Doe J. ...`.
pub fn citation_number(citation: &str) -> Option<u32> {
    CITATION_NUMBER
        .captures(citation)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Everything the detail view shows for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDetail {
    pub marker: ReferenceMarker,
    pub citation: String,
    pub parts: CitationParts,
    pub summary: String,
    pub url: String,
    pub pmcid: String,
    pub evidence: EvidenceQuality,
}

impl ReferenceDetail {
    /// Linked title, authors and journal above the formatted summary.
    pub fn to_html(&self) -> String {
        let summary = if self.summary.is_empty() {
            NOT_FOUND
        } else {
            self.summary.as_str()
        };
        let content = format!(
            r#"<strong><a href="{url}" target="_blank">{title}</a></br>{authors}<br>{journal}</strong><br><br>{summary}"#,
            url = escape_html(&self.url),
            title = escape_html(&self.parts.title),
            authors = escape_html(&self.parts.authors),
            journal = escape_html(&self.parts.journal),
        );
        inline_format(&content)
    }
}

impl fmt::Display for ReferenceDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.marker, self.parts.title)?;
        writeln!(f, "{}", self.parts.authors)?;
        writeln!(f, "{}", self.parts.journal)?;
        writeln!(f, "{} ({})", self.url, self.evidence)?;
        writeln!(f)?;
        if self.summary.is_empty() {
            writeln!(f, "{NOT_FOUND}")
        } else {
            writeln!(f, "{}", self.summary)
        }
    }
}

/// Finds the first metadata entry whose citation index matches the marker.
pub fn reference_detail(
    marker: &ReferenceMarker,
    metadata: &MetadataStore,
) -> Option<ReferenceDetail> {
    metadata
        .iter()
        .find(|(citation, _)| citation_number(citation) == Some(marker.number()))
        .map(|(citation, details)| ReferenceDetail {
            marker: *marker,
            citation: citation.clone(),
            parts: parse_citation(citation).unwrap_or_else(|err| err.into_partial()),
            summary: details.summary.clone(),
            url: details.url.clone(),
            pmcid: details.pmcid.clone(),
            evidence: details.evidence(),
        })
}
