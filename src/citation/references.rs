//! Cross-referencing answer text against the citation store.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{EvidenceQuality, MarkerForm, MetadataStore, ReferenceMarker};
use crate::render::escape_html;

use super::parser::{CitationParts, parse_citation};

/// Literal that separates the narrative from its reference list.
pub const REFERENCES_DELIMITER: &str = "References:";

/// Shown in place of a reference list when nothing resolves.
pub const NO_REFERENCES: &str = "No references available.";

/// `[n]` or `n.` anywhere in the references section.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]|(\d+)\.").expect("marker pattern is valid"));

/// Scans the text after `References:` for reference markers.
///
/// Markers are deduplicated by number in first-seen order. When a number
/// appears in both forms the bracketed form wins.
///
/// # Examples
///
/// ```
/// use dietnerd::citation::extract_references;
///
/// let markers = extract_references("Body [2].\n\nReferences:\n2.\n[1]\n[2]");
/// let shown: Vec<String> = markers.iter().map(ToString::to_string).collect();
/// assert_eq!(shown, vec!["[2]", "[1]"]);
/// assert!(extract_references("No section here [1]").is_empty());
/// ```
pub fn extract_references(answer: &str) -> Vec<ReferenceMarker> {
    let Some((_, section)) = answer.split_once(REFERENCES_DELIMITER) else {
        return Vec::new();
    };

    let mut seen: IndexMap<u32, MarkerForm> = IndexMap::new();
    for caps in MARKER.captures_iter(section) {
        let (digits, form) = match (caps.get(1), caps.get(2)) {
            (Some(digits), _) => (digits, MarkerForm::Bracketed),
            (None, Some(digits)) => (digits, MarkerForm::Dotted),
            (None, None) => continue,
        };
        let Ok(number) = digits.as_str().parse::<u32>() else {
            continue;
        };
        seen.entry(number)
            .and_modify(|existing| {
                if form == MarkerForm::Bracketed {
                    *existing = MarkerForm::Bracketed;
                }
            })
            .or_insert(form);
    }

    seen.into_iter()
        .map(|(number, form)| ReferenceMarker::new(number, form))
        .collect()
}

/// Returns the first citation that starts with `[n]` or `n.`.
pub fn find_citation<'a, S: AsRef<str>>(
    marker: &ReferenceMarker,
    citations: &'a [S],
) -> Option<&'a str> {
    let bracketed = format!("[{}]", marker.number());
    let dotted = format!("{}.", marker.number());
    citations
        .iter()
        .map(AsRef::as_ref)
        .find(|citation| citation.starts_with(&bracketed) || citation.starts_with(&dotted))
}

/// One resolved, display-ready reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub marker: ReferenceMarker,
    /// Exact citation string from the store.
    pub citation: String,
    pub parts: CitationParts,
    pub evidence: EvidenceQuality,
    pub url: String,
}

impl ReferenceEntry {
    /// Anchor to the reference detail view followed by the evidence badge.
    pub fn to_html(&self) -> String {
        let marker = escape_html(&self.marker.to_string());
        format!(
            r#"<a href="reference.html?ref={marker}" target="_blank"><strong>{marker} {title}</br>{authors}<br>{journal}</strong></a> - {badge}"#,
            title = escape_html(&self.parts.title),
            authors = escape_html(&self.parts.authors),
            journal = escape_html(&self.parts.journal),
            badge = evidence_badge(self.evidence),
        )
    }
}

/// Ordered reference list for one answer. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceList {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceList {
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; empty lists are represented as `None` by
    /// [`build_reference_list`].
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// HTML fragment with a `References:` heading.
    pub fn to_html(&self) -> String {
        let body = self
            .entries
            .iter()
            .map(ReferenceEntry::to_html)
            .collect::<Vec<_>>()
            .join("<br><br>");
        format!("<b>References:</b><br><br> {body}")
    }
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REFERENCES_DELIMITER}")?;
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(f, "{} {}", entry.marker, entry.parts.title)?;
            writeln!(f, "    {}", entry.parts.authors)?;
            if !entry.parts.journal.is_empty() {
                writeln!(f, "    {}", entry.parts.journal)?;
            }
            writeln!(f, "    ({})", entry.evidence)?;
        }
        Ok(())
    }
}

/// Resolves every marker in the answer's references section.
///
/// Markers without a citation, and citations without metadata, are skipped.
/// Returns `None` when nothing resolves.
pub fn build_reference_list<S: AsRef<str>>(
    answer: &str,
    citations: &[S],
    metadata: &MetadataStore,
) -> Option<ReferenceList> {
    let entries: Vec<ReferenceEntry> = extract_references(answer)
        .into_iter()
        .filter_map(|marker| {
            let Some(citation) = find_citation(&marker, citations) else {
                debug!(%marker, "no citation for reference marker");
                return None;
            };
            let Some(details) = metadata.get(citation) else {
                debug!(%marker, citation, "no metadata for citation");
                return None;
            };
            let parts = parse_citation(citation).unwrap_or_else(|err| {
                warn!(%marker, error = %err, "rendering malformed citation best-effort");
                err.into_partial()
            });
            Some(ReferenceEntry {
                marker,
                citation: citation.to_string(),
                parts,
                evidence: details.evidence(),
                url: details.url.clone(),
            })
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(ReferenceList { entries })
    }
}

/// HTML reference list, or [`NO_REFERENCES`] when nothing resolves.
pub fn render_references_html<S: AsRef<str>>(
    answer: &str,
    citations: &[S],
    metadata: &MetadataStore,
) -> String {
    build_reference_list(answer, citations, metadata)
        .map(|list| list.to_html())
        .unwrap_or_else(|| NO_REFERENCES.to_string())
}

fn evidence_badge(evidence: EvidenceQuality) -> String {
    const ICON_STYLE: &str = "width: 16px; height: 16px; vertical-align: middle; margin-right: 4px;";
    format!(
        r#"<span style="color: black; font-weight: bold; border: 1px solid {border}; padding: 2px 4px; background-color: rgba({rgb}, 0.1); display: inline-flex; align-items: center;"><img src="{icon}" alt="{label}" style="{ICON_STYLE}">{label}</span>"#,
        border = evidence.border_color(),
        rgb = evidence.background_rgb(),
        icon = evidence.icon(),
        label = evidence.label(),
    )
}
