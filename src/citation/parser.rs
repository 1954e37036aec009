//! Grammar for backend citation strings.
//!
//! A citation looks like `[3] Doe J, Roe K. Fiber and satiety. J Nutr. 2020;150:1-9.`:
//! an index header, then authors up to the first period, a title up to the
//! next period, and a journal/venue string that takes the rest verbatim.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// `[3]`, `[3].` or `3.` followed by optional whitespace.
static INDEX_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[(\d+)\]\.?|(\d+)\.)\s*").expect("index header pattern is valid")
});

/// The three display segments of a citation plus its index.
///
/// The public segments are trimmed for display; the untrimmed text between
/// delimiters is kept so [`CitationParts::body`] reproduces the input exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationParts {
    pub index: Option<u32>,
    pub authors: String,
    pub title: String,
    pub journal: String,
    raw: Vec<String>,
}

impl CitationParts {
    /// The citation text after its index header, reassembled from the
    /// untrimmed segments.
    pub fn body(&self) -> String {
        self.raw.join(".")
    }
}

/// A citation that does not follow the `header authors. title. journal` grammar.
///
/// Each variant keeps a best-effort split so callers can still render
/// something instead of dropping the entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("citation has no index header: {citation:?}")]
    MissingIndex {
        citation: String,
        partial: CitationParts,
    },

    #[error("citation has {found} of 2 period delimiters after its header: {citation:?}")]
    MissingPeriods {
        citation: String,
        found: usize,
        partial: CitationParts,
    },
}

impl CitationError {
    /// Returns the best-effort segments.
    pub fn partial(&self) -> &CitationParts {
        match self {
            Self::MissingIndex { partial, .. } | Self::MissingPeriods { partial, .. } => partial,
        }
    }

    /// Consumes the error, returning the best-effort segments.
    pub fn into_partial(self) -> CitationParts {
        match self {
            Self::MissingIndex { partial, .. } | Self::MissingPeriods { partial, .. } => partial,
        }
    }
}

/// Splits a citation string into index, authors, title and journal.
///
/// Periods inside the title or journal beyond the first two delimiters stay
/// in the journal segment. Segments are whitespace-trimmed.
///
/// # Examples
///
/// ```
/// use dietnerd::citation::parse_citation;
///
/// let parts = parse_citation("[1] Doe J. Fiber and you. J Nutr. 2020.").unwrap();
/// assert_eq!(parts.index, Some(1));
/// assert_eq!(parts.authors, "Doe J");
/// assert_eq!(parts.title, "Fiber and you");
/// assert_eq!(parts.journal, "J Nutr. 2020.");
/// ```
pub fn parse_citation(citation: &str) -> Result<CitationParts, CitationError> {
    let Some(header) = INDEX_HEADER.captures(citation) else {
        let (partial, _) = carve(citation, None);
        return Err(CitationError::MissingIndex {
            citation: citation.to_string(),
            partial,
        });
    };

    let index = header
        .get(1)
        .or_else(|| header.get(2))
        .and_then(|digits| digits.as_str().parse().ok());
    let body = &citation[header.get(0).map_or(0, |m| m.end())..];

    let (parts, found) = carve(body, index);
    if found < 2 {
        return Err(CitationError::MissingPeriods {
            citation: citation.to_string(),
            found,
            partial: parts,
        });
    }
    Ok(parts)
}

/// Splits at the first two periods, returning the parts and how many
/// delimiters were present.
fn carve(body: &str, index: Option<u32>) -> (CitationParts, usize) {
    let raw: Vec<String> = body.splitn(3, '.').map(str::to_string).collect();
    let segment = |i: usize| raw.get(i).map_or("", |s| s.trim()).to_string();

    let parts = CitationParts {
        index,
        authors: segment(0),
        title: segment(1),
        journal: segment(2),
        raw: raw.clone(),
    };
    (parts, raw.len().saturating_sub(1))
}
