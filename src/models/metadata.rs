use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sentinel the backend uses for a missing PubMed identifier.
pub const ABSENT_IDENTIFIER: &str = "None";

/// Citation string → metadata, in the order the backend supplied them.
pub type MetadataStore = IndexMap<String, CitationMetadata>;

/// Backend-supplied details for one citation string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMetadata {
    /// Reliability-analysis summary of the article.
    #[serde(rename = "Summary", default, deserialize_with = "nullable_text")]
    pub summary: String,
    /// PubMed identifier, or [`ABSENT_IDENTIFIER`].
    #[serde(rename = "PMID", default = "absent", deserialize_with = "identifier")]
    pub pmid: String,
    /// PubMed Central identifier, or [`ABSENT_IDENTIFIER`] when only the
    /// abstract was available.
    #[serde(rename = "PMCID", default = "absent", deserialize_with = "identifier")]
    pub pmcid: String,
    /// Link to the article.
    #[serde(rename = "URL", default, deserialize_with = "nullable_text")]
    pub url: String,
}

impl CitationMetadata {
    /// Classifies how much of the article the backend analyzed.
    pub fn evidence(&self) -> EvidenceQuality {
        if self.pmcid == ABSENT_IDENTIFIER {
            EvidenceQuality::AbstractOnly
        } else {
            EvidenceQuality::FullText
        }
    }
}

/// Whether a reference was analyzed from its full text or its abstract only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceQuality {
    FullText,
    AbstractOnly,
}

impl EvidenceQuality {
    /// Human-readable badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FullText => "Full Text Analysis",
            Self::AbstractOnly => "Abstract Only Analysis",
        }
    }

    /// Badge icon path, relative to the page.
    pub fn icon(self) -> &'static str {
        match self {
            Self::FullText => "assets/full_text.png",
            Self::AbstractOnly => "assets/abstract.png",
        }
    }

    /// Badge border color.
    pub fn border_color(self) -> &'static str {
        match self {
            Self::FullText => "green",
            Self::AbstractOnly => "yellow",
        }
    }

    /// RGB triple for the translucent badge background.
    pub fn background_rgb(self) -> &'static str {
        match self {
            Self::FullText => "0, 128, 0",
            Self::AbstractOnly => "255, 255, 0",
        }
    }
}

impl fmt::Display for EvidenceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn absent() -> String {
    ABSENT_IDENTIFIER.to_string()
}

/// Accepts strings, numbers and null; null maps to [`ABSENT_IDENTIFIER`].
fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => absent(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
