use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Surface form of a reference marker as it appeared in answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerForm {
    /// `[3]`
    Bracketed,
    /// `3.`
    Dotted,
}

/// An inline token in answer text pointing at a citation by index.
///
/// Two markers are equal when their embedded integers are equal; the surface
/// form only affects how the marker is displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferenceMarker {
    number: u32,
    form: MarkerForm,
}

impl ReferenceMarker {
    /// Creates a marker with an explicit surface form.
    pub fn new(number: u32, form: MarkerForm) -> Self {
        Self { number, form }
    }

    /// Creates a `[n]` marker.
    pub fn bracketed(number: u32) -> Self {
        Self::new(number, MarkerForm::Bracketed)
    }

    /// Creates an `n.` marker.
    pub fn dotted(number: u32) -> Self {
        Self::new(number, MarkerForm::Dotted)
    }

    /// Returns the embedded citation index.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the surface form.
    pub fn form(&self) -> MarkerForm {
        self.form
    }

    /// Parses a marker typed by a user: `[3]`, `3.` or a bare `3`.
    ///
    /// A bare number is treated as bracketed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dietnerd::{MarkerForm, ReferenceMarker};
    ///
    /// assert_eq!(ReferenceMarker::parse("[3]").map(|m| m.number()), Some(3));
    /// assert_eq!(ReferenceMarker::parse("3.").map(|m| m.form()), Some(MarkerForm::Dotted));
    /// assert_eq!(ReferenceMarker::parse("7").map(|m| m.form()), Some(MarkerForm::Bracketed));
    /// assert!(ReferenceMarker::parse("seven").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return inner.parse().ok().map(Self::bracketed);
        }
        if let Some(digits) = input.strip_suffix('.') {
            return digits.parse().ok().map(Self::dotted);
        }
        input.parse().ok().map(Self::bracketed)
    }
}

impl PartialEq for ReferenceMarker {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for ReferenceMarker {}

impl Hash for ReferenceMarker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl fmt::Display for ReferenceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            MarkerForm::Bracketed => write!(f, "[{}]", self.number),
            MarkerForm::Dotted => write!(f, "{}.", self.number),
        }
    }
}
