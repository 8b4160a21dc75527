use regex::Regex;

use crate::postcode::{collapse_upper, Postcode};
use crate::Snapshot;

/// Postcode shape: one or two letters, a digit, an optional letter or digit,
/// optional whitespace, a digit, two letters. The canonical text is already
/// uppercased with whitespace collapsed, so the pattern only needs the
/// upper-case alphabet and at most one space.
const POSTCODE_PATTERN: &str = r"\b[A-Z]{1,2}[0-9][A-Z0-9]?\s?[0-9][A-Z]{2}\b";

/// One page of raw text after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    /// Uppercased text with whitespace runs collapsed, used for sentinel
    /// and keyword matching.
    pub canonical_text: String,
    /// Every postcode-shaped token found in the canonical text.
    pub found: Snapshot,
}

/// Turns raw page text into its canonical form and extracts postcodes.
///
/// Pure and deterministic: identical input always yields the identical
/// canonical text and snapshot.
#[derive(Debug, Clone)]
pub struct Normalizer {
    pattern: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(POSTCODE_PATTERN).expect("postcode pattern compiles"),
        }
    }

    pub fn normalize(&self, raw: &str) -> NormalizedPage {
        let canonical_text = collapse_upper(raw);
        let found = self
            .pattern
            .find_iter(&canonical_text)
            .map(|m| Postcode::new(m.as_str()))
            .collect();
        NormalizedPage {
            canonical_text,
            found,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
