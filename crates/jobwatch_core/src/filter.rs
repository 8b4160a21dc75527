use std::collections::BTreeSet;

use crate::postcode::collapse_upper;
use crate::{NormalizedPage, Postcode, Snapshot};

/// What one poll cycle's page amounts to after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The page carries the configured "no jobs" banner.
    Cleared,
    /// An ignored service keyword vetoes the whole page.
    Suppressed,
    /// No postcode-shaped tokens and no banner. Treated as a potential
    /// undetected change rather than silence, at the cost of false
    /// positives if the page format shifts.
    Unparsed,
    /// Postcodes found, minus the ignored set. May be empty.
    Jobs(Snapshot),
}

/// Filtering rules for a run, immutable once the watcher starts.
///
/// All needles are canonicalized at construction so matching against the
/// canonical page text is case-insensitive by construction.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    ignored_postcodes: BTreeSet<Postcode>,
    ignored_keywords: Vec<String>,
    no_jobs_text: Option<String>,
}

impl FilterConfig {
    pub fn new<I, J>(no_jobs_text: &str, ignored_postcodes: I, ignored_keywords: J) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        // An empty needle would match every haystack; drop empties here.
        let no_jobs_text = Some(collapse_upper(no_jobs_text)).filter(|s| !s.is_empty());
        let ignored_postcodes = ignored_postcodes
            .into_iter()
            .map(|raw| Postcode::new(raw.as_ref()))
            .filter(|pc| !pc.as_str().is_empty())
            .collect();
        let ignored_keywords = ignored_keywords
            .into_iter()
            .map(|raw| collapse_upper(raw.as_ref()))
            .filter(|kw| !kw.is_empty())
            .collect();
        Self {
            ignored_postcodes,
            ignored_keywords,
            no_jobs_text,
        }
    }

    /// Applies the rules to a normalized page.
    ///
    /// The banner overrides everything else; the keyword veto is a coarse
    /// whole-page decision independent of which postcodes were found.
    pub fn apply(&self, page: &NormalizedPage) -> ScanOutcome {
        if let Some(banner) = &self.no_jobs_text {
            if page.canonical_text.contains(banner.as_str()) {
                return ScanOutcome::Cleared;
            }
        }
        if self
            .ignored_keywords
            .iter()
            .any(|kw| page.canonical_text.contains(kw.as_str()))
        {
            return ScanOutcome::Suppressed;
        }
        if page.found.is_empty() {
            return ScanOutcome::Unparsed;
        }
        let kept = page
            .found
            .iter()
            .filter(|pc| !self.ignored_postcodes.contains(pc))
            .cloned()
            .collect();
        ScanOutcome::Jobs(kept)
    }
}
