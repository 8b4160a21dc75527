use std::collections::BTreeSet;
use std::fmt;

/// Uppercases `raw` and collapses every internal whitespace run to a single
/// space. Whitespace is never inserted, only collapsed: `NE11AA` stays as is.
pub(crate) fn collapse_upper(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for part in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for ch in part.chars() {
            out.extend(ch.to_uppercase());
        }
    }
    out
}

/// A UK-postcode-shaped token in canonical form.
///
/// Construction always goes through [`Postcode::new`], so a stored value is
/// never raw page text. Equality and ordering are plain string comparison
/// on the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Postcode(String);

impl Postcode {
    pub fn new(raw: &str) -> Self {
        Self(collapse_upper(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of postcodes seen in one poll cycle.
///
/// Ordered so rendering is deterministic regardless of match order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    postcodes: BTreeSet<Postcode>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.postcodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.postcodes.len()
    }

    pub fn contains(&self, postcode: &Postcode) -> bool {
        self.postcodes.contains(postcode)
    }

    pub fn insert(&mut self, postcode: Postcode) {
        self.postcodes.insert(postcode);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Postcode> {
        self.postcodes.iter()
    }

    /// Sorted, comma-joined rendering used in messages and logs.
    pub fn to_list_string(&self) -> String {
        self.postcodes
            .iter()
            .map(Postcode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Postcode> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Postcode>>(iter: I) -> Self {
        Self {
            postcodes: iter.into_iter().collect(),
        }
    }
}
