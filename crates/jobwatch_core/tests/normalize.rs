use jobwatch_core::{Normalizer, Postcode, Snapshot};

fn snapshot(codes: &[&str]) -> Snapshot {
    codes.iter().map(|code| Postcode::new(code)).collect()
}

#[test]
fn normalization_is_deterministic() {
    let normalizer = Normalizer::new();
    let raw = "Jobs:\n ne1 1aa \t NE27   0bt\nne1 1aa";

    let first = normalizer.normalize(raw);
    let second = normalizer.normalize(raw);

    assert_eq!(first, second);
    assert_eq!(first.found, snapshot(&["NE1 1AA", "NE27 0BT"]));
}

#[test]
fn canonical_text_is_uppercased_and_collapsed() {
    let page = Normalizer::new().normalize("  No jobs\n\tavailable   today ");
    assert_eq!(page.canonical_text, "NO JOBS AVAILABLE TODAY");
}

#[test]
fn finds_postcodes_in_messy_text() {
    let page = Normalizer::new().normalize(
        "Gas safety check, area sr5\u{a0}2lt. Second visit: Ne1 1aa (confirmed).",
    );
    assert_eq!(page.found, snapshot(&["SR5 2LT", "NE1 1AA"]));
}

#[test]
fn duplicate_matches_collapse_into_a_set() {
    let page = Normalizer::new().normalize("NE1 1AA, ne1 1aa and NE1  1AA again");
    assert_eq!(page.found.len(), 1);
}

#[test]
fn compact_postcodes_keep_their_shape() {
    // Whitespace is collapsed, never inserted: NE11AA is not NE1 1AA.
    let page = Normalizer::new().normalize("drop-off NE11AA");
    assert_eq!(page.found, snapshot(&["NE11AA"]));
    assert!(!page.found.contains(&Postcode::new("NE1 1AA")));
}

#[test]
fn embedded_words_do_not_match() {
    let page = Normalizer::new().normalize("REFERENCE ANE11AAX does not count");
    assert!(page.found.is_empty());
}
