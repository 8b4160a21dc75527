use scraper::{Html, Selector};

/// Reduces an HTML document to the plain text of its `<body>`, text nodes
/// trimmed and joined by single spaces. Falls back to the whole document
/// when there is no body element.
pub fn page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body_sel = Selector::parse("body").ok();

    let mut out = String::new();
    if let Some(sel) = body_sel.as_ref() {
        if let Some(body) = doc.select(sel).next() {
            for piece in body.text() {
                append_piece(&mut out, piece);
            }
            return out;
        }
    }
    for piece in doc.root_element().text() {
        append_piece(&mut out, piece);
    }
    out
}

fn append_piece(out: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(piece);
}
