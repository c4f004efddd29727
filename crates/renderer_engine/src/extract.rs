use scraper::{Html, Selector};

/// Reduce a full HTML document to the inner HTML of its `<body>`.
///
/// Only markup that opens with an `<html>` or `<body>` tag (after optional
/// whitespace, comments and a doctype) counts as a document; anything else is
/// already a fragment and is returned unchanged.
pub fn unwrap_document(markup: &str) -> String {
    if !has_document_wrapper(markup) {
        return markup.to_string();
    }

    let doc = Html::parse_document(markup);
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|node| node.inner_html()));

    match body {
        Some(inner) => inner.trim().to_string(),
        None => markup.to_string(),
    }
}

fn has_document_wrapper(markup: &str) -> bool {
    let mut rest = markup.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = after[end + 3..].trim_start(),
                None => return false,
            }
        } else if starts_with_ignore_case(rest, "<!doctype") {
            match rest.find('>') {
                Some(end) => rest = rest[end + 1..].trim_start(),
                None => return false,
            }
        } else {
            break;
        }
    }
    opens_tag(rest, "html") || opens_tag(rest, "body")
}

/// `text` starts with `<name` followed by whitespace, `>` or `/`.
fn opens_tag(text: &str, name: &str) -> bool {
    let Some(rest) = text.strip_prefix('<') else {
        return false;
    };
    if !starts_with_ignore_case(rest, name) {
        return false;
    }
    matches!(
        rest[name.len()..].chars().next(),
        Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/'
    )
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
