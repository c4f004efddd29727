const FENCE: &str = "```";
const LANGUAGE_TAG: &str = "html";

/// Remove Markdown code-fence delimiters (and an `html` tag right after one),
/// then trim.
///
/// Stripping repeats until no delimiter is left, so the result is stable
/// under a second application.
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.to_string();
    while current.contains(FENCE) {
        current = remove_fences_once(&current);
    }
    current.trim().to_string()
}

fn remove_fences_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(FENCE) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + FENCE.len()..];
        if rest
            .get(..LANGUAGE_TAG.len())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(LANGUAGE_TAG))
        {
            rest = &rest[LANGUAGE_TAG.len()..];
        }
    }
    out.push_str(rest);
    out
}
