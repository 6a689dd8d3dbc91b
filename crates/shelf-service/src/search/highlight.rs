//! Keyword highlighting.

use regex::RegexBuilder;

/// Wraps every case-insensitive occurrence of `keyword` in
/// `<mark>…</mark>`. The keyword is matched literally.
pub fn highlight(text: &str, keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern.replace_all(text, "<mark>${0}</mark>").into_owned(),
        Err(_) => text.to_string(),
    }
}
