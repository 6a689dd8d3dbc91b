//! Tag extraction and tag-filter helpers.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use shelf_entity::item::Item;

static HASHTAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"#([가-힣a-zA-Z0-9_]+)").ok());

/// Hashtags in `text`, without the `#`, unique in first-seen order.
///
/// A tag is Hangul syllables, ASCII letters, digits, and `_`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let Some(pattern) = HASHTAG.as_ref() else {
        return Vec::new();
    };
    normalize_tags(pattern.captures_iter(text).map(|c| c[1].to_string()))
}

/// Trim every tag, drop empties and exact duplicates, keep order.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Every tag used by `items`, sorted and unique.
pub fn available_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|i| i.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Items carrying every one of `selected`. An empty selection keeps all.
pub fn filter_by_tags<'a>(items: &'a [Item], selected: &[String]) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| selected.iter().all(|tag| item.has_tag(tag)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hangul_and_ascii() {
        let tags = extract_hashtags("#GPT 로 #글쓰기 하기, #code_review and #GPT again");
        assert_eq!(tags, vec!["GPT", "글쓰기", "code_review"]);
    }

    #[test]
    fn test_extract_stops_at_punctuation() {
        assert_eq!(extract_hashtags("see #rust-lang!"), vec!["rust"]);
        assert!(extract_hashtags("no tags # here").is_empty());
    }

    #[test]
    fn test_normalize_keeps_case_and_order() {
        let tags = normalize_tags(
            [" AI ", "ai", "", "AI", "prompt"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(tags, vec!["AI", "ai", "prompt"]);
    }
}
