//! Substring search over listing items.

use insightarc_api_types::ContentItem;
use serde::Serialize;

/// Matches for one listing, bucketed by the field that matched.
///
/// An item appears in every bucket whose field contains the query, and
/// buckets keep listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: Vec<ContentItem>,
    pub author: Vec<ContentItem>,
    pub category: Vec<ContentItem>,
    pub tag: Vec<ContentItem>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.category.is_empty()
            && self.tag.is_empty()
    }
}

/// Normalise a raw query; `None` when nothing is left to search for.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Case-insensitive substring search over `items`.
pub fn search_items(query: &str, items: &[ContentItem]) -> SearchResult {
    let Some(needle) = normalize_query(query) else {
        return SearchResult::default();
    };

    SearchResult {
        title: filter_field(items, &needle, |item| item.title.as_deref()),
        author: filter_field(items, &needle, |item| item.author.as_deref()),
        category: filter_field(items, &needle, |item| item.category.as_deref()),
        tag: items
            .iter()
            .filter(|item| item.tags.iter().any(|tag| contains(&tag.title, &needle)))
            .cloned()
            .collect(),
    }
}

fn filter_field(
    items: &[ContentItem],
    needle: &str,
    field: impl Fn(&ContentItem) -> Option<&str>,
) -> Vec<ContentItem> {
    items
        .iter()
        .filter(|item| field(item).is_some_and(|value| contains(value, needle)))
        .cloned()
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use insightarc_api_types::Tag;

    use super::*;

    fn item(id: &str, title: &str, author: &str, category: &str, tags: &[&str]) -> ContentItem {
        ContentItem {
            id: id.into(),
            title: Some(title.into()),
            description: None,
            cover_image: String::new(),
            time_stamp: None,
            link: None,
            slug: None,
            category: Some(category.into()),
            author: Some(author.into()),
            tags: tags
                .iter()
                .map(|t| Tag {
                    title: (*t).into(),
                    link: format!("/tags/{t}"),
                })
                .collect(),
            ratio: None,
        }
    }

    fn sample() -> Vec<ContentItem> {
        vec![
            item("1", "Rust ownership", "Alice", "Engineering", &["rust", "memory"]),
            item("2", "Travel notes", "Bob", "Life", &["travel"]),
            item("3", "Trusting the process", "Carol", "Essays", &["mindset"]),
        ]
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn buckets_matches_by_field() {
        let result = search_items("RUST", &sample());
        assert_eq!(ids(&result.title), ["1", "3"]);
        assert!(result.author.is_empty());
        assert!(result.category.is_empty());
        assert_eq!(ids(&result.tag), ["1"]);
    }

    #[test]
    fn matches_author_and_category() {
        let result = search_items("  bob ", &sample());
        assert_eq!(ids(&result.author), ["2"]);

        let result = search_items("life", &sample());
        assert_eq!(ids(&result.category), ["2"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(search_items("   ", &sample()).is_empty());
        assert_eq!(normalize_query("\t"), None);
    }

    #[test]
    fn missing_fields_never_match() {
        let mut bare = item("4", "", "", "", &[]);
        bare.title = None;
        bare.author = None;
        bare.category = None;
        assert!(search_items("a", &[bare]).is_empty());
    }
}
