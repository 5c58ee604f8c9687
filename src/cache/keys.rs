//! Cache key definitions.

use crate::domain::content::{ContentKind, markdown_stem};

pub const BLOG_LIST_KEY: &str = "blog-list-cache";
pub const INSPIRATION_LIST_KEY: &str = "inspiration-list-cache";

/// Key holding the cached listing of `kind`.
pub fn list_key(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Blog => BLOG_LIST_KEY,
        ContentKind::Inspiration => INSPIRATION_LIST_KEY,
    }
}

/// Key holding one parsed blog document.
pub fn content_key(file_name: &str) -> String {
    format!("blog-content-{}", markdown_stem(file_name))
}
