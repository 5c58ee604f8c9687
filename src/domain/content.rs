use std::fmt;

use serde::Serialize;

/// File holding the listing of one content kind, relative to its base path.
pub const METADATA_FILE: &str = "metadata.json";

const MARKDOWN_EXTENSION: &str = ".md";

/// The two families of content kept in the content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Blog,
    Inspiration,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Inspiration => "inspiration",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one content kind lives in the repository and how long its cached
/// copies stay fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSource {
    pub base_path: String,
    /// Zero or negative means cached entries never expire.
    pub cache_expire_hours: f64,
}

impl ContentSource {
    pub fn new(base_path: impl Into<String>, cache_expire_hours: f64) -> Self {
        Self {
            base_path: base_path.into().trim_matches('/').to_string(),
            cache_expire_hours,
        }
    }

    /// Repository-relative path of a file below this source's base path.
    pub fn path_for(&self, file: &str) -> String {
        let file = file.trim_start_matches('/');
        if self.base_path.is_empty() {
            file.to_string()
        } else {
            format!("{}/{file}", self.base_path)
        }
    }

    pub fn metadata_path(&self) -> String {
        self.path_for(METADATA_FILE)
    }

    /// Path of a Markdown document; a trailing `.md` on `file_name` is not doubled.
    pub fn markdown_path(&self, file_name: &str) -> String {
        self.path_for(&format!("{}{MARKDOWN_EXTENSION}", markdown_stem(file_name)))
    }
}

/// Base path and expiry for each content kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSources {
    pub blog: ContentSource,
    pub inspiration: ContentSource,
}

impl ContentSources {
    pub fn get(&self, kind: ContentKind) -> &ContentSource {
        match kind {
            ContentKind::Blog => &self.blog,
            ContentKind::Inspiration => &self.inspiration,
        }
    }
}

/// Strip a trailing `.md` extension, if any.
pub fn markdown_stem(file_name: &str) -> &str {
    file_name
        .strip_suffix(MARKDOWN_EXTENSION)
        .unwrap_or(file_name)
}
