//! Frontmatter splitting for Markdown documents.
//!
//! The metadata block is read as flat `key: value` lines. Values stay strings;
//! there is no nesting, list or type coercion, and malformed lines are skipped
//! rather than reported.

use std::collections::BTreeMap;

use insightarc_api_types::BlogContent;

const DELIMITER: &str = "---";

/// A Markdown document split into frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub meta: BTreeMap<String, String>,
    pub body: String,
}

impl From<ParsedDocument> for BlogContent {
    fn from(doc: ParsedDocument) -> Self {
        BlogContent {
            meta: doc.meta,
            content: doc.body,
        }
    }
}

/// Split `content` into its leading `---` block and the remaining body.
///
/// When no block is found the metadata is empty and the body is the input
/// unchanged.
pub fn parse_frontmatter(content: &str) -> ParsedDocument {
    let normalized;
    let source = if content.contains("\r\n") {
        normalized = content.replace("\r\n", "\n");
        normalized.as_str()
    } else {
        content
    };

    match split_block(source) {
        Some((block, body)) => ParsedDocument {
            meta: parse_meta(block),
            body: body.to_string(),
        },
        None => ParsedDocument {
            meta: BTreeMap::new(),
            body: content.to_string(),
        },
    }
}

fn split_block(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .trim_start()
        .strip_prefix(DELIMITER)?
        .strip_prefix('\n')?;

    // The block holds at least one character before the closing delimiter.
    let first = rest.chars().next()?.len_utf8();
    let closing = format!("\n{DELIMITER}\n");
    let end = rest[first..].find(&closing)? + first;
    Some((&rest[..end], &rest[end + closing.len()..]))
}

fn parse_meta(block: &str) -> BTreeMap<String, String> {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
