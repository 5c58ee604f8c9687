//! Domain layer types and invariants.

pub mod content;
pub mod decode;
pub mod frontmatter;
pub mod search;
