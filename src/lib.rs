//! Content repository client for The insightArc.
//!
//! Blog posts and inspiration entries live in a GitHub repository as Markdown
//! files and `metadata.json` listings. This crate fetches them through the
//! GitHub contents API, decodes and splits them, and keeps timestamped copies
//! in a local cache so repeated reads stay off the network.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
