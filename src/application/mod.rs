//! Application services: the content repository client and its error types.

pub mod error;
pub mod inflight;
pub mod repository;
