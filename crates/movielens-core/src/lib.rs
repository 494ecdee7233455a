//! Core types and trait definitions for the MovieLens catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends and the metadata client depend on it, never the reverse.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod metadata;
pub mod movie;
pub mod source;
pub mod store;

pub use error::{Classify, Error, FailureKind, Result};
