//! Trait abstractions the application implements.
//!
//! The estimation core is pure; fetching snippets is the one I/O seam.

pub mod source;
