//! Utility modules for the blog indexer.

pub mod date;
