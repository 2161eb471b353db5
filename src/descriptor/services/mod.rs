//! Descriptor ingestion services.

pub mod ingest;

pub use ingest::{ingest, trim_reference};
