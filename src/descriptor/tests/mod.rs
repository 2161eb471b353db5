//! Unit tests for descriptor ingestion and the annotation carriers.

mod carrier_tests;
mod kind_tests;
