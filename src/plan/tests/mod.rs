//! Unit tests for configuration and the generation pipeline.

mod pipeline_tests;
