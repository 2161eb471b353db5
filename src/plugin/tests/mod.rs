//! Unit tests for the plugin protocol.

mod fixtures;
