//! Unit tests for rendering and writing generated units.

mod write_tests;
