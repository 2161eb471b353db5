//! Unit tests for the chain module.
//!
//! The fixtures are shared with the downstream stages' tests.


mod classifier_tests;
