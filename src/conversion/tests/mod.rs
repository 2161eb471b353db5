//! Unit tests for converter, method and receiver specification.

mod method_tests;
