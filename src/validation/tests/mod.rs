//! Unit tests for rule derivation.
