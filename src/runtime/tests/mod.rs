//! Unit tests for the runtime interpreters and the service chain.

mod chain_tests;
mod fixtures;
