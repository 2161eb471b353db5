//! Rule derivation services.

pub mod deriver;

pub use deriver::RuleDeriver;
