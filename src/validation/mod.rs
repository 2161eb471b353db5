//! Validator specifications derived from declared constraints.
//!
//! Each field's `required`, `min`/`max`, `in` and `is` directives become an
//! ordered rule list, type-checked against the field kind. Message fields
//! whose type needs validation get a nested rule invoking that message's
//! validator.

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;

pub use domain::{FieldRules, Format, MemberSet, MessageRules, Number, OneofRules, Rule};
pub use error::{RuleError, RuleResult};
pub use services::RuleDeriver;
