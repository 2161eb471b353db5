//! Domain types for validation rules.

pub mod rule;

pub use rule::{FieldRules, Format, MemberSet, MessageRules, Number, OneofRules, Rule};
