pub mod access;
pub mod rules;

pub use access::{Access, AccessGate, apply};
pub use rules::{MethodMatcher, Rule, RuleSet, RuleSpec};
