//! Architecture rules: node queries, evaluation, the built-in catalog and rule documents.

mod catalog;
mod engine;
mod loader;
mod query;

pub use catalog::{builtin_rules, NO_CONTROLLER_TO_REPOSITORY, NO_DOMAIN_TO_INFRASTRUCTURE};
pub use engine::{ArchitectureRule, CompiledRule, RuleEngine, RuleViolation};
pub use loader::{LayerSpec, LayeringRule, RuleDefinition, RuleLoader, RuleSet, VisibilityRule};
pub use query::{glob_to_regex, CompiledQuery, NodeQuery};
