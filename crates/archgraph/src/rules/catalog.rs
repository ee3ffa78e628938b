//! Built-in rule catalog.

use super::engine::ArchitectureRule;
use super::query::NodeQuery;
use crate::graph::{EdgeType, Severity};

/// Controllers must not depend on repositories directly.
pub const NO_CONTROLLER_TO_REPOSITORY: &str = "no-controller-to-repository";
/// Domain code must not depend on infrastructure code.
pub const NO_DOMAIN_TO_INFRASTRUCTURE: &str = "no-domain-to-infrastructure";

/// Rules every evaluation starts from. Loaded documents override them by id.
pub fn builtin_rules() -> Vec<ArchitectureRule> {
    vec![
        ArchitectureRule::new(
            NO_CONTROLLER_TO_REPOSITORY,
            Severity::Error,
            NodeQuery::new().named("*Controller"),
            EdgeType::DependsOn,
            NodeQuery::new().named("*Repository"),
        )
        .with_name("No controller to repository")
        .with_description("Controllers should go through a service instead of using repositories"),
        ArchitectureRule::new(
            NO_DOMAIN_TO_INFRASTRUCTURE,
            Severity::Error,
            NodeQuery::new().in_namespace("*.Domain*"),
            EdgeType::DependsOn,
            NodeQuery::new().in_namespace("*.Infrastructure*"),
        )
        .with_name("No domain to infrastructure")
        .with_description("The domain layer must not depend on infrastructure"),
    ]
}
