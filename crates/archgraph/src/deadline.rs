//! Cooperative deadlines for long-running queries.
//!
//! Traversal, cycle search and rule scans check their deadline once per expanded
//! node and bail out with [`GraphError::DeadlineExceeded`].

use crate::error::{GraphError, Result};
use std::time::{Duration, Instant};

/// Point in time after which a query gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self(None)
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now().checked_add(timeout))
    }

    /// A deadline from an optional timeout (`None` never expires).
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map(Self::after).unwrap_or_default()
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail with [`GraphError::DeadlineExceeded`] once the deadline has passed.
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_expired() {
            return Err(GraphError::DeadlineExceeded {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}
