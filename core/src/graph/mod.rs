//! Dependency graph controller.
//!
//! Owns the constructed entities in an order that is always a topological
//! order of their dependency DAG, and propagates recomputation through it.

pub mod dag;
pub use dag::ConstructionGraph;

#[cfg(test)]
mod tests_propagation;

use crate::construct::{EntityId, RuleError};
use crate::scene::PlacementHandle;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Connecting {entity} onto {target} would create a cycle")]
    CycleRejected { entity: EntityId, target: EntityId },

    #[error("Entity {0} is not a free point and cannot be connected")]
    NotConnectable(EntityId),

    #[error("Entity {0} is derived and cannot be placed directly")]
    NotManual(EntityId),

    #[error("Scene has no instance for placement {0:?}")]
    StalePlacement(PlacementHandle),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

pub type GraphResult<T> = Result<T, GraphError>;
