//! Domain layer: entities and the team store
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod store;

pub use arena::{NodeData, TeamTree, TreeNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use store::{NamePolicy, TeamStore};
