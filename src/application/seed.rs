//! Seed snapshot format
//!
//! A session starts from a TOML list of teams:
//!
//! ```toml
//! [[teams]]
//! name = "BU1"
//! child_count = 2
//!
//! [[teams]]
//! name = "Team1"
//! parent = "BU1"
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Entity, TeamStore};

/// Ordered list of entities, as read from or written to TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub teams: Vec<Entity>,
}

impl Snapshot {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Capture the current store contents in insertion order.
    pub fn capture(store: &TeamStore) -> Self {
        Self {
            teams: store.entities().to_vec(),
        }
    }

    pub fn into_store(self) -> TeamStore {
        TeamStore::new(self.teams)
    }
}
