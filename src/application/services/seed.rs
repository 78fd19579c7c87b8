//! Seed snapshot loading

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, Snapshot};
use crate::domain::{NamePolicy, TeamStore};
use crate::infrastructure::traits::FileSystem;

/// Reads initial snapshots for new sessions.
pub struct SeedService {
    fs: Arc<dyn FileSystem>,
}

impl SeedService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse a TOML seed file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Snapshot> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::Seed {
                path: path.to_path_buf(),
                message: "file not found".into(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read seed file", path)?;
        let snapshot = Snapshot::from_toml(&content).map_err(|e| ApplicationError::Seed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("loaded {} teams", snapshot.teams.len());
        Ok(snapshot)
    }

    /// Build a store from an optional seed file; no file means an empty store.
    pub fn open_store(
        &self,
        seed: Option<&Path>,
        policy: NamePolicy,
    ) -> ApplicationResult<TeamStore> {
        let snapshot = match seed {
            Some(path) => self.load(path)?,
            None => Snapshot::default(),
        };
        let store = snapshot.into_store().with_policy(policy);
        debug!("opened store: {} teams, {:?} names", store.len(), store.policy());
        Ok(store)
    }
}
