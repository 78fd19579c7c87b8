//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{BrowserService, SeedService, SessionService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::TeamStore;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn seed_service(&self) -> SeedService {
        SeedService::new(Arc::clone(&self.fs))
    }

    pub fn browser(&self) -> BrowserService {
        BrowserService::new(self.settings.tree.clone())
    }

    /// Open a store from `seed`, falling back to the configured seed file.
    pub fn open_store(&self, seed: Option<&Path>) -> ApplicationResult<TeamStore> {
        let seed = seed.or(self.settings.seed_file.as_deref());
        self.seed_service().open_store(seed, self.settings.name_policy())
    }

    /// Start a session for `organization` (configured organization when `None`).
    pub fn open_session(
        &self,
        seed: Option<&Path>,
        organization: Option<&str>,
    ) -> ApplicationResult<SessionService> {
        let store = self.open_store(seed)?;
        let organization = organization.unwrap_or(&self.settings.organization);
        Ok(SessionService::new(store, organization, self.browser()))
    }
}
