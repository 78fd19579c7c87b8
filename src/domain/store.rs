//! In-memory team store
//!
//! A flat, insertion-ordered collection of entities. Hierarchy exists only
//! through `parent` names, so the tree is browsed one level at a time with
//! [`TeamStore::list_children`].

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::entities::{Entity, Filters};
use crate::domain::error::{DomainError, DomainResult};

/// How `insert`/`remove` treat an empty `name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Accept any name, including the empty one.
    #[default]
    Permissive,
    /// Reject an empty name with [`DomainError::InvalidArgument`].
    Strict,
}

/// Hierarchical entity store owned by a single session.
///
/// The organization passed to `insert`/`remove` is opaque context: it is
/// recorded in the tracing span and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct TeamStore {
    entities: Vec<Entity>,
    policy: NamePolicy,
}

impl TeamStore {
    /// Create a store from an initial snapshot (possibly empty).
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            policy: NamePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    /// List one level of the hierarchy, in insertion order.
    ///
    /// Matches on exact parent equality: grandchildren are never returned.
    /// Without a `parent` key only root entities are returned.
    #[instrument(level = "debug", skip(self))]
    pub fn list_children(&self, filters: &Filters) -> Vec<Entity> {
        let children: Vec<Entity> = self
            .entities
            .iter()
            .filter(|e| filters.matches(e))
            .cloned()
            .collect();
        debug!("list_children: {} match(es)", children.len());
        children
    }

    /// Append a new entity.
    ///
    /// An empty `parent` is treated like a missing one: the entity becomes a
    /// root with `parent: None`. Duplicate names and unknown parents are
    /// accepted.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(
        &mut self,
        name: &str,
        organization: &str,
        parent: Option<&str>,
    ) -> DomainResult<bool> {
        self.check_name(name)?;
        let parent = parent.filter(|p| !p.is_empty()).map(str::to_string);
        self.entities.push(Entity {
            name: name.to_string(),
            parent,
            child_count: None,
        });
        debug!("insert: store now holds {} entities", self.entities.len());
        Ok(true)
    }

    /// Remove every entity named `name`.
    ///
    /// Children of removed entities keep their parent name and become
    /// orphans. Removing an unknown name is a successful no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, name: &str, organization: &str) -> DomainResult<bool> {
        self.check_name(name)?;
        let before = self.entities.len();
        self.entities.retain(|e| e.name != name);
        debug!("remove: dropped {} entities", before - self.entities.len());
        Ok(true)
    }

    /// Shorthand for listing without a `parent` key.
    pub fn roots(&self) -> Vec<Entity> {
        self.list_children(&Filters::roots())
    }

    /// Entities whose parent name matches no entity in the store.
    pub fn orphans(&self) -> Vec<Entity> {
        let names: HashSet<&str> = self.entities.iter().map(|e| e.name.as_str()).collect();
        self.entities
            .iter()
            .filter(|e| matches!(e.parent.as_deref(), Some(p) if !names.contains(p)))
            .cloned()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name == name)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn check_name(&self, name: &str) -> DomainResult<()> {
        if self.policy == NamePolicy::Strict && name.is_empty() {
            return Err(DomainError::InvalidArgument {
                argument: "name",
                message: "cannot be an empty string".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn given_empty_parent_when_inserting_then_stores_root_without_parent() {
        let mut store = TeamStore::default();
        store.insert("BU1", "acme", Some("")).unwrap();

        assert_eq!(store.entities()[0].parent, None);
        assert_eq!(names(&store.roots()), vec!["BU1"]);
    }

    #[test]
    fn given_strict_policy_when_inserting_empty_name_then_rejects() {
        let mut store = TeamStore::default().with_policy(NamePolicy::Strict);

        let err = store.insert("", "acme", None).unwrap_err();

        assert!(matches!(err, DomainError::InvalidArgument { argument: "name", .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn given_permissive_policy_when_inserting_empty_name_then_accepts() {
        let mut store = TeamStore::default();
        assert!(store.insert("", "acme", None).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn given_strict_policy_when_removing_empty_name_then_rejects() {
        let mut store = TeamStore::new(vec![Entity::root("BU1")]).with_policy(NamePolicy::Strict);
        assert!(store.remove("", "acme").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn given_removed_parent_when_listing_orphans_then_returns_former_children() {
        let mut store = TeamStore::new(vec![
            Entity::root("BU1"),
            Entity::child("Team1", "BU1"),
            Entity::child("Team2", "BU2"),
        ]);
        assert_eq!(names(&store.orphans()), vec!["Team2"]);

        store.remove("BU1", "acme").unwrap();

        assert_eq!(names(&store.orphans()), vec!["Team1", "Team2"]);
        assert!(!store.contains("BU1"));
    }
}
