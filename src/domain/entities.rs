//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named node in the team hierarchy.
///
/// `name` is the lookup key for parent relations and deletion. It is not
/// required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    pub name: String,
    /// Name of the parent entity, `None` for a root entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Informational only, never kept in sync with actual children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u32>,
}

impl Entity {
    /// Root-level entity without a parent.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            child_count: None,
        }
    }

    /// Entity referencing `parent` by name.
    pub fn child(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            child_count: None,
        }
    }

    pub fn with_child_count(mut self, count: u32) -> Self {
        self.child_count = Some(count);
        self
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Filter key recognized by [`Filters::from_map`].
pub const PARENT_KEY: &str = "parent";

/// Filters for listing one level of the hierarchy.
///
/// Only the `parent` key is recognized. The key can be absent (roots are
/// listed), present with a name, or present without a value. The last case
/// matches entities whose parent is unset, exactly like the absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    parent: Option<Option<String>>,
}

impl Filters {
    /// No `parent` key: lists root entities.
    pub fn roots() -> Self {
        Self::default()
    }

    /// `parent` key set to `name`.
    pub fn children_of(name: impl Into<String>) -> Self {
        Self {
            parent: Some(Some(name.into())),
        }
    }

    /// `parent` key present without a value.
    pub fn parent_unset() -> Self {
        Self { parent: Some(None) }
    }

    /// Build filters from a key/value mapping, ignoring unknown keys.
    pub fn from_map(map: &BTreeMap<String, Option<String>>) -> Self {
        Self {
            parent: map.get(PARENT_KEY).cloned(),
        }
    }

    pub fn has_parent_key(&self) -> bool {
        self.parent.is_some()
    }

    /// The parent value an entity must carry to match.
    pub fn wanted_parent(&self) -> Option<&str> {
        self.parent.as_ref().and_then(|p| p.as_deref())
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        entity.parent.as_deref() == self.wanted_parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_absent_parent_key_when_matching_then_only_roots_match() {
        let filters = Filters::roots();
        assert!(!filters.has_parent_key());
        assert!(filters.matches(&Entity::root("BU1")));
        assert!(!filters.matches(&Entity::child("Team1", "BU1")));
    }

    #[test]
    fn given_unset_parent_key_when_matching_then_behaves_like_roots() {
        let filters = Filters::parent_unset();
        assert!(filters.has_parent_key());
        assert!(filters.matches(&Entity::root("BU1")));
        assert!(!filters.matches(&Entity::child("Team1", "BU1")));
    }

    #[test]
    fn given_empty_string_parent_when_matching_then_requires_exact_empty_parent() {
        let filters = Filters::children_of("");
        assert!(!filters.matches(&Entity::root("BU1")));
        assert!(filters.matches(&Entity::child("odd", "")));
    }

    #[test]
    fn given_map_with_unknown_keys_when_building_filters_then_ignores_them() {
        let mut map = BTreeMap::new();
        map.insert("organization".to_string(), Some("acme".to_string()));
        assert_eq!(Filters::from_map(&map), Filters::roots());

        map.insert(PARENT_KEY.to_string(), Some("BU1".to_string()));
        assert_eq!(Filters::from_map(&map), Filters::children_of("BU1"));
    }
}
