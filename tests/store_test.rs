//! Tests for TeamStore list/insert/remove semantics

use std::collections::BTreeMap;

use rstest::{fixture, rstest};

use teamtree::domain::{Entity, Filters, TeamStore};

const ORG: &str = "acme";

fn names(entities: &[Entity]) -> Vec<&str> {
    entities.iter().map(|e| e.name.as_str()).collect()
}

/// BU1 with two teams, BU2 without any.
#[fixture]
fn seeded() -> TeamStore {
    TeamStore::new(vec![
        Entity::root("BU1").with_child_count(2),
        Entity::root("BU2").with_child_count(0),
        Entity::child("Team1", "BU1"),
        Entity::child("Team2", "BU1"),
    ])
}

// ============================================================
// list_children
// ============================================================

#[rstest]
fn given_seeded_store_when_listing_without_parent_then_returns_roots(seeded: TeamStore) {
    assert_eq!(names(&seeded.list_children(&Filters::roots())), vec!["BU1", "BU2"]);
}

#[rstest]
fn given_seeded_store_when_listing_children_then_returns_them_in_order(seeded: TeamStore) {
    assert_eq!(
        names(&seeded.list_children(&Filters::children_of("BU1"))),
        vec!["Team1", "Team2"]
    );
    assert!(seeded.list_children(&Filters::children_of("BU2")).is_empty());
}

#[rstest]
fn given_grandchild_when_listing_children_then_excludes_it(mut seeded: TeamStore) {
    seeded.insert("Squad", ORG, Some("Team1")).unwrap();

    let children = seeded.list_children(&Filters::children_of("BU1"));

    assert_eq!(names(&children), vec!["Team1", "Team2"]);
}

#[rstest]
fn given_parent_key_without_value_when_listing_then_matches_roots(seeded: TeamStore) {
    let mut map = BTreeMap::new();
    map.insert("parent".to_string(), None);

    let listed = seeded.list_children(&Filters::from_map(&map));

    assert_eq!(names(&listed), vec!["BU1", "BU2"]);
}

#[rstest]
fn given_listing_when_store_changes_afterwards_then_snapshot_is_unaffected(mut seeded: TeamStore) {
    let before = seeded.list_children(&Filters::roots());

    seeded.insert("BU3", ORG, None).unwrap();

    assert_eq!(names(&before), vec!["BU1", "BU2"]);
    assert_eq!(before[0].child_count, Some(2));
}

#[test]
fn given_unknown_parent_when_listing_then_returns_empty() {
    let store = TeamStore::new(vec![Entity::root("BU1")]);
    assert!(store.list_children(&Filters::children_of("nope")).is_empty());
}

// ============================================================
// insert
// ============================================================

#[test]
fn given_empty_store_when_inserting_root_then_lists_it() {
    let mut store = TeamStore::default();
    assert!(store.list_children(&Filters::roots()).is_empty());

    assert!(store.insert("BU1", ORG, None).unwrap());

    assert_eq!(names(&store.list_children(&Filters::roots())), vec!["BU1"]);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn given_missing_or_empty_parent_when_inserting_then_entity_has_no_parent(
    #[case] parent: Option<&str>,
) {
    let mut store = TeamStore::default();

    store.insert("BU1", ORG, parent).unwrap();

    assert_eq!(store.entities()[0], Entity::root("BU1"));
    assert!(store.list_children(&Filters::children_of("")).is_empty());
}

#[rstest]
fn given_inserted_child_when_listing_parent_then_appears_exactly_once_at_end(
    mut seeded: TeamStore,
) {
    seeded.insert("Team3", ORG, Some("BU1")).unwrap();

    let children = seeded.list_children(&Filters::children_of("BU1"));

    assert_eq!(names(&children), vec!["Team1", "Team2", "Team3"]);
    assert_eq!(children.iter().filter(|e| e.name == "Team3").count(), 1);
}

#[rstest]
fn given_duplicate_name_when_inserting_then_both_are_kept(mut seeded: TeamStore) {
    seeded.insert("Team1", ORG, Some("BU2")).unwrap();

    assert_eq!(seeded.len(), 5);
    assert_eq!(
        names(&seeded.list_children(&Filters::children_of("BU2"))),
        vec!["Team1"]
    );
}

#[test]
fn given_nonexistent_parent_when_inserting_then_succeeds_as_orphan() {
    let mut store = TeamStore::default();

    assert!(store.insert("Team1", ORG, Some("ghost")).unwrap());

    assert!(store.roots().is_empty());
    assert_eq!(names(&store.orphans()), vec!["Team1"]);
}

#[test]
fn given_inserted_entity_then_child_count_is_unset() {
    let mut store = TeamStore::default();
    store.insert("BU1", ORG, None).unwrap();
    assert_eq!(store.entities()[0].child_count, None);
}

// ============================================================
// remove
// ============================================================

#[rstest]
fn given_removed_parent_when_listing_then_orphans_stay_reachable_by_stale_name(
    mut seeded: TeamStore,
) {
    assert!(seeded.remove("BU1", ORG).unwrap());

    assert_eq!(names(&seeded.list_children(&Filters::roots())), vec!["BU2"]);
    assert_eq!(
        names(&seeded.list_children(&Filters::children_of("BU1"))),
        vec!["Team1", "Team2"]
    );
    assert_eq!(seeded.len(), 3);
}

#[rstest]
fn given_unknown_name_when_removing_then_reports_success_and_changes_nothing(
    mut seeded: TeamStore,
) {
    assert!(seeded.remove("nope", ORG).unwrap());
    assert_eq!(seeded.len(), 4);
}

#[rstest]
fn given_duplicate_names_when_removing_then_all_are_removed(mut seeded: TeamStore) {
    seeded.insert("Team1", ORG, Some("BU2")).unwrap();

    seeded.remove("Team1", ORG).unwrap();

    assert!(!seeded.contains("Team1"));
    assert_eq!(names(seeded.entities()), vec!["BU1", "BU2", "Team2"]);
}

#[rstest]
fn given_removed_then_reinserted_parent_when_listing_then_orphans_reattach(
    mut seeded: TeamStore,
) {
    seeded.remove("BU1", ORG).unwrap();
    assert_eq!(names(&seeded.orphans()), vec!["Team1", "Team2"]);

    seeded.insert("BU1", ORG, None).unwrap();

    assert!(seeded.orphans().is_empty());
    assert_eq!(names(&seeded.roots()), vec!["BU2", "BU1"]);
}
