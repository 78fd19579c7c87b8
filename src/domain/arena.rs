use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::entities::Entity;

/// Data payload for nodes of a browsed team tree.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub entity: Entity,
    /// Name already appears on the path from the root; not expanded again.
    pub cyclic: bool,
    /// Depth bound reached before the children were listed.
    pub truncated: bool,
}

impl NodeData {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            cyclic: false,
            truncated: false,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in listing order
    pub children: Vec<Index>,
}

/// Arena-backed forest holding a browsed snapshot of the hierarchy.
///
/// Unlike the store, nodes here are linked by index, so a name shared by two
/// entities shows up as two distinct nodes.
#[derive(Debug, Default)]
pub struct TeamTree {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
}

impl TeamTree {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal across all roots, left to right.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Number of levels of the deepest branch; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        match self.get_node(node_idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Names of all nodes without children, in traversal order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.entity.name.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a TeamTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TeamTree) -> Self {
        // Reversed so the first root is popped first
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TeamTree {
        let mut tree = TeamTree::new();
        let bu1 = tree.insert_node(NodeData::new(Entity::root("BU1")), None);
        tree.insert_node(NodeData::new(Entity::root("BU2")), None);
        let team1 = tree.insert_node(NodeData::new(Entity::child("Team1", "BU1")), Some(bu1));
        tree.insert_node(NodeData::new(Entity::child("Team2", "BU1")), Some(bu1));
        tree.insert_node(NodeData::new(Entity::child("Squad", "Team1")), Some(team1));
        tree
    }

    #[test]
    fn given_forest_when_iterating_then_visits_in_preorder() {
        let tree = sample();
        let order: Vec<String> = tree
            .iter()
            .map(|(_, n)| n.data.entity.name.clone())
            .collect();
        assert_eq!(order, vec!["BU1", "Team1", "Squad", "Team2", "BU2"]);
    }

    #[test]
    fn given_forest_when_measuring_then_reports_depth_and_leaves() {
        let tree = sample();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_names(), vec!["Squad", "Team2", "BU2"]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn given_empty_tree_when_measuring_then_depth_is_zero() {
        let tree = TeamTree::new();
        assert_eq!(tree.depth(), 0);
        assert!(tree.leaf_names().is_empty());
        assert!(tree.is_empty());
    }
}
