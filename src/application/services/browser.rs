//! Lazy hierarchy browsing
//!
//! Expands the store one level at a time through `list_children`, the same
//! way an interactive tree view fetches children when a node is opened.

use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument, trace};

use crate::config::TreeConfig;
use crate::domain::{Filters, NodeData, TeamStore, TeamTree};

#[derive(Debug, Clone, Copy)]
struct Limits {
    depth: usize,
    nodes: usize,
}

fn mark_truncated(tree: &mut TeamTree, idx: Index) {
    if let Some(node) = tree.get_node_mut(idx) {
        node.data.truncated = true;
    }
}

/// Builds and renders browsed snapshots of a store.
#[derive(Debug, Clone, Default)]
pub struct BrowserService {
    config: TreeConfig,
}

impl BrowserService {
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }

    /// Expand the whole hierarchy reachable from the roots.
    ///
    /// Roots sit at level 1; nodes at `max_depth` are not expanded and get
    /// `truncated` set when they do have children. A child whose name is
    /// already on its root path is added with `cyclic` set and not expanded.
    ///
    /// Duplicate names repeat whole subtrees, so expansion also stops once
    /// the tree holds `max_nodes` nodes. The node whose children were cut
    /// off is marked `truncated`. Roots are always listed.
    #[instrument(level = "debug", skip(self, store))]
    pub fn browse(&self, store: &TeamStore) -> TeamTree {
        let limits = Limits {
            depth: self.config.max_depth.max(1),
            nodes: self.config.max_nodes.max(1),
        };
        let mut tree = TeamTree::new();
        let mut path = Vec::new();

        let roots: Vec<Index> = store
            .list_children(&Filters::roots())
            .into_iter()
            .map(|root| tree.insert_node(NodeData::new(root), None))
            .collect();
        for idx in roots {
            let Some(name) = tree.get_node(idx).map(|n| n.data.entity.name.clone()) else {
                continue;
            };
            path.push(name);
            self.expand(store, &mut tree, idx, &mut path, 1, limits);
            path.pop();
        }

        debug!("browsed {} nodes, depth {}", tree.len(), tree.depth());
        tree
    }

    fn expand(
        &self,
        store: &TeamStore,
        tree: &mut TeamTree,
        idx: Index,
        path: &mut Vec<String>,
        level: usize,
        limits: Limits,
    ) {
        let Some(name) = tree.get_node(idx).map(|n| n.data.entity.name.clone()) else {
            return;
        };
        let children = store.list_children(&Filters::children_of(name.as_str()));
        if children.is_empty() {
            return;
        }

        if level >= limits.depth {
            trace!("depth bound reached at {}", name);
            mark_truncated(tree, idx);
            return;
        }

        for child in children {
            if tree.len() >= limits.nodes {
                debug!("node bound {} reached at {}", limits.nodes, name);
                mark_truncated(tree, idx);
                return;
            }
            let cyclic = path.contains(&child.name);
            let mut data = NodeData::new(child);
            data.cyclic = cyclic;
            let child_name = data.entity.name.clone();
            let child_idx = tree.insert_node(data, Some(idx));

            if cyclic {
                trace!("not expanding {} again below {}", child_name, name);
                continue;
            }
            path.push(child_name);
            self.expand(store, tree, child_idx, path, level + 1, limits);
            path.pop();
        }
    }

    /// Render a browsed tree below an `organization` header line.
    pub fn render(&self, tree: &TeamTree, organization: &str) -> String {
        let root = Tree::new(organization.to_string()).with_leaves(
            tree.roots()
                .iter()
                .filter_map(|&idx| self.to_termtree(tree, idx)),
        );
        root.to_string()
    }

    fn to_termtree(&self, tree: &TeamTree, idx: Index) -> Option<Tree<String>> {
        let node = tree.get_node(idx)?;
        Some(
            Tree::new(self.label(&node.data)).with_leaves(
                node.children
                    .iter()
                    .filter_map(|&child| self.to_termtree(tree, child)),
            ),
        )
    }

    fn label(&self, data: &NodeData) -> String {
        let mut label = data.entity.name.clone();
        if self.config.show_child_count {
            if let Some(count) = data.entity.child_count {
                label.push_str(&format!(" ({count})"));
            }
        }
        if data.cyclic {
            label.push_str(" [cycle]");
        }
        if data.truncated {
            label.push_str(" [...]");
        }
        label
    }
}
