use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};

/// Handle of a node in a [`TreeArena`].
///
/// Generational: once a node is deleted its id never resolves again, even if
/// the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{slot}.{generation}")
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Payload carried by this node
    pub data: T,
    /// Parent node, None for root nodes
    parent: Option<NodeId>,
    /// Child nodes in order
    children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Behavior switches for a [`TreeArena`].
///
/// Cycle checking is on by default, unlike a bare parent/child structure
/// which links anything: a cycle would make [`TreeArena::next_node`] and the
/// ancestor walks loop forever. Disable it to link without the O(depth)
/// ancestor scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Reject `add` calls that would make a node its own ancestor.
    pub check_cycles: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { check_cycles: true }
    }
}

/// Arena holding any number of trees (a forest).
///
/// Nodes are created parentless with [`TreeArena::create_node`] and linked
/// with [`TreeArena::add`]. A node's parent link and its membership in the
/// parent's child list are always changed together.
#[derive(Debug, Clone)]
pub struct TreeArena<T> {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode<T>>,
    options: TreeOptions,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            arena: Arena::new(),
            options,
        }
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    /// Number of live nodes across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Create a standalone node.
    #[instrument(level = "trace", skip_all)]
    pub fn create_node(&mut self, data: T) -> NodeId {
        let id = NodeId(self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        }));
        debug!(%id, "create node");
        id
    }

    pub fn node(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut TreeNode<T>> {
        self.arena.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn data(&self, id: NodeId) -> TreeResult<&T> {
        self.node(id).map(|n| &n.data)
    }

    pub fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.node_mut(id).map(|n| &mut n.data)
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.node(id).map(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        self.node(id).map(|n| n.children.as_slice())
    }

    pub fn child_count(&self, id: NodeId) -> TreeResult<usize> {
        self.node(id).map(|n| n.children.len())
    }

    pub fn is_leaf(&self, id: NodeId) -> TreeResult<bool> {
        self.node(id).map(TreeNode::is_leaf)
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> TreeResult<NodeId> {
        let children = self.children(id)?;
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Position of `child` among `parent`'s children, None if it is not one.
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> TreeResult<Option<usize>> {
        Ok(self.children(parent)?.iter().position(|&c| c == child))
    }

    /// Make `child` the last child of `parent`, detaching it from its
    /// previous parent first.
    ///
    /// Adding a node that is already a child of `parent` moves it to the end.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.options.check_cycles && self.is_node_descendant(child, Some(parent))? {
            return Err(TreeError::CycleDetected { parent, child });
        }

        self.remove_from_parent(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach and return the child at `index`. Later children shift left.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, parent: NodeId, index: usize) -> TreeResult<NodeId> {
        let node = self.node_mut(parent)?;
        let len = node.children.len();
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        let child = node.children.remove(index);
        if let Some(c) = self.arena.get_mut(child.0) {
            c.parent = None;
        }
        debug!(%child, "detached");
        Ok(child)
    }

    /// Detach `id` from its parent. Does nothing for a root.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_from_parent(&mut self, id: NodeId) -> TreeResult<()> {
        if let Some(parent) = self.parent(id)? {
            let index = self
                .index_of(parent, id)?
                .ok_or(TreeError::NotAChild { parent, child: id })?;
            self.remove(parent, index)?;
        }
        Ok(())
    }

    /// Detach the subtree rooted at `id` and free all of its nodes.
    ///
    /// Returns the payloads in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_subtree(&mut self, id: NodeId) -> TreeResult<Vec<T>> {
        self.remove_from_parent(id)?;
        let ids: Vec<NodeId> = self.preorder(id)?.map(|(idx, _)| idx).collect();
        let removed: Vec<T> = ids
            .into_iter()
            .filter_map(|idx| self.arena.remove(idx.0))
            .map(|n| n.data)
            .collect();
        debug!(count = removed.len(), "deleted subtree");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // root
    // ├── x
    // │   └── z
    // └── y
    fn sample() -> (TreeArena<&'static str>, [NodeId; 4]) {
        let mut tree = TreeArena::new();
        let r = tree.create_node("root");
        let x = tree.create_node("x");
        let y = tree.create_node("y");
        let z = tree.create_node("z");
        tree.add(r, x).unwrap();
        tree.add(r, y).unwrap();
        tree.add(x, z).unwrap();
        (tree, [r, x, y, z])
    }

    #[test]
    fn given_added_child_then_parent_and_index_agree() {
        let (tree, [r, x, y, _]) = sample();
        assert_eq!(tree.parent(x).unwrap(), Some(r));
        let i = tree.index_of(r, y).unwrap().unwrap();
        assert_eq!(tree.child_at(r, i).unwrap(), y);
    }

    #[test]
    fn given_existing_child_when_added_again_then_moved_to_end_without_duplicate() {
        let (mut tree, [r, x, y, _]) = sample();
        tree.add(r, x).unwrap();
        assert_eq!(tree.child_count(r).unwrap(), 2);
        assert_eq!(tree.children(r).unwrap(), &[y, x]);
    }

    #[test]
    fn given_child_of_other_parent_when_added_then_detached_from_old() {
        let (mut tree, [_, x, y, z]) = sample();
        tree.add(y, z).unwrap();
        assert!(tree.is_leaf(x).unwrap());
        assert_eq!(tree.parent(z).unwrap(), Some(y));
    }

    #[test]
    fn given_index_when_remove_then_child_detached_and_rest_shift() {
        let (mut tree, [r, x, y, _]) = sample();
        let removed = tree.remove(r, 0).unwrap();
        assert_eq!(removed, x);
        assert_eq!(tree.parent(x).unwrap(), None);
        assert_eq!(tree.children(r).unwrap(), &[y]);
    }

    #[test]
    fn given_out_of_range_index_when_remove_then_error_and_unchanged() {
        let (mut tree, [r, ..]) = sample();
        assert_eq!(
            tree.remove(r, 2),
            Err(TreeError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(tree.child_count(r).unwrap(), 2);
        assert_eq!(
            tree.child_at(r, 5),
            Err(TreeError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn given_root_when_remove_from_parent_then_noop() {
        let (mut tree, [r, x, ..]) = sample();
        tree.remove_from_parent(r).unwrap();
        tree.remove_from_parent(x).unwrap();
        assert_eq!(tree.parent(x).unwrap(), None);
        assert_eq!(tree.child_count(r).unwrap(), 1);
    }

    #[test]
    fn given_ancestor_when_added_below_descendant_then_cycle_rejected() {
        let (mut tree, [r, _, _, z]) = sample();
        assert_eq!(
            tree.add(z, r),
            Err(TreeError::CycleDetected { parent: z, child: r })
        );
        assert_eq!(
            tree.add(z, z),
            Err(TreeError::CycleDetected { parent: z, child: z })
        );
        assert_eq!(tree.parent(r).unwrap(), None);
    }

    #[test]
    fn given_unchecked_options_when_self_added_then_allowed() {
        let mut tree = TreeArena::with_options(TreeOptions { check_cycles: false });
        let a = tree.create_node(1);
        tree.add(a, a).unwrap();
        assert_eq!(tree.parent(a).unwrap(), Some(a));
    }

    #[test]
    fn given_deleted_subtree_then_ids_are_stale() {
        let (mut tree, [r, x, y, z]) = sample();
        let removed = tree.delete_subtree(x).unwrap();
        assert_eq!(removed, vec!["x", "z"]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(r).unwrap(), &[y]);
        assert_eq!(tree.parent(z), Err(TreeError::NodeNotFound(z)));
        assert!(!tree.contains(x));
    }
}
