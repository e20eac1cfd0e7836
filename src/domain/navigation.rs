//! Sibling, leaf and preorder navigation over a [`TreeArena`].
//!
//! These walks visit one node at a time, so stepping through a whole tree
//! with [`TreeArena::next_node`] is O(n * fan-out). Use
//! [`TreeArena::preorder`] for bulk traversal.

use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::{TreeError, TreeResult};

impl<T> TreeArena<T> {
    pub fn first_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(id)?.first().copied())
    }

    pub fn last_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(id)?.last().copied())
    }

    /// First leaf below `id` following first children, or `id` itself.
    pub fn first_leaf(&self, id: NodeId) -> TreeResult<NodeId> {
        let mut node = id;
        while let Some(child) = self.first_child(node)? {
            node = child;
        }
        Ok(node)
    }

    /// Last leaf below `id` following last children, or `id` itself.
    pub fn last_leaf(&self, id: NodeId) -> TreeResult<NodeId> {
        let mut node = id;
        while let Some(child) = self.last_child(node)? {
            node = child;
        }
        Ok(node)
    }

    fn position_of_child(&self, parent: NodeId, child: NodeId) -> TreeResult<(usize, &[NodeId])> {
        let children = self.children(parent)?;
        let index = children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        Ok((index, children))
    }

    /// Child of `parent` right after `child`, None if `child` is the last.
    pub fn child_after(&self, parent: NodeId, child: NodeId) -> TreeResult<Option<NodeId>> {
        let (index, children) = self.position_of_child(parent, child)?;
        Ok(children.get(index + 1).copied())
    }

    /// Child of `parent` right before `child`, None if `child` is the first.
    pub fn child_before(&self, parent: NodeId, child: NodeId) -> TreeResult<Option<NodeId>> {
        let (index, children) = self.position_of_child(parent, child)?;
        Ok(index.checked_sub(1).map(|i| children[i]))
    }

    pub fn next_sibling(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        match self.parent(id)? {
            Some(parent) => self.child_after(parent, id),
            None => Ok(None),
        }
    }

    pub fn previous_sibling(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        match self.parent(id)? {
            Some(parent) => self.child_before(parent, id),
            None => Ok(None),
        }
    }

    /// Successor of `id` in a preorder walk of its tree, None if it is last.
    #[instrument(level = "trace", skip(self))]
    pub fn next_node(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        if let Some(child) = self.first_child(id)? {
            return Ok(Some(child));
        }
        let mut node = id;
        loop {
            if let Some(sibling) = self.next_sibling(node)? {
                return Ok(Some(sibling));
            }
            match self.parent(node)? {
                Some(parent) => node = parent,
                None => return Ok(None),
            }
        }
    }

    /// Predecessor of `id` in a preorder walk of its tree, None for a root.
    #[instrument(level = "trace", skip(self))]
    pub fn previous_node(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        let Some(parent) = self.parent(id)? else {
            return Ok(None);
        };
        match self.previous_sibling(id)? {
            Some(sibling) => self.last_leaf(sibling).map(Some),
            None => Ok(Some(parent)),
        }
    }

    /// True if `other` is `id` or lies below it. False for None.
    ///
    /// O(depth of `other`).
    pub fn is_node_descendant(&self, id: NodeId, other: Option<NodeId>) -> TreeResult<bool> {
        let mut current = other;
        while let Some(node) = current {
            if node == id {
                return Ok(true);
            }
            current = self.parent(node)?;
        }
        Ok(false)
    }

    /// Topmost ancestor of `id`, or `id` itself for a root.
    pub fn root(&self, id: NodeId) -> TreeResult<NodeId> {
        Ok(self.ancestors(id)?.last().unwrap_or(id))
    }

    /// Number of edges between `id` and its root.
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(id)?.count())
    }

    /// Number of levels in the subtree rooted at `id` (1 for a leaf).
    pub fn height(&self, id: NodeId) -> TreeResult<usize> {
        let mut height = 0;
        for (node, _) in self.preorder(id)? {
            height = height.max(self.depth(node)? + 1);
        }
        Ok(height.saturating_sub(self.depth(id)?))
    }

    /// Leaves of the subtree rooted at `id`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self
            .preorder(id)?
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect())
    }
}
