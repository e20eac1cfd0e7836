use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena, TreeNode};
use crate::domain::error::TreeResult;

impl<T> TreeArena<T> {
    /// Nodes of the subtree rooted at `id`, parents before children.
    #[instrument(level = "trace", skip(self))]
    pub fn preorder(&self, id: NodeId) -> TreeResult<PreOrderIterator<'_, T>> {
        self.node(id)?;
        Ok(PreOrderIterator {
            arena: self,
            stack: vec![id],
        })
    }

    /// Nodes of the subtree rooted at `id`, children before parents.
    #[instrument(level = "trace", skip(self))]
    pub fn postorder(&self, id: NodeId) -> TreeResult<PostOrderIterator<'_, T>> {
        self.node(id)?;
        Ok(PostOrderIterator {
            arena: self,
            stack: vec![(id, false)],
        })
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Ancestors<'_, T>> {
        let next = self.parent(id)?;
        Ok(Ancestors { arena: self, next })
    }
}

pub struct PreOrderIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Ok(node) = self.arena.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children().iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    arena: &'a TreeArena<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Ok(node) = self.arena.node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

pub struct Ancestors<'a, T> {
    arena: &'a TreeArena<T>,
    next: Option<NodeId>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.parent(current).ok().flatten();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      a
    //    / | \
    //   b  e  f
    //  / \
    // c   d
    fn sample() -> (TreeArena<char>, NodeId) {
        let mut tree = TreeArena::new();
        let ids: Vec<NodeId> = "abcdef".chars().map(|c| tree.create_node(c)).collect();
        let (a, b, c, d, e, f) = (ids[0], ids[1], ids[2], ids[3], ids[4], ids[5]);
        tree.add(a, b).unwrap();
        tree.add(b, c).unwrap();
        tree.add(b, d).unwrap();
        tree.add(a, e).unwrap();
        tree.add(a, f).unwrap();
        (tree, a)
    }

    fn labels<'a>(items: impl Iterator<Item = (NodeId, &'a TreeNode<char>)>) -> String {
        items.map(|(_, n)| n.data).collect()
    }

    #[test]
    fn given_tree_when_preorder_then_parents_first_left_to_right() {
        let (tree, a) = sample();
        assert_eq!(labels(tree.preorder(a).unwrap()), "abcdef");
    }

    #[test]
    fn given_tree_when_postorder_then_children_first() {
        let (tree, a) = sample();
        assert_eq!(labels(tree.postorder(a).unwrap()), "cdbefa");
    }

    #[test]
    fn given_deep_node_when_ancestors_then_nearest_first() {
        let (tree, a) = sample();
        let d = tree.preorder(a).unwrap().nth(3).unwrap().0;
        let names: String = tree
            .ancestors(d)
            .unwrap()
            .map(|id| *tree.data(id).unwrap())
            .collect();
        assert_eq!(names, "ba");
        assert_eq!(tree.ancestors(a).unwrap().count(), 0);
    }
}
