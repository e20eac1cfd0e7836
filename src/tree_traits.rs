use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, TreeArena, TreeResult};

pub trait TreeDisplay {
    /// Render the subtree rooted at `root` for terminal output.
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>>;
}

impl<T: Display> TreeDisplay for TreeArena<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>> {
        fn build_tree<T: Display>(
            arena: &TreeArena<T>,
            node_idx: NodeId,
            parent_tree: &mut Tree<String>,
        ) -> TreeResult<()> {
            for &child_idx in arena.children(node_idx)? {
                let mut child_tree = Tree::new(arena.data(child_idx)?.to_string());
                build_tree(arena, child_idx, &mut child_tree)?;
                parent_tree.push(child_tree);
            }
            Ok(())
        }

        let mut tree = Tree::new(self.data(root)?.to_string());
        build_tree(self, root, &mut tree)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_when_rendered_then_contains_all_labels_in_order() {
        let mut arena = TreeArena::new();
        let root = arena.create_node("root");
        let a = arena.create_node("a");
        let b = arena.create_node("b");
        arena.add(root, a).unwrap();
        arena.add(a, b).unwrap();

        let rendered = arena.to_tree_string(root).unwrap().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "root");
        assert!(lines[1].ends_with("a"));
        assert!(lines[2].ends_with("b"));
    }
}
