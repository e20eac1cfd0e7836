use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena, TreeOptions};
use crate::domain::error::{TreeError, TreeResult};

/// Trees parsed from indented text.
#[derive(Debug)]
pub struct Outline {
    pub tree: TreeArena<String>,
    /// One root per top-level line, in order
    pub roots: Vec<NodeId>,
}

/// Builds trees from outline text: one node per non-blank line, nesting
/// given by leading indentation.
///
/// ```text
/// root
///   child
///     grandchild
///   sibling
/// ```
pub struct OutlineBuilder {
    indent_width: usize,
    options: TreeOptions,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new(2)
    }
}

impl OutlineBuilder {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width: indent_width.max(1),
            options: TreeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    // a tab counts as one full level
    fn indent_of(&self, line: &str) -> usize {
        line.chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .map(|c| if c == '\t' { self.indent_width } else { 1 })
            .sum()
    }

    #[instrument(level = "debug", skip(self, text), fields(indent_width = self.indent_width))]
    pub fn build(&self, text: &str) -> TreeResult<Outline> {
        let mut tree = TreeArena::with_options(self.options);
        let mut roots = Vec::new();
        // path[d] is the most recent node at depth d
        let mut path: Vec<NodeId> = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let label = line.trim();
            if label.is_empty() {
                continue;
            }
            let line_no = i + 1;
            let indent = self.indent_of(line);
            if indent % self.indent_width != 0 {
                return Err(TreeError::InvalidOutline {
                    line: line_no,
                    reason: format!(
                        "indentation of {indent} is not a multiple of {}",
                        self.indent_width
                    ),
                });
            }
            let depth = indent / self.indent_width;
            if depth > path.len() {
                return Err(TreeError::InvalidOutline {
                    line: line_no,
                    reason: format!("jumps to depth {depth} below depth {}", path.len()),
                });
            }

            path.truncate(depth);
            let id = tree.create_node(label.to_string());
            match path.last() {
                Some(&parent) => tree.add(parent, id)?,
                None => roots.push(id),
            }
            path.push(id);
        }

        debug!(nodes = tree.len(), roots = roots.len(), "outline built");
        Ok(Outline { tree, roots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(outline: &Outline, root: NodeId) -> Vec<String> {
        outline
            .tree
            .preorder(root)
            .unwrap()
            .map(|(_, n)| n.data.clone())
            .collect()
    }

    #[test]
    fn given_nested_outline_when_built_then_shape_matches() {
        let text = "root\n  x\n    z\n  y\n";
        let outline = OutlineBuilder::new(2).build(text).unwrap();
        assert_eq!(outline.roots.len(), 1);
        let root = outline.roots[0];
        assert_eq!(labels(&outline, root), vec!["root", "x", "z", "y"]);
        assert_eq!(outline.tree.child_count(root).unwrap(), 2);
    }

    #[test]
    fn given_multiple_top_level_lines_then_multiple_roots() {
        let outline = OutlineBuilder::default().build("a\n\n  b\nc\n").unwrap();
        assert_eq!(outline.roots.len(), 2);
        assert_eq!(outline.tree.len(), 3);
    }

    #[test]
    fn given_tabs_then_each_counts_as_level() {
        let outline = OutlineBuilder::new(4).build("a\n\tb\n\t\tc").unwrap();
        let c = outline.tree.last_leaf(outline.roots[0]).unwrap();
        assert_eq!(outline.tree.depth(c).unwrap(), 2);
    }

    #[test]
    fn given_odd_indentation_then_invalid_outline() {
        let err = OutlineBuilder::new(2).build("a\n   b").unwrap_err();
        assert!(matches!(err, TreeError::InvalidOutline { line: 2, .. }));
    }

    #[test]
    fn given_skipped_level_then_invalid_outline() {
        let err = OutlineBuilder::new(2).build("a\n    b").unwrap_err();
        assert!(matches!(err, TreeError::InvalidOutline { line: 2, .. }));
    }

    #[test]
    fn given_indented_first_line_then_invalid_outline() {
        let err = OutlineBuilder::new(2).build("  a").unwrap_err();
        assert!(matches!(err, TreeError::InvalidOutline { line: 1, .. }));
    }
}
