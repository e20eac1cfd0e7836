//! Insertion-ordered association lists and navigable arena trees.
//!
//! - [`OrderedMap`] / [`IndexedMap`]: string-keyed maps that keep insertion
//!   order and serialize to `key=value key=value` text with legacy percent
//!   escaping.
//! - [`TreeArena`]: n-ary trees with parent links, sibling navigation and
//!   step-wise preorder traversal.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{
    AssocMap, Delimiter, IndexedMap, MapEntry, MapError, MapResult, NodeId, OrderedMap, Outline,
    OutlineBuilder, TreeArena, TreeError, TreeNode, TreeOptions, TreeResult,
};
