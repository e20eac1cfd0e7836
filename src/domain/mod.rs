//! Domain layer: the map and tree data structures
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assoc;
pub mod error;
pub mod escape;
pub mod indexed_map;
pub mod iter;
pub mod navigation;
pub mod ordered_map;
pub mod outline;
pub mod template;

pub use arena::{NodeId, TreeArena, TreeNode, TreeOptions};
pub use assoc::{AssocMap, Delimiter};
pub use error::{MapError, MapResult, TreeError, TreeResult};
pub use indexed_map::IndexedMap;
pub use ordered_map::{MapEntry, OrderedMap};
pub use outline::{Outline, OutlineBuilder};
