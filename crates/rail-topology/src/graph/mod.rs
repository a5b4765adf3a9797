//! Station graph construction, classification and path tracing.

pub mod adjacency;
pub mod classify;
pub mod component;
pub mod path;
pub mod union_find;

pub use adjacency::AdjacencyGraph;
pub use classify::{classify, DegreeHistogram};
pub use component::{Component, ComponentNode};
pub use path::{generate_path, ComponentPath};
pub use union_find::UnionFind;
