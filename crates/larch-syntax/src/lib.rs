//! The lossless syntax tree.
//!
//! Leaves wrap exactly one expanded token; interior nodes carry a syntactic
//! [`NodeKind`]; every edge to a child carries a semantic [`NodeRole`]. The
//! tree is mutable only through [`Builder`] while it is being constructed and
//! immutable once finished.

mod kind;
mod role;
mod tree;

pub use kind::NodeKind;
pub use role::NodeRole;
pub use tree::{Builder, NodeId, SyntaxNode, SyntaxTree};
