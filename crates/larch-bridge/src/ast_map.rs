//! Mapping from semantic identities to the syntax subtrees covering them.
//!
//! Some handlers assign a role to a child they know only by semantic
//! identity, after that child has already been folded. The id is the stable
//! handle; insertion happens at fold time.

use larch_ast::{DeclId, ExprId, QualifierId, StmtId};
use larch_syntax::NodeId;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum AstKey {
    Decl(DeclId),
    Stmt(StmtId),
    Expr(ExprId),
    Qualifier(QualifierId),
}

#[derive(Default)]
pub(crate) struct AstMap {
    nodes: FxHashMap<AstKey, NodeId>,
}

impl AstMap {
    #[track_caller]
    pub(crate) fn insert(&mut self, key: AstKey, node: NodeId) {
        let previous = self.nodes.insert(key, node);
        assert!(previous.is_none(), "mapping for {key:?} added twice");
    }

    pub(crate) fn find(&self, key: AstKey) -> Option<NodeId> {
        self.nodes.get(&key).copied()
    }
}
