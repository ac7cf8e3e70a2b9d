//! The semantic AST the syntax-tree builder walks.
//!
//! This is the interface to the upstream semantic analyzer: a fully resolved
//! tree whose nodes carry source spans pointing back into the expanded token
//! stream. The shape follows semantics rather than syntax — implicit
//! conversions appear as wrapper nodes, overloaded operators as calls with an
//! operator kind, type locations are stored inside out, and punctuation is
//! absent except where a handler needs a keyword or delimiter location.

mod node;

use la_arena::{Arena, Idx};
pub use node::*;

pub type DeclId = Idx<DeclData>;
pub type StmtId = Idx<StmtData>;
pub type ExprId = Idx<ExprData>;
pub type TypeLocId = Idx<TypeLocData>;
pub type QualifierId = Idx<QualifierData>;

/// One translation unit's worth of semantic nodes.
#[derive(Debug, Default)]
pub struct Ast {
    decls: Arena<DeclData>,
    stmts: Arena<StmtData>,
    exprs: Arena<ExprData>,
    type_locs: Arena<TypeLocData>,
    qualifiers: Arena<QualifierData>,
    translation_unit: Vec<DeclId>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    pub fn alloc_decl(&mut self, data: DeclData) -> DeclId {
        self.decls.alloc(data)
    }

    pub fn alloc_stmt(&mut self, data: StmtData) -> StmtId {
        self.stmts.alloc(data)
    }

    pub fn alloc_expr(&mut self, data: ExprData) -> ExprId {
        self.exprs.alloc(data)
    }

    pub fn alloc_type_loc(&mut self, data: TypeLocData) -> TypeLocId {
        self.type_locs.alloc(data)
    }

    pub fn alloc_qualifier(&mut self, data: QualifierData) -> QualifierId {
        self.qualifiers.alloc(data)
    }

    /// Appends a declaration to the translation-unit scope.
    pub fn push_top_level(&mut self, decl: DeclId) {
        self.translation_unit.push(decl);
    }

    pub fn translation_unit(&self) -> &[DeclId] {
        &self.translation_unit
    }

    pub fn decl(&self, id: DeclId) -> &DeclData {
        &self.decls[id]
    }

    pub fn stmt(&self, id: StmtId) -> &StmtData {
        &self.stmts[id]
    }

    pub fn expr(&self, id: ExprId) -> &ExprData {
        &self.exprs[id]
    }

    pub fn type_loc(&self, id: TypeLocId) -> &TypeLocData {
        &self.type_locs[id]
    }

    pub fn qualifier(&self, id: QualifierId) -> &QualifierData {
        &self.qualifiers[id]
    }

    /// Unwraps implicit-conversion wrappers down to the written expression.
    pub fn ignore_implicit(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Implicit { inner } = &self.expr(id).kind {
            id = *inner;
        }
        id
    }
}
