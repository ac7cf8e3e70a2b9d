//! Shared construction state for the traversal driver.

use larch_ast::{Ast, DeclId, DeclKind, ExprId, StmtId, StmtKind};
use larch_syntax::{Builder, NodeId, NodeKind, NodeRole, SyntaxTree};
use larch_tokens::{Location, SourceSpan, TokenBuffer, TokenId, TokenKind, TokenRange};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast_map::{AstKey, AstMap};
use crate::forest::Forest;

/// Holds the forest, the token index, and the semantic mapping while the
/// driver walks the AST. Handlers mark children with roles and then fold a
/// token range into a fresh node; every marked child must be consumed by the
/// fold that follows.
pub(crate) struct TreeBuilder<'a, 't> {
    ast: &'a Ast,
    tokens: &'t TokenBuffer,
    builder: Builder,
    /// Finds tokens by their start location in O(1).
    location_to_token: FxHashMap<Location, TokenId>,
    pending: Forest,
    /// Declarations whose statement consumes the trailing semicolon instead.
    decls_without_semicolon: FxHashSet<DeclId>,
    mapping: AstMap,
}

impl<'a, 't> TreeBuilder<'a, 't> {
    pub(crate) fn new(ast: &'a Ast, tokens: &'t TokenBuffer) -> TreeBuilder<'a, 't> {
        let mut builder = Builder::new();
        let pending = Forest::new(&mut builder, tokens);
        let location_to_token = tokens
            .expanded()
            .iter()
            .enumerate()
            .map(|(id, token)| (token.location(), id as TokenId))
            .collect();
        TreeBuilder {
            ast,
            tokens,
            builder,
            location_to_token,
            pending,
            decls_without_semicolon: FxHashSet::default(),
            mapping: AstMap::default(),
        }
    }

    pub(crate) fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub(crate) fn token_kind(&self, id: TokenId) -> TokenKind {
        self.tokens.token(id).kind
    }

    pub(crate) fn token_text(&self, id: TokenId) -> &'t str {
        self.tokens.token_text(id)
    }

    /// Finds the token starting at `loc`. The token must exist for any valid
    /// location the semantic tree hands out.
    #[track_caller]
    pub(crate) fn find_token(&self, loc: Location) -> Option<TokenId> {
        if !loc.is_valid() {
            return None;
        }
        match self.location_to_token.get(&loc) {
            Some(&token) => Some(token),
            None => panic!("no token starts at {loc:?}"),
        }
    }

    /// The tokens covered by `span`: from the token at `span.begin` through
    /// the token at `span.end`, inclusive.
    #[track_caller]
    pub(crate) fn get_range(&self, span: SourceSpan) -> TokenRange {
        let first = self.find_token(span.begin).expect("range starts at an invalid location");
        let last = self.find_token(span.end).expect("range ends at an invalid location");
        assert!(first <= last, "inverted source span");
        TokenRange::new(first, last + 1)
    }

    /// Notifies that the trailing semicolon of `decl` belongs to an enclosing
    /// statement and must not be consumed by the declaration's own range.
    pub(crate) fn notice_decl_without_semicolon(&mut self, decl: DeclId) {
        self.decls_without_semicolon.insert(decl);
    }

    fn with_trailing_semicolon(&self, range: TokenRange) -> TokenRange {
        assert!(!range.is_empty());
        assert_ne!(self.token_kind(range.last()), TokenKind::Eof);
        // Eof is never consumed, so looking one past the range is fine.
        if self.token_kind(range.last()) != TokenKind::Semi
            && self.token_kind(range.end) == TokenKind::Semi
        {
            return TokenRange::new(range.start, range.end + 1);
        }
        range
    }

    fn maybe_append_semicolon(&self, range: TokenRange, decl: DeclId) -> TokenRange {
        if matches!(self.ast.decl(decl).kind, DeclKind::Namespace { .. }) {
            return range;
        }
        if self.decls_without_semicolon.contains(&decl) {
            return range;
        }
        // Most declarations own a semicolon in the syntax tree, but not in
        // the semantic tree.
        self.with_trailing_semicolon(range)
    }

    pub(crate) fn declaration_range(&self, decl: DeclId) -> TokenRange {
        let data = self.ast.decl(decl);
        // Template parameter lists before a tag are folded separately; the
        // declaration starts at the tag keyword.
        let span = match &data.kind {
            DeclKind::Tag(tag) => SourceSpan::new(tag.tag_begin, data.span.end),
            _ => data.span,
        };
        self.maybe_append_semicolon(self.get_range(span), decl)
    }

    /// The full extent of a class-template specialization, including any
    /// `extern template` prefix.
    pub(crate) fn template_range(&self, decl: DeclId) -> TokenRange {
        self.maybe_append_semicolon(self.get_range(self.ast.decl(decl).span), decl)
    }

    /// The statement's tokens, extended over a trailing semicolon the
    /// semantic tree does not own, e.g. after `return` or `continue`.
    pub(crate) fn stmt_range(&self, stmt: StmtId) -> TokenRange {
        let data = self.ast.stmt(stmt);
        let range = self.get_range(data.span);
        if matches!(data.kind, StmtKind::Compound { .. }) {
            return range;
        }
        self.with_trailing_semicolon(range)
    }

    pub(crate) fn expr_range(&self, expr: ExprId) -> TokenRange {
        self.get_range(self.ast.expr(expr).span)
    }

    /// Sets the role of the token starting at `loc`. Invalid locations mean
    /// "no child at this position" and are skipped.
    pub(crate) fn mark_token(&mut self, loc: Location, role: NodeRole) {
        let Some(token) = self.find_token(loc) else { return };
        self.pending.assign_role(&mut self.builder, TokenRange::new(token, token + 1), role);
    }

    pub(crate) fn mark_opt_token(&mut self, loc: Option<Location>, role: NodeRole) {
        if let Some(loc) = loc {
            self.mark_token(loc, role);
        }
    }

    /// Sets the role of an already folded node.
    #[track_caller]
    pub(crate) fn mark_node(&mut self, node: NodeId, role: NodeRole) {
        self.builder.set_role(node, role);
    }

    /// Sets the role of the subtree recorded for a semantic identity.
    #[track_caller]
    pub(crate) fn mark_key(&mut self, key: AstKey, role: NodeRole) {
        let node = self.mapping.find(key).unwrap_or_else(|| panic!("{key:?} not yet folded"));
        self.mark_node(node, role);
    }

    /// Sets the role of an expression in non-statement position.
    pub(crate) fn mark_expr_child(&mut self, expr: ExprId, role: NodeRole) {
        let expr = self.ast.ignore_implicit(expr);
        self.mark_key(AstKey::Expr(expr), role);
    }

    /// Sets the role of a child in statement position. An expression child is
    /// first wrapped into an expression statement that owns the trailing
    /// semicolon.
    pub(crate) fn mark_stmt_child(&mut self, stmt: StmtId, role: NodeRole) {
        let node = if let StmtKind::Expr { expr } = &self.ast.stmt(stmt).kind {
            self.mark_expr_child(*expr, NodeRole::ExpressionStatementExpression);
            let range = self.stmt_range(stmt);
            self.fold_node(range, NodeKind::EXPRESSION_STATEMENT, None)
        } else {
            self.mapping.find(AstKey::Stmt(stmt)).expect("statement child not yet folded")
        };
        self.mark_node(node, role);
    }

    /// Folds `range` into a new node of the given kind, recording it for
    /// later role assignment when a semantic identity is provided.
    pub(crate) fn fold_node(
        &mut self,
        range: TokenRange,
        kind: NodeKind,
        key: Option<AstKey>,
    ) -> NodeId {
        let node = self.builder.alloc_tree(kind);
        self.pending.fold_children(&mut self.builder, self.tokens, range, node);
        if let Some(key) = key {
            self.mapping.insert(key, node);
        }
        node
    }

    /// Builds the root over all non-eof tokens and consumes the forest.
    pub(crate) fn finalize(mut self) -> SyntaxTree<'t> {
        let expanded = self.tokens.expanded();
        assert!(!expanded.is_empty());
        assert_eq!(expanded.last().unwrap().kind, TokenKind::Eof);

        let root = self.builder.alloc_tree(NodeKind::TRANSLATION_UNIT);
        let all = TokenRange::new(0, self.tokens.len() - 1);
        self.pending.fold_children(&mut self.builder, self.tokens, all, root);

        let root = self.pending.finalize();
        self.builder.set_role(root, NodeRole::Unknown);
        self.builder.finish(self.tokens, root)
    }
}
