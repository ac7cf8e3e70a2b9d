//! Materializes a lossless syntax tree from a semantic AST and the expanded
//! token stream of a translation unit.
//!
//! The two inputs disagree about structure: the semantic tree elides
//! parentheses and punctuation, folds implicit conversions, and shapes
//! overloaded operators as calls, while the syntax tree must keep every
//! written token, nested syntactically and navigable by role. The
//! reconciliation happens in a single bottom-up pass:
//!
//! - every non-eof token starts out as a detached leaf in a pending forest,
//! - each semantic node, visited in post order, marks its child tokens and
//!   already-folded child subtrees with roles,
//! - and then folds its own token range into a fresh node, atomically
//!   replacing the covered forest entries.
//!
//! When the walk finishes, a single root covers the whole stream.

mod ast_map;
mod builder;
mod forest;
mod ranges;
mod visit;

use larch_ast::Ast;
use larch_syntax::SyntaxTree;
use larch_tokens::TokenBuffer;

/// Builds the syntax tree for a whole translation unit.
///
/// The returned tree's leaves are exactly the non-eof expanded tokens, in
/// order. Malformed semantic input violates internal preconditions and
/// panics; there are no recoverable errors at this layer.
pub fn build_syntax_tree<'t>(tokens: &'t TokenBuffer, ast: &Ast) -> SyntaxTree<'t> {
    visit::Traversal::new(ast, tokens).run()
}
