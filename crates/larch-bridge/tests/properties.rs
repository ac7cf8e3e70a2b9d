//! Property tests over generated expressions and declarator chains.
//!
//! Each generator produces a source rendering and the matching semantic tree
//! in one pass, so the tests can check the construction invariants on inputs
//! no hand-written scenario would cover.

use larch_ast::{
    Ast, DeclData, DeclKind, DeclaratorData, ExprData, ExprId, ExprKind, StmtData, StmtKind,
    TypeLocData, TypeLocKind,
};
use larch_bridge::build_syntax_tree;
use larch_syntax::{NodeKind, NodeRole, SyntaxNode};
use larch_tokens::{SourceSpan, TokenBuffer, TokenId, lex};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum GenExpr {
    Number(u32),
    Name(&'static str),
    Paren(Box<GenExpr>),
    Prefix(&'static str, Box<GenExpr>),
    Postfix(&'static str, Box<GenExpr>),
    Binary(Box<GenExpr>, &'static str, Box<GenExpr>),
}

fn arb_expr() -> impl Strategy<Value = GenExpr> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(GenExpr::Number),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(GenExpr::Name),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|expr| GenExpr::Paren(Box::new(expr))),
            (prop::sample::select(vec!["-", "!", "~", "&"]), inner.clone())
                .prop_map(|(op, expr)| GenExpr::Prefix(op, Box::new(expr))),
            (prop::sample::select(vec!["++", "--"]), inner.clone())
                .prop_map(|(op, expr)| GenExpr::Postfix(op, Box::new(expr))),
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "==", "&&"]), inner)
                .prop_map(|(lhs, op, rhs)| GenExpr::Binary(Box::new(lhs), op, Box::new(rhs))),
        ]
    })
}

fn render(expr: &GenExpr, out: &mut Vec<String>) {
    match expr {
        GenExpr::Number(value) => out.push(value.to_string()),
        GenExpr::Name(name) => out.push((*name).to_string()),
        GenExpr::Paren(inner) => {
            out.push("(".to_string());
            render(inner, out);
            out.push(")".to_string());
        }
        GenExpr::Prefix(op, inner) => {
            out.push((*op).to_string());
            render(inner, out);
        }
        GenExpr::Postfix(op, inner) => {
            render(inner, out);
            out.push((*op).to_string());
        }
        GenExpr::Binary(lhs, op, rhs) => {
            render(lhs, out);
            out.push((*op).to_string());
            render(rhs, out);
        }
    }
}

/// Allocates the semantic node for `expr`, consuming token indices in the
/// same order `render` emitted them.
fn lower(expr: &GenExpr, ast: &mut Ast, buffer: &TokenBuffer, cursor: &mut TokenId) -> ExprId {
    let take = |cursor: &mut TokenId| {
        let loc = buffer.token(*cursor).location();
        *cursor += 1;
        loc
    };
    match expr {
        GenExpr::Number(_) => {
            let loc = take(cursor);
            ast.alloc_expr(ExprData {
                span: SourceSpan::point(loc),
                kind: ExprKind::IntLiteral { literal: loc },
            })
        }
        GenExpr::Name(_) => {
            let loc = take(cursor);
            let span = SourceSpan::point(loc);
            ast.alloc_expr(ExprData {
                span,
                kind: ExprKind::DeclRef { qualifier: None, template_kw: None, name: span },
            })
        }
        GenExpr::Paren(inner) => {
            let lparen = take(cursor);
            let inner = lower(inner, ast, buffer, cursor);
            let rparen = take(cursor);
            ast.alloc_expr(ExprData {
                span: SourceSpan::new(lparen, rparen),
                kind: ExprKind::Paren { lparen, inner, rparen },
            })
        }
        GenExpr::Prefix(_, inner) => {
            let op = take(cursor);
            let operand = lower(inner, ast, buffer, cursor);
            let end = ast.expr(operand).span.end;
            ast.alloc_expr(ExprData {
                span: SourceSpan::new(op, end),
                kind: ExprKind::Unary { op, operand, postfix: false },
            })
        }
        GenExpr::Postfix(_, inner) => {
            let operand = lower(inner, ast, buffer, cursor);
            let op = take(cursor);
            let begin = ast.expr(operand).span.begin;
            ast.alloc_expr(ExprData {
                span: SourceSpan::new(begin, op),
                kind: ExprKind::Unary { op, operand, postfix: true },
            })
        }
        GenExpr::Binary(lhs, _, rhs) => {
            let lhs = lower(lhs, ast, buffer, cursor);
            let op = take(cursor);
            let rhs = lower(rhs, ast, buffer, cursor);
            let begin = ast.expr(lhs).span.begin;
            let end = ast.expr(rhs).span.end;
            ast.alloc_expr(ExprData {
                span: SourceSpan::new(begin, end),
                kind: ExprKind::Binary { lhs, op, rhs },
            })
        }
    }
}

/// Wraps the expression into `void f ( ) { <expr> ; }`.
fn build_unit(expr: &GenExpr) -> (TokenBuffer, Ast) {
    let mut tokens =
        vec!["void".to_string(), "f".into(), "(".into(), ")".into(), "{".into()];
    render(expr, &mut tokens);
    tokens.push(";".into());
    tokens.push("}".into());
    let text = tokens.join(" ");
    let buffer = lex(&text);
    assert_eq!(buffer.len() as usize, tokens.len() + 1, "fixture diverges from the lexer");

    let mut ast = Ast::new();
    let mut cursor: TokenId = 5;
    let root_expr = lower(expr, &mut ast, &buffer, &mut cursor);
    let rbrace = cursor + 1;
    let loc = |index: TokenId| buffer.token(index).location();

    let span = ast.expr(root_expr).span;
    let stmt = ast.alloc_stmt(StmtData { span, kind: StmtKind::Expr { expr: root_expr } });
    let compound = ast.alloc_stmt(StmtData {
        span: SourceSpan::new(loc(4), loc(rbrace)),
        kind: StmtKind::Compound { lbrace: loc(4), body: vec![stmt], rbrace: loc(rbrace) },
    });
    let return_loc = ast.alloc_type_loc(TypeLocData {
        span: SourceSpan::point(loc(0)),
        kind: TypeLocKind::Named { qualifier: None },
    });
    let type_loc = ast.alloc_type_loc(TypeLocData {
        span: SourceSpan::new(loc(0), loc(3)),
        kind: TypeLocKind::FunctionProto {
            lparen: loc(2),
            params: Vec::new(),
            rparen: loc(3),
            return_loc,
            trailing_arrow: None,
        },
    });
    let declarator =
        DeclaratorData { qualifier: None, type_loc, name: Some(loc(1)), init: None };
    let function = ast.alloc_decl(DeclData {
        span: SourceSpan::new(loc(0), loc(rbrace)),
        kind: DeclKind::Function { declarator, body: Some(compound) },
    });
    ast.push_top_level(function);
    (buffer, ast)
}

fn check_shapes(node: SyntaxNode<'_>) {
    assert_ne!(node.role(), NodeRole::Detached);
    let children: Vec<_> = node.children().collect();
    match node.kind() {
        NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION => {
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].role(), NodeRole::OperatorExpressionOperatorToken);
            assert_eq!(children[1].role(), NodeRole::UnaryOperatorExpressionOperand);
        }
        NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION => {
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].role(), NodeRole::UnaryOperatorExpressionOperand);
            assert_eq!(children[1].role(), NodeRole::OperatorExpressionOperatorToken);
        }
        NodeKind::BINARY_OPERATOR_EXPRESSION => {
            assert_eq!(children.len(), 3);
            assert_eq!(children[0].role(), NodeRole::BinaryOperatorExpressionLeftHandSide);
            assert_eq!(children[1].role(), NodeRole::OperatorExpressionOperatorToken);
            assert_eq!(children[2].role(), NodeRole::BinaryOperatorExpressionRightHandSide);
        }
        NodeKind::EXPRESSION_STATEMENT => {
            let last = children.last().unwrap();
            assert_eq!(last.text(), Some(";"), "expression statement must own its semicolon");
        }
        _ => {}
    }
    for child in children {
        check_shapes(child);
    }
}

fn count_kind(node: SyntaxNode<'_>, kind: NodeKind) -> usize {
    usize::from(node.kind() == kind)
        + node.children().map(|child| count_kind(child, kind)).sum::<usize>()
}

#[derive(Debug, Clone)]
struct GenDeclarator {
    stars: usize,
    init: Option<u32>,
}

fn arb_chain() -> impl Strategy<Value = Vec<GenDeclarator>> {
    let declarator = (0usize..3, prop::option::of(0u32..100))
        .prop_map(|(stars, init)| GenDeclarator { stars, init });
    prop::collection::vec(declarator, 1..5)
}

/// Renders `int **a = 1, b, ...;` and the matching declarator-chain decls.
fn build_chain(chain: &[GenDeclarator]) -> (TokenBuffer, Ast) {
    const NAMES: [&str; 4] = ["a", "b", "c", "d"];

    let mut tokens = vec!["int".to_string()];
    for (index, declarator) in chain.iter().enumerate() {
        if index > 0 {
            tokens.push(",".to_string());
        }
        for _ in 0..declarator.stars {
            tokens.push("*".to_string());
        }
        tokens.push(NAMES[index].to_string());
        if let Some(value) = declarator.init {
            tokens.push("=".to_string());
            tokens.push(value.to_string());
        }
    }
    tokens.push(";".to_string());
    let text = tokens.join(" ");
    let buffer = lex(&text);
    assert_eq!(buffer.len() as usize, tokens.len() + 1, "fixture diverges from the lexer");
    let loc = |index: TokenId| buffer.token(index).location();

    let mut ast = Ast::new();
    let mut decls = Vec::new();
    let mut cursor: TokenId = 1;
    for (index, declarator) in chain.iter().enumerate() {
        if index > 0 {
            cursor += 1; // comma
        }
        let mut type_loc = ast.alloc_type_loc(TypeLocData {
            span: SourceSpan::point(loc(0)),
            kind: TypeLocKind::Named { qualifier: None },
        });
        for _ in 0..declarator.stars {
            let star = loc(cursor);
            cursor += 1;
            type_loc = ast.alloc_type_loc(TypeLocData {
                span: SourceSpan::new(loc(0), star),
                kind: TypeLocKind::Pointer { star, pointee: type_loc },
            });
        }
        let name = loc(cursor);
        cursor += 1;
        let mut end = name;
        let init = declarator.init.map(|_| {
            cursor += 1; // `=`
            let literal = loc(cursor);
            cursor += 1;
            end = literal;
            ast.alloc_expr(ExprData {
                span: SourceSpan::point(literal),
                kind: ExprKind::IntLiteral { literal },
            })
        });
        let decl = ast.alloc_decl(DeclData {
            span: SourceSpan::new(loc(0), end),
            kind: DeclKind::Var(DeclaratorData {
                qualifier: None,
                type_loc,
                name: Some(name),
                init,
            }),
        });
        decls.push(decl);
    }
    for decl in decls {
        ast.push_top_level(decl);
    }
    (buffer, ast)
}

proptest! {
    #[test]
    fn expression_leaves_round_trip(expr in arb_expr()) {
        let (buffer, ast) = build_unit(&expr);
        let tree = build_syntax_tree(&buffer, &ast);

        let leaves: Vec<_> = tree.root().leaves().map(|leaf| leaf.token().unwrap()).collect();
        let expected: Vec<_> = (0..buffer.len() - 1).collect();
        prop_assert_eq!(leaves, expected);

        check_shapes(tree.root());
    }

    #[test]
    fn declarator_chains_fold_once(chain in arb_chain()) {
        let (buffer, ast) = build_chain(&chain);
        let tree = build_syntax_tree(&buffer, &ast);
        let root = tree.root();

        prop_assert_eq!(count_kind(root, NodeKind::SIMPLE_DECLARATION), 1);
        prop_assert_eq!(count_kind(root, NodeKind::SIMPLE_DECLARATOR), chain.len());

        let declaration = root.children().next().unwrap();
        prop_assert_eq!(declaration.kind(), NodeKind::SIMPLE_DECLARATION);
        let last = declaration.leaves().last().unwrap();
        prop_assert_eq!(last.text(), Some(";"));
        check_shapes(root);
    }
}
