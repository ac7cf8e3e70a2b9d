//! The post-order traversal driver.
//!
//! One function per semantic node kind. Each visit recurses into the
//! children first, so a handler always sees its children already folded and
//! can refer to them by semantic identity. The handler then marks child
//! tokens and subtrees with roles and folds its own token range into a new
//! node.

use larch_ast::{
    Ast, DeclId, DeclKind, DeclaratorData, ExprId, ExprKind, LiteralOperatorKind,
    OverloadedOperator, QualifierId, SpecifierData, SpecifierKind, StmtId, StmtKind, TagData,
    TypeLocId, TypeLocKind,
};
use larch_syntax::{NodeId, NodeKind, NodeRole, SyntaxTree};
use larch_tokens::{Location, SourceSpan, TokenBuffer, TokenKind, TokenRange};

use crate::ast_map::AstKey;
use crate::builder::TreeBuilder;
use crate::ranges::{declarator_range, numeric_literal_is_floating};

pub(crate) struct Traversal<'a, 't> {
    b: TreeBuilder<'a, 't>,
}

impl<'a, 't> Traversal<'a, 't> {
    pub(crate) fn new(ast: &'a Ast, tokens: &'t TokenBuffer) -> Traversal<'a, 't> {
        Traversal { b: TreeBuilder::new(ast, tokens) }
    }

    fn ast(&self) -> &'a Ast {
        self.b.ast()
    }

    pub(crate) fn run(mut self) -> SyntaxTree<'t> {
        let decls = self.ast().translation_unit();
        self.traverse_decl_list(decls);
        self.b.finalize()
    }

    // ---- Declarations ----------------------------------------------------

    fn traverse_decl_list(&mut self, decls: &[DeclId]) {
        for (index, &decl) in decls.iter().enumerate() {
            self.traverse_decl(decl, decls.get(index + 1).copied());
        }
    }

    /// Returns the node representing the declaration when this visit
    /// produced one.
    fn traverse_decl(&mut self, id: DeclId, next: Option<DeclId>) -> Option<NodeId> {
        let data = self.ast().decl(id);
        match &data.kind {
            DeclKind::Var(declarator) | DeclKind::Typedef(declarator) => {
                self.traverse_declarator(declarator);
                self.process_declarator_and_declaration(id, declarator, next)
            }
            DeclKind::Function { declarator, body } => {
                self.traverse_declarator(declarator);
                if let Some(body) = *body {
                    self.traverse_stmt(body);
                }
                self.process_declarator_and_declaration(id, declarator, next)
            }
            DeclKind::TypeAlias => {
                Some(self.fold_declaration(id, NodeKind::TYPE_ALIAS_DECLARATION))
            }
            DeclKind::Tag(tag) => self.traverse_tag(id, tag),
            DeclKind::Template { template_kw, params, inner } => {
                self.traverse_decl_list(params);
                let inner_node = self.traverse_decl(*inner, None);
                let range = self.b.declaration_range(id);
                Some(self.fold_template_declaration(
                    range,
                    *template_kw,
                    inner_node,
                    Some(AstKey::Decl(id)),
                ))
            }
            DeclKind::Namespace { body } => {
                self.traverse_decl_list(body);
                let range = self.b.declaration_range(id);
                // Nested namespace shorthand: `namespace a::b {}` yields an
                // inner declaration starting at `::`. The outer definition
                // covers those tokens.
                if self.b.token_kind(range.first()) == TokenKind::ColonColon {
                    return None;
                }
                Some(self.b.fold_node(range, NodeKind::NAMESPACE_DEFINITION, Some(AstKey::Decl(id))))
            }
            DeclKind::NamespaceAlias => {
                Some(self.fold_declaration(id, NodeKind::NAMESPACE_ALIAS_DEFINITION))
            }
            DeclKind::UsingDirective => {
                Some(self.fold_declaration(id, NodeKind::USING_NAMESPACE_DIRECTIVE))
            }
            DeclKind::Using => Some(self.fold_declaration(id, NodeKind::USING_DECLARATION)),
            DeclKind::Empty => Some(self.fold_declaration(id, NodeKind::EMPTY_DECLARATION)),
            DeclKind::StaticAssert { condition, message } => {
                self.traverse_expr(*condition);
                if let Some(message) = *message {
                    self.traverse_expr(message);
                }
                self.b.mark_expr_child(*condition, NodeRole::StaticAssertDeclarationCondition);
                if let Some(message) = *message {
                    self.b.mark_expr_child(message, NodeRole::StaticAssertDeclarationMessage);
                }
                Some(self.fold_declaration(id, NodeKind::STATIC_ASSERT_DECLARATION))
            }
            DeclKind::LinkageSpec { body } => {
                self.traverse_decl_list(body);
                Some(self.fold_declaration(id, NodeKind::LINKAGE_SPECIFICATION))
            }
            DeclKind::Unknown => Some(self.fold_declaration(id, NodeKind::UNKNOWN_DECLARATION)),
        }
    }

    fn fold_declaration(&mut self, id: DeclId, kind: NodeKind) -> NodeId {
        let range = self.b.declaration_range(id);
        self.b.fold_node(range, kind, Some(AstKey::Decl(id)))
    }

    fn traverse_tag(&mut self, id: DeclId, tag: &TagData) -> Option<NodeId> {
        self.traverse_decl_list(&tag.members);
        match &tag.specialization {
            // Explicit instantiations get no ordinary walk-up; handle them
            // after the manual descent.
            Some(specialization) if !specialization.is_explicit_specialization => {
                let declaration = self.handle_free_standing_tag(id, tag);
                let range = self.b.template_range(id);
                self.b.mark_opt_token(specialization.extern_kw, NodeRole::ExternKeyword);
                self.b.mark_token(specialization.template_kw, NodeRole::IntroducerKeyword);
                self.b.mark_node(declaration, NodeRole::ExplicitTemplateInstantiationDeclaration);
                Some(self.b.fold_node(
                    range,
                    NodeKind::EXPLICIT_TEMPLATE_INSTANTIATION,
                    Some(AstKey::Decl(id)),
                ))
            }
            _ => {
                if !tag.free_standing {
                    assert!(tag.template_param_lists.is_empty());
                    return None;
                }
                Some(self.handle_free_standing_tag(id, tag))
            }
        }
    }

    /// A free-standing tag is a declaration specifier and needs a spanning
    /// declaration node, wrapped in one template declaration per written
    /// template-parameter list.
    fn handle_free_standing_tag(&mut self, id: DeclId, tag: &TagData) -> NodeId {
        let mut declaration_range = self.b.declaration_range(id);
        let mut result = self.b.fold_node(declaration_range, NodeKind::SIMPLE_DECLARATION, None);
        for params in tag.template_param_lists.iter().rev() {
            let template_kw = self.b.find_token(params.template_kw).unwrap();
            let range = TokenRange::new(template_kw, declaration_range.end);
            result = self.fold_template_declaration(range, params.template_kw, Some(result), None);
            declaration_range = range;
        }
        result
    }

    fn fold_template_declaration(
        &mut self,
        range: TokenRange,
        template_kw: Location,
        inner: Option<NodeId>,
        key: Option<AstKey>,
    ) -> NodeId {
        let keyword = self.b.find_token(template_kw).unwrap();
        assert_eq!(self.b.token_kind(keyword), TokenKind::TemplateKw);
        self.b.mark_token(template_kw, NodeRole::IntroducerKeyword);
        if let Some(inner) = inner {
            self.b.mark_node(inner, NodeRole::TemplateDeclarationDeclaration);
        }
        self.b.fold_node(range, NodeKind::TEMPLATE_DECLARATION, key)
    }

    // ---- Declarators -----------------------------------------------------

    fn traverse_declarator(&mut self, declarator: &DeclaratorData) {
        if let Some(qualifier) = declarator.qualifier {
            self.traverse_qualifier(qualifier);
        }
        self.traverse_type_loc(declarator.type_loc);
        if let Some(init) = declarator.init {
            self.traverse_expr(init);
        }
    }

    /// Folds the declarator node if there is one, and the spanning
    /// declaration if this is the last declarator of a comma chain.
    fn process_declarator_and_declaration(
        &mut self,
        id: DeclId,
        declarator: &DeclaratorData,
        next: Option<DeclId>,
    ) -> Option<NodeId> {
        let initializer = declarator.init.map(|init| self.ast().expr(init).span);
        // A qualified name starts the declarator at its qualifier.
        let name = match declarator.qualifier {
            Some(qualifier) => Some(self.ast().qualifier(qualifier).span.begin),
            None => declarator.name,
        };

        // There doesn't have to be a declarator; `void foo(int)` has a
        // declaration for the parameter but no declarator.
        if let Some(span) = declarator_range(self.ast(), declarator.type_loc, name, initializer) {
            let range = self.b.get_range(span);
            let node = self.b.fold_node(range, NodeKind::SIMPLE_DECLARATOR, None);
            self.b.mark_node(node, NodeRole::SimpleDeclarationDeclarator);
        }

        if self.is_last_in_chain(id, next) {
            let range = self.b.declaration_range(id);
            return Some(self.b.fold_node(
                range,
                NodeKind::SIMPLE_DECLARATION,
                Some(AstKey::Decl(id)),
            ));
        }
        None
    }

    /// The last declarator of a chain creates the spanning declaration: its
    /// next sibling is absent, of another kind, or starts elsewhere.
    fn is_last_in_chain(&self, id: DeclId, next: Option<DeclId>) -> bool {
        let Some(next) = next else { return true };
        let decl = self.ast().decl(id);
        let next = self.ast().decl(next);
        std::mem::discriminant(&decl.kind) != std::mem::discriminant(&next.kind)
            || decl.span.begin != next.span.begin
    }

    // ---- Type locations --------------------------------------------------

    fn traverse_type_loc(&mut self, id: TypeLocId) {
        let data = self.ast().type_loc(id);
        match &data.kind {
            TypeLocKind::Named { qualifier }
            | TypeLocKind::TemplateSpec { qualifier, .. } => {
                if let Some(qualifier) = *qualifier {
                    self.traverse_qualifier(qualifier);
                }
            }
            TypeLocKind::Decltype { expr } => {
                if let Some(expr) = *expr {
                    self.traverse_expr(expr);
                }
            }
            TypeLocKind::Pointer { pointee, .. } | TypeLocKind::Reference { pointee, .. } => {
                self.traverse_type_loc(*pointee);
            }
            TypeLocKind::MemberPointer { qualifier_span, pointee } => {
                // Folded before the descent: the pointee's paren declarator
                // covers these tokens.
                let range = self.b.get_range(*qualifier_span);
                self.b.fold_node(range, NodeKind::MEMBER_POINTER, None);
                self.traverse_type_loc(*pointee);
            }
            TypeLocKind::Paren { lparen, inner, rparen } => {
                self.traverse_type_loc(*inner);
                self.b.mark_token(*lparen, NodeRole::OpenParen);
                self.b.mark_token(*rparen, NodeRole::CloseParen);
                let range = self.b.get_range(SourceSpan::new(*lparen, *rparen));
                self.b.fold_node(range, NodeKind::PAREN_DECLARATOR, None);
            }
            TypeLocKind::Array { element, lbracket, size, rbracket } => {
                self.traverse_type_loc(*element);
                if let Some(size) = *size {
                    self.traverse_expr(size);
                }
                self.b.mark_token(*lbracket, NodeRole::OpenParen);
                if let Some(size) = *size {
                    self.b.mark_expr_child(size, NodeRole::ArraySubscriptSizeExpression);
                }
                self.b.mark_token(*rbracket, NodeRole::CloseParen);
                let range = self.b.get_range(SourceSpan::new(*lbracket, *rbracket));
                self.b.fold_node(range, NodeKind::ARRAY_SUBSCRIPT, None);
            }
            TypeLocKind::FunctionProto { lparen, params, rparen, return_loc, trailing_arrow } => {
                self.traverse_decl_list(params);
                self.traverse_type_loc(*return_loc);

                if let Some(arrow) = *trailing_arrow {
                    let trailing = self.build_trailing_return(arrow, *return_loc);
                    self.b.mark_node(trailing, NodeRole::ParametersAndQualifiersTrailingReturn);
                }
                self.b.mark_token(*lparen, NodeRole::OpenParen);
                for &param in params {
                    self.b
                        .mark_key(AstKey::Decl(param), NodeRole::ParametersAndQualifiersParameter);
                }
                self.b.mark_token(*rparen, NodeRole::CloseParen);
                let end = match *trailing_arrow {
                    Some(_) => self.ast().type_loc(*return_loc).span.end,
                    None => *rparen,
                };
                let range = self.b.get_range(SourceSpan::new(*lparen, end));
                self.b.fold_node(range, NodeKind::PARAMETERS_AND_QUALIFIERS, None);
            }
        }
    }

    /// Builds the `-> type` node, with a declarator for the returned type
    /// when it has one.
    fn build_trailing_return(&mut self, arrow: Location, return_loc: TypeLocId) -> NodeId {
        let declarator = declarator_range(self.ast(), return_loc, None, None).map(|span| {
            let range = self.b.get_range(span);
            self.b.fold_node(range, NodeKind::SIMPLE_DECLARATOR, None)
        });

        let arrow_token = self.b.find_token(arrow).unwrap();
        assert_eq!(self.b.token_kind(arrow_token), TokenKind::Arrow);
        self.b.mark_token(arrow, NodeRole::ArrowToken);
        if let Some(declarator) = declarator {
            self.b.mark_node(declarator, NodeRole::TrailingReturnTypeDeclarator);
        }
        let end = self.ast().type_loc(return_loc).span.end;
        let range = self.b.get_range(SourceSpan::new(arrow, end));
        self.b.fold_node(range, NodeKind::TRAILING_RETURN_TYPE, None)
    }

    // ---- Statements ------------------------------------------------------

    fn traverse_stmt(&mut self, id: StmtId) {
        let data = self.ast().stmt(id);
        match &data.kind {
            StmtKind::Compound { lbrace, body, rbrace } => {
                for &child in body {
                    self.traverse_stmt(child);
                }
                self.b.mark_token(*lbrace, NodeRole::OpenParen);
                for &child in body {
                    self.b.mark_stmt_child(child, NodeRole::CompoundStatementStatement);
                }
                self.b.mark_token(*rbrace, NodeRole::CloseParen);
                self.fold_statement(id, NodeKind::COMPOUND_STATEMENT);
            }
            StmtKind::Decl { decls } => {
                // The statement owns the trailing semicolon; the declarations
                // must not consume it.
                for &decl in decls {
                    self.b.notice_decl_without_semicolon(decl);
                }
                self.traverse_decl_list(decls);
                self.fold_statement(id, NodeKind::DECLARATION_STATEMENT);
            }
            StmtKind::Expr { expr } => self.traverse_expr(*expr),
            StmtKind::Null => self.fold_statement(id, NodeKind::EMPTY_STATEMENT),
            StmtKind::If { if_kw, condition, then_branch, else_kw, else_branch } => {
                self.traverse_expr(*condition);
                self.traverse_stmt(*then_branch);
                if let Some(else_branch) = *else_branch {
                    self.traverse_stmt(else_branch);
                }
                self.b.mark_token(*if_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*then_branch, NodeRole::IfStatementThenStatement);
                self.b.mark_opt_token(*else_kw, NodeRole::IfStatementElseKeyword);
                if let Some(else_branch) = *else_branch {
                    self.b.mark_stmt_child(else_branch, NodeRole::IfStatementElseStatement);
                }
                self.fold_statement(id, NodeKind::IF_STATEMENT);
            }
            StmtKind::Switch { switch_kw, condition, body } => {
                self.traverse_expr(*condition);
                self.traverse_stmt(*body);
                self.b.mark_token(*switch_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::SWITCH_STATEMENT);
            }
            StmtKind::Case { case_kw, value, body } => {
                self.traverse_expr(*value);
                self.traverse_stmt(*body);
                self.b.mark_token(*case_kw, NodeRole::IntroducerKeyword);
                self.b.mark_expr_child(*value, NodeRole::CaseStatementValue);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::CASE_STATEMENT);
            }
            StmtKind::Default { default_kw, body } => {
                self.traverse_stmt(*body);
                self.b.mark_token(*default_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::DEFAULT_STATEMENT);
            }
            StmtKind::While { while_kw, condition, body } => {
                self.traverse_expr(*condition);
                self.traverse_stmt(*body);
                self.b.mark_token(*while_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::WHILE_STATEMENT);
            }
            StmtKind::For { for_kw, init, condition, increment, body } => {
                if let Some(init) = *init {
                    self.traverse_stmt(init);
                }
                if let Some(condition) = *condition {
                    self.traverse_expr(condition);
                }
                if let Some(increment) = *increment {
                    self.traverse_expr(increment);
                }
                self.traverse_stmt(*body);
                self.b.mark_token(*for_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::FOR_STATEMENT);
            }
            StmtKind::RangeFor { for_kw, init, loop_var, range, body } => {
                // Fixed order: the loop variable is a declaration and the
                // range initializer an expression; a statement-shaped descent
                // would produce mis-shaped intermediate subtrees.
                if let Some(init) = *init {
                    self.traverse_stmt(init);
                }
                self.traverse_decl(*loop_var, None);
                self.traverse_expr(*range);
                self.traverse_stmt(*body);
                self.b.mark_token(*for_kw, NodeRole::IntroducerKeyword);
                self.b.mark_stmt_child(*body, NodeRole::BodyStatement);
                self.fold_statement(id, NodeKind::RANGE_BASED_FOR_STATEMENT);
            }
            StmtKind::Return { return_kw, value } => {
                if let Some(value) = *value {
                    self.traverse_expr(value);
                }
                self.b.mark_token(*return_kw, NodeRole::IntroducerKeyword);
                if let Some(value) = *value {
                    self.b.mark_expr_child(value, NodeRole::ReturnStatementValue);
                }
                self.fold_statement(id, NodeKind::RETURN_STATEMENT);
            }
            StmtKind::Break { break_kw } => {
                self.b.mark_token(*break_kw, NodeRole::IntroducerKeyword);
                self.fold_statement(id, NodeKind::BREAK_STATEMENT);
            }
            StmtKind::Continue { continue_kw } => {
                self.b.mark_token(*continue_kw, NodeRole::IntroducerKeyword);
                self.fold_statement(id, NodeKind::CONTINUE_STATEMENT);
            }
            StmtKind::Unknown { children } => {
                for &child in children {
                    self.traverse_stmt(child);
                }
                self.fold_statement(id, NodeKind::UNKNOWN_STATEMENT);
            }
        }
    }

    fn fold_statement(&mut self, id: StmtId, kind: NodeKind) {
        let range = self.b.stmt_range(id);
        self.b.fold_node(range, kind, Some(AstKey::Stmt(id)));
    }

    // ---- Expressions -----------------------------------------------------

    fn traverse_expr(&mut self, id: ExprId) {
        // Only the written expression reaches the tree.
        let id = self.ast().ignore_implicit(id);
        let data = self.ast().expr(id);
        match &data.kind {
            ExprKind::DeclRef { qualifier, template_kw, name } => {
                if let Some(qualifier) = *qualifier {
                    self.traverse_qualifier(qualifier);
                }
                self.build_id_expression(*qualifier, *template_kw, *name, Some(AstKey::Expr(id)));
            }
            ExprKind::Member { base, qualifier, template_kw, access, member, implicit_access } => {
                self.traverse_expr(*base);
                if let Some(qualifier) = *qualifier {
                    self.traverse_qualifier(qualifier);
                }
                if *implicit_access {
                    // Without a written object, an access is syntactically
                    // indistinguishable from an id-expression.
                    self.build_id_expression(
                        *qualifier,
                        *template_kw,
                        *member,
                        Some(AstKey::Expr(id)),
                    );
                } else {
                    let member_node =
                        self.build_id_expression(*qualifier, *template_kw, *member, None);
                    self.b.mark_node(member_node, NodeRole::MemberExpressionMember);
                    self.b.mark_expr_child(*base, NodeRole::MemberExpressionObject);
                    self.b.mark_token(*access, NodeRole::MemberExpressionAccessToken);
                    let range = self.b.expr_range(id);
                    self.b.fold_node(range, NodeKind::MEMBER_EXPRESSION, Some(AstKey::Expr(id)));
                }
            }
            ExprKind::This { this_kw, implicit } => {
                if !*implicit {
                    self.b.mark_token(*this_kw, NodeRole::IntroducerKeyword);
                    let range = self.b.expr_range(id);
                    self.b.fold_node(range, NodeKind::THIS_EXPRESSION, Some(AstKey::Expr(id)));
                }
            }
            ExprKind::Paren { lparen, inner, rparen } => {
                self.traverse_expr(*inner);
                self.b.mark_token(*lparen, NodeRole::OpenParen);
                self.b.mark_expr_child(*inner, NodeRole::ParenExpressionSubExpression);
                self.b.mark_token(*rparen, NodeRole::CloseParen);
                let range = self.b.expr_range(id);
                self.b.fold_node(range, NodeKind::PAREN_EXPRESSION, Some(AstKey::Expr(id)));
            }
            ExprKind::IntLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::INTEGER_LITERAL_EXPRESSION);
            }
            ExprKind::FloatLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::FLOATING_LITERAL_EXPRESSION);
            }
            ExprKind::CharLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::CHARACTER_LITERAL_EXPRESSION);
            }
            ExprKind::StringLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::STRING_LITERAL_EXPRESSION);
            }
            ExprKind::BoolLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::BOOL_LITERAL_EXPRESSION);
            }
            ExprKind::NullptrLiteral { literal } => {
                self.fold_literal(id, *literal, NodeKind::NULLPTR_LITERAL_EXPRESSION);
            }
            ExprKind::UserDefinedLiteral { literal, operator } => {
                let kind = self.user_defined_literal_kind(*literal, *operator);
                self.fold_literal(id, *literal, kind);
            }
            ExprKind::Unary { op, operand, postfix } => {
                self.traverse_expr(*operand);
                self.b.mark_token(*op, NodeRole::OperatorExpressionOperatorToken);
                self.b.mark_expr_child(*operand, NodeRole::UnaryOperatorExpressionOperand);
                let kind = if *postfix {
                    NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION
                } else {
                    NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION
                };
                let range = self.b.expr_range(id);
                self.b.fold_node(range, kind, Some(AstKey::Expr(id)));
            }
            ExprKind::Binary { lhs, op, rhs } => {
                self.traverse_expr(*lhs);
                self.traverse_expr(*rhs);
                self.b.mark_expr_child(*lhs, NodeRole::BinaryOperatorExpressionLeftHandSide);
                self.b.mark_token(*op, NodeRole::OperatorExpressionOperatorToken);
                self.b.mark_expr_child(*rhs, NodeRole::BinaryOperatorExpressionRightHandSide);
                let range = self.b.expr_range(id);
                self.b.fold_node(range, NodeKind::BINARY_OPERATOR_EXPRESSION, Some(AstKey::Expr(id)));
            }
            ExprKind::OperatorCall { operator, op, args } => {
                for &arg in args {
                    // The phantom operand that distinguishes postfix from
                    // prefix increment has no source range; nothing was
                    // written for it.
                    if !self.ast().expr(arg).span.is_valid() {
                        debug_assert_eq!(
                            operator_expression_kind(*operator, args.len()),
                            NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION
                        );
                        continue;
                    }
                    self.traverse_expr(arg);
                }
                self.walk_up_operator_call(id, *operator, *op, args);
            }
            ExprKind::Implicit { .. } => unreachable!("implicit nodes are stripped on entry"),
            ExprKind::Unknown { children } => {
                for &child in children {
                    self.traverse_expr(child);
                }
                let range = self.b.expr_range(id);
                self.b.fold_node(range, NodeKind::UNKNOWN_EXPRESSION, Some(AstKey::Expr(id)));
            }
        }
    }

    fn fold_literal(&mut self, id: ExprId, literal: Location, kind: NodeKind) {
        self.b.mark_token(literal, NodeRole::LiteralToken);
        let range = self.b.expr_range(id);
        self.b.fold_node(range, kind, Some(AstKey::Expr(id)));
    }

    fn user_defined_literal_kind(
        &self,
        literal: Location,
        operator: LiteralOperatorKind,
    ) -> NodeKind {
        match operator {
            LiteralOperatorKind::Integer => NodeKind::INTEGER_USER_DEFINED_LITERAL_EXPRESSION,
            LiteralOperatorKind::Floating => NodeKind::FLOAT_USER_DEFINED_LITERAL_EXPRESSION,
            LiteralOperatorKind::Character => NodeKind::CHAR_USER_DEFINED_LITERAL_EXPRESSION,
            LiteralOperatorKind::String => NodeKind::STRING_USER_DEFINED_LITERAL_EXPRESSION,
            // The semantic node does not record the operand category for raw
            // and template literal operators; the spelling tells integers and
            // floats apart.
            LiteralOperatorKind::Raw | LiteralOperatorKind::Template => {
                let token = self.b.find_token(literal).unwrap();
                if numeric_literal_is_floating(self.b.token_text(token)) {
                    NodeKind::FLOAT_USER_DEFINED_LITERAL_EXPRESSION
                } else {
                    NodeKind::INTEGER_USER_DEFINED_LITERAL_EXPRESSION
                }
            }
        }
    }

    fn walk_up_operator_call(
        &mut self,
        id: ExprId,
        operator: OverloadedOperator,
        op: Location,
        args: &[ExprId],
    ) {
        let range = self.b.expr_range(id);
        match operator_expression_kind(operator, args.len()) {
            kind @ NodeKind::BINARY_OPERATOR_EXPRESSION => {
                self.b.mark_expr_child(args[0], NodeRole::BinaryOperatorExpressionLeftHandSide);
                self.b.mark_token(op, NodeRole::OperatorExpressionOperatorToken);
                self.b.mark_expr_child(args[1], NodeRole::BinaryOperatorExpressionRightHandSide);
                self.b.fold_node(range, kind, Some(AstKey::Expr(id)));
            }
            kind @ (NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION
            | NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION) => {
                self.b.mark_token(op, NodeRole::OperatorExpressionOperatorToken);
                self.b.mark_expr_child(args[0], NodeRole::UnaryOperatorExpressionOperand);
                self.b.fold_node(range, kind, Some(AstKey::Expr(id)));
            }
            kind @ NodeKind::UNKNOWN_EXPRESSION => {
                self.b.fold_node(range, kind, Some(AstKey::Expr(id)));
            }
            kind => unreachable!("operator calls never fold {kind:?}"),
        }
    }

    // ---- Qualified names -------------------------------------------------

    fn traverse_qualifier(&mut self, id: QualifierId) {
        let qualifier = self.ast().qualifier(id);
        // A flat list rather than a right-leaning tree: each specifier folds
        // its own disjoint tokens, then the whole chain folds once.
        for specifier in &qualifier.specifiers {
            if let Some(node) = self.build_name_specifier(specifier) {
                self.b.mark_node(node, NodeRole::ListElement);
            }
            self.b.mark_token(specifier.coloncolon, NodeRole::ListDelimiter);
        }
        let range = self.b.get_range(qualifier.span);
        self.b.fold_node(range, NodeKind::NESTED_NAME_SPECIFIER, Some(AstKey::Qualifier(id)));
    }

    fn build_name_specifier(&mut self, specifier: &SpecifierData) -> Option<NodeId> {
        match self.name_specifier_kind(specifier) {
            // The global `::` root has no name tokens of its own.
            NodeKind::GLOBAL_NAME_SPECIFIER => None,
            NodeKind::DECLTYPE_NAME_SPECIFIER => {
                let SpecifierKind::TypeSpec { type_loc, .. } = specifier.kind else {
                    unreachable!()
                };
                // Folds whatever the decltype operand contains.
                self.traverse_type_loc(type_loc);
                let range = self.specifier_range(specifier);
                Some(self.b.fold_node(range, NodeKind::DECLTYPE_NAME_SPECIFIER, None))
            }
            kind @ NodeKind::IDENTIFIER_NAME_SPECIFIER => {
                let range = self.specifier_range(specifier);
                assert_eq!(range.len(), 1);
                Some(self.b.fold_node(range, kind, None))
            }
            kind @ NodeKind::SIMPLE_TEMPLATE_NAME_SPECIFIER => {
                let range = self.specifier_range(specifier);
                Some(self.b.fold_node(range, kind, None))
            }
            kind => unreachable!("name specifiers never fold {kind:?}"),
        }
    }

    /// The specifier's own tokens. A dependent template specialization
    /// starts at its `template` keyword.
    fn specifier_range(&self, specifier: &SpecifierData) -> TokenRange {
        let mut span = specifier.span;
        if let SpecifierKind::TypeSpec { type_loc, .. } = specifier.kind
            && let TypeLocKind::TemplateSpec { template_kw: Some(template_kw), .. } =
                &self.ast().type_loc(type_loc).kind
        {
            span.begin = *template_kw;
        }
        self.b.get_range(span)
    }

    fn name_specifier_kind(&self, specifier: &SpecifierData) -> NodeKind {
        match &specifier.kind {
            SpecifierKind::Global => NodeKind::GLOBAL_NAME_SPECIFIER,
            SpecifierKind::Namespace
            | SpecifierKind::NamespaceAlias
            | SpecifierKind::Identifier => NodeKind::IDENTIFIER_NAME_SPECIFIER,
            SpecifierKind::TypeSpec { with_template_kw: true, .. } => {
                NodeKind::SIMPLE_TEMPLATE_NAME_SPECIFIER
            }
            SpecifierKind::TypeSpec { type_loc, .. } => {
                match &self.ast().type_loc(*type_loc).kind {
                    TypeLocKind::Decltype { .. } => NodeKind::DECLTYPE_NAME_SPECIFIER,
                    TypeLocKind::TemplateSpec { .. } => NodeKind::SIMPLE_TEMPLATE_NAME_SPECIFIER,
                    _ => NodeKind::IDENTIFIER_NAME_SPECIFIER,
                }
            }
            SpecifierKind::Super => panic!("the __super specifier is not yet supported"),
        }
    }

    fn build_id_expression(
        &mut self,
        qualifier: Option<QualifierId>,
        template_kw: Option<Location>,
        unqualified_id: SourceSpan,
        from: Option<AstKey>,
    ) -> NodeId {
        if let Some(qualifier) = qualifier {
            self.b.mark_key(AstKey::Qualifier(qualifier), NodeRole::IdExpressionQualifier);
            self.b.mark_opt_token(template_kw, NodeRole::TemplateKeyword);
        }

        let range = self.b.get_range(unqualified_id);
        let unqualified = self.b.fold_node(range, NodeKind::UNQUALIFIED_ID, None);
        self.b.mark_node(unqualified, NodeRole::IdExpressionId);

        let begin = match qualifier {
            Some(qualifier) => self.ast().qualifier(qualifier).span.begin,
            None => unqualified_id.begin,
        };
        let range = self.b.get_range(SourceSpan::new(begin, unqualified_id.end));
        self.b.fold_node(range, NodeKind::ID_EXPRESSION, from)
    }
}

/// Shape of an overloaded-operator call, from the operator and its argument
/// count. Operators without a dedicated tree shape fold as unknown.
fn operator_expression_kind(operator: OverloadedOperator, num_args: usize) -> NodeKind {
    use OverloadedOperator::*;

    match operator {
        // Comparison, assignment, and always-binary computation.
        EqualEqual | ExclaimEqual | Greater | GreaterEqual | Less | LessEqual | Spaceship
        | Equal | SlashEqual | PercentEqual | CaretEqual | PipeEqual | LessLessEqual
        | GreaterGreaterEqual | PlusEqual | MinusEqual | StarEqual | AmpEqual | Slash
        | Percent | Caret | Pipe | LessLess | GreaterGreater | AmpAmp | PipePipe | ArrowStar
        | Comma => NodeKind::BINARY_OPERATOR_EXPRESSION,
        Tilde | Exclaim => NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION,
        PlusPlus | MinusMinus => match num_args {
            1 => NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION,
            2 => NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION,
            _ => panic!("invalid number of arguments for operator"),
        },
        Plus | Minus | Star | Amp => match num_args {
            1 => NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION,
            2 => NodeKind::BINARY_OPERATOR_EXPRESSION,
            _ => panic!("invalid number of arguments for operator"),
        },
        New | Delete | ArrayNew | ArrayDelete | Coawait | Call | Subscript | Arrow => {
            NodeKind::UNKNOWN_EXPRESSION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_shapes() {
        use OverloadedOperator::*;

        assert_eq!(operator_expression_kind(PlusPlus, 1), NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION);
        assert_eq!(
            operator_expression_kind(PlusPlus, 2),
            NodeKind::POSTFIX_UNARY_OPERATOR_EXPRESSION
        );
        assert_eq!(operator_expression_kind(Star, 1), NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION);
        assert_eq!(operator_expression_kind(Star, 2), NodeKind::BINARY_OPERATOR_EXPRESSION);
        assert_eq!(operator_expression_kind(Exclaim, 1), NodeKind::PREFIX_UNARY_OPERATOR_EXPRESSION);
        assert_eq!(operator_expression_kind(Comma, 2), NodeKind::BINARY_OPERATOR_EXPRESSION);
        assert_eq!(operator_expression_kind(Call, 2), NodeKind::UNKNOWN_EXPRESSION);
        assert_eq!(operator_expression_kind(Arrow, 1), NodeKind::UNKNOWN_EXPRESSION);
    }
}
