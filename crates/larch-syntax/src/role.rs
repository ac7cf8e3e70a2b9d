/// Semantic label on the edge from a parent node to one of its children.
///
/// Roles start out as `Detached` and are assigned at most once; folding a
/// subtree whose role was never assigned defaults it to `Unknown`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeRole {
    /// Not yet adopted by a parent.
    Detached,
    /// Adopted without a dedicated role.
    Unknown,

    /// An opening `(`, `{`, or `[`.
    OpenParen,
    /// The matching closing delimiter.
    CloseParen,
    /// The keyword that introduces its construct, e.g. `if` or `template`.
    IntroducerKeyword,
    LiteralToken,
    ArrowToken,
    ExternKeyword,
    TemplateKeyword,
    /// The controlled statement of a loop, switch, case, or default.
    BodyStatement,
    ListElement,
    ListDelimiter,

    CompoundStatementStatement,
    CaseStatementValue,
    IfStatementThenStatement,
    IfStatementElseKeyword,
    IfStatementElseStatement,
    ReturnStatementValue,
    ExpressionStatementExpression,
    SimpleDeclarationDeclarator,
    ParenExpressionSubExpression,
    ArraySubscriptSizeExpression,
    TrailingReturnTypeDeclarator,
    ParametersAndQualifiersParameter,
    ParametersAndQualifiersTrailingReturn,
    IdExpressionQualifier,
    IdExpressionId,
    MemberExpressionObject,
    MemberExpressionAccessToken,
    MemberExpressionMember,
    StaticAssertDeclarationCondition,
    StaticAssertDeclarationMessage,
    ExplicitTemplateInstantiationDeclaration,
    TemplateDeclarationDeclaration,
    OperatorExpressionOperatorToken,
    UnaryOperatorExpressionOperand,
    BinaryOperatorExpressionLeftHandSide,
    BinaryOperatorExpressionRightHandSide,
}
