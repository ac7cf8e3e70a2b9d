/// Syntactic category of a node.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    LEAF,
    TRANSLATION_UNIT,

    UNKNOWN_EXPRESSION,
    UNKNOWN_STATEMENT,
    UNKNOWN_DECLARATION,

    // Expressions.
    PAREN_EXPRESSION,
    THIS_EXPRESSION,
    ID_EXPRESSION,
    UNQUALIFIED_ID,
    MEMBER_EXPRESSION,
    BINARY_OPERATOR_EXPRESSION,
    PREFIX_UNARY_OPERATOR_EXPRESSION,
    POSTFIX_UNARY_OPERATOR_EXPRESSION,
    INTEGER_LITERAL_EXPRESSION,
    CHARACTER_LITERAL_EXPRESSION,
    FLOATING_LITERAL_EXPRESSION,
    STRING_LITERAL_EXPRESSION,
    BOOL_LITERAL_EXPRESSION,
    NULLPTR_LITERAL_EXPRESSION,
    INTEGER_USER_DEFINED_LITERAL_EXPRESSION,
    FLOAT_USER_DEFINED_LITERAL_EXPRESSION,
    CHAR_USER_DEFINED_LITERAL_EXPRESSION,
    STRING_USER_DEFINED_LITERAL_EXPRESSION,

    // Statements.
    COMPOUND_STATEMENT,
    EXPRESSION_STATEMENT,
    DECLARATION_STATEMENT,
    EMPTY_STATEMENT,
    IF_STATEMENT,
    SWITCH_STATEMENT,
    CASE_STATEMENT,
    DEFAULT_STATEMENT,
    WHILE_STATEMENT,
    FOR_STATEMENT,
    RANGE_BASED_FOR_STATEMENT,
    RETURN_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,

    // Declarations.
    SIMPLE_DECLARATION,
    TEMPLATE_DECLARATION,
    EXPLICIT_TEMPLATE_INSTANTIATION,
    NAMESPACE_DEFINITION,
    NAMESPACE_ALIAS_DEFINITION,
    USING_NAMESPACE_DIRECTIVE,
    USING_DECLARATION,
    TYPE_ALIAS_DECLARATION,
    EMPTY_DECLARATION,
    STATIC_ASSERT_DECLARATION,
    LINKAGE_SPECIFICATION,

    // Declarator pieces.
    SIMPLE_DECLARATOR,
    PAREN_DECLARATOR,
    ARRAY_SUBSCRIPT,
    PARAMETERS_AND_QUALIFIERS,
    TRAILING_RETURN_TYPE,
    MEMBER_POINTER,

    // Name specifiers.
    NESTED_NAME_SPECIFIER,
    GLOBAL_NAME_SPECIFIER,
    IDENTIFIER_NAME_SPECIFIER,
    DECLTYPE_NAME_SPECIFIER,
    SIMPLE_TEMPLATE_NAME_SPECIFIER,
}
