//! Payloads for the semantic node stores.

use larch_tokens::{Location, SourceSpan};

use crate::{DeclId, ExprId, QualifierId, StmtId, TypeLocId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclData {
    pub span: SourceSpan,
    pub kind: DeclKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A variable, field, or parameter.
    Var(DeclaratorData),
    /// A function declaration or definition.
    Function { declarator: DeclaratorData, body: Option<StmtId> },
    /// One name of a `typedef` chain.
    Typedef(DeclaratorData),
    /// `using X = T;`
    TypeAlias,
    /// A class, struct, union, or enum declaration.
    Tag(TagData),
    /// `template <...> declaration`
    Template { template_kw: Location, params: Vec<DeclId>, inner: DeclId },
    /// `namespace a { ... }`
    Namespace { body: Vec<DeclId> },
    /// `namespace b = a;`
    NamespaceAlias,
    /// `using namespace a;`
    UsingDirective,
    /// `using a::b;`
    Using,
    /// A stray `;`.
    Empty,
    /// `static_assert(condition, message);`
    StaticAssert { condition: ExprId, message: Option<ExprId> },
    /// `extern "C" { ... }` or `extern "C" declaration`
    LinkageSpec { body: Vec<DeclId> },
    /// Anything the semantic analyzer produces that has no dedicated shape
    /// here, e.g. template parameters.
    Unknown,
}

/// The declarator parts of a declarator-bearing declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaratorData {
    /// Qualifier of an out-of-line name, e.g. `X::` in `int X::y = 1;`.
    pub qualifier: Option<QualifierId>,
    pub type_loc: TypeLocId,
    /// Location of the declared name; `None` when anonymous.
    pub name: Option<Location>,
    pub init: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Struct,
    Class,
    Union,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagData {
    pub tag_kind: TagKind,
    /// Location of the tag keyword. The declaration span may start earlier,
    /// at a template-parameter list.
    pub tag_begin: Location,
    /// False when the tag appears as a declaration specifier of a declarator
    /// chain, e.g. `struct S {} s;`.
    pub free_standing: bool,
    pub template_param_lists: Vec<TemplateParamList>,
    pub specialization: Option<SpecializationData>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateParamList {
    pub template_kw: Location,
}

/// Extra provenance carried by class-template specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecializationData {
    pub extern_kw: Option<Location>,
    pub template_kw: Location,
    /// True for `template <> struct X<int> ...`, false for an explicit
    /// instantiation `template struct X<int>;`.
    pub is_explicit_specialization: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StmtData {
    pub span: SourceSpan,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Compound { lbrace: Location, body: Vec<StmtId>, rbrace: Location },
    Decl { decls: Vec<DeclId> },
    /// An expression in statement position.
    Expr { expr: ExprId },
    /// A lone `;`.
    Null,
    If {
        if_kw: Location,
        condition: ExprId,
        then_branch: StmtId,
        else_kw: Option<Location>,
        else_branch: Option<StmtId>,
    },
    Switch { switch_kw: Location, condition: ExprId, body: StmtId },
    Case { case_kw: Location, value: ExprId, body: StmtId },
    Default { default_kw: Location, body: StmtId },
    While { while_kw: Location, condition: ExprId, body: StmtId },
    For {
        for_kw: Location,
        init: Option<StmtId>,
        condition: Option<ExprId>,
        increment: Option<ExprId>,
        body: StmtId,
    },
    RangeFor {
        for_kw: Location,
        init: Option<StmtId>,
        loop_var: DeclId,
        range: ExprId,
        body: StmtId,
    },
    Return { return_kw: Location, value: Option<ExprId> },
    Break { break_kw: Location },
    Continue { continue_kw: Location },
    Unknown { children: Vec<StmtId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprData {
    pub span: SourceSpan,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// A resolved or dependent reference to a named entity.
    DeclRef { qualifier: Option<QualifierId>, template_kw: Option<Location>, name: SourceSpan },
    Member {
        base: ExprId,
        qualifier: Option<QualifierId>,
        template_kw: Option<Location>,
        /// Location of the `.` or `->` token.
        access: Location,
        member: SourceSpan,
        /// True when the object expression is an implicit `this`.
        implicit_access: bool,
    },
    This { this_kw: Location, implicit: bool },
    Paren { lparen: Location, inner: ExprId, rparen: Location },
    IntLiteral { literal: Location },
    FloatLiteral { literal: Location },
    CharLiteral { literal: Location },
    StringLiteral { literal: Location },
    BoolLiteral { literal: Location },
    NullptrLiteral { literal: Location },
    UserDefinedLiteral { literal: Location, operator: LiteralOperatorKind },
    /// A built-in unary operator application.
    Unary { op: Location, operand: ExprId, postfix: bool },
    /// A built-in binary operator application.
    Binary { lhs: ExprId, op: Location, rhs: ExprId },
    /// A call through an overloaded operator. Postfix `++`/`--` carry their
    /// disambiguating operand as an integer literal at the invalid location.
    OperatorCall { operator: OverloadedOperator, op: Location, args: Vec<ExprId> },
    /// An implicit conversion inserted by the semantic analyzer.
    Implicit { inner: ExprId },
    Unknown { children: Vec<ExprId> },
}

/// What kind of literal operator a user-defined literal resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralOperatorKind {
    Integer,
    Floating,
    Character,
    String,
    /// `operator""_x(const char*)` — the operand type is not recorded.
    Raw,
    /// A numeric literal operator template — likewise.
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverloadedOperator {
    EqualEqual,
    ExclaimEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Spaceship,
    Equal,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    PipeEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    PlusEqual,
    MinusEqual,
    StarEqual,
    AmpEqual,
    Slash,
    Percent,
    Caret,
    Pipe,
    LessLess,
    GreaterGreater,
    AmpAmp,
    PipePipe,
    ArrowStar,
    Comma,
    Tilde,
    Exclaim,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Amp,
    New,
    Delete,
    ArrayNew,
    ArrayDelete,
    Coawait,
    Call,
    Subscript,
    Arrow,
}

/// A written type, stored inside out: the outermost node is the one applied
/// closest to the declared name, so `int *a` is a pointer node whose pointee
/// is the `int` node, and the pointee of the second `*` in `int **a` is the
/// first `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLocData {
    /// Extent of all tokens this type was written with.
    pub span: SourceSpan,
    pub kind: TypeLocKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeLocKind {
    /// A builtin or a named type, e.g. `int` or `std::size_t`.
    Named { qualifier: Option<QualifierId> },
    /// `decltype(expr)`
    Decltype { expr: Option<ExprId> },
    /// A template specialization, e.g. `vector<int>`. Inside a name
    /// specifier the chain itself carries the qualifier and this one is
    /// `None`.
    TemplateSpec {
        qualifier: Option<QualifierId>,
        dependent: bool,
        template_kw: Option<Location>,
    },
    Pointer { star: Location, pointee: TypeLocId },
    Reference { amp: Location, pointee: TypeLocId },
    /// `Y::*`; the qualifier span covers exactly those tokens.
    MemberPointer { qualifier_span: SourceSpan, pointee: TypeLocId },
    Paren { lparen: Location, inner: TypeLocId, rparen: Location },
    Array { element: TypeLocId, lbracket: Location, size: Option<ExprId>, rbracket: Location },
    FunctionProto {
        lparen: Location,
        params: Vec<DeclId>,
        rparen: Location,
        /// The return type: written before the declarator normally, after the
        /// arrow for a trailing return.
        return_loc: TypeLocId,
        trailing_arrow: Option<Location>,
    },
}

impl TypeLocKind {
    pub fn has_trailing_return(&self) -> bool {
        matches!(self, TypeLocKind::FunctionProto { trailing_arrow: Some(_), .. })
    }
}

/// A qualified-name prefix: the chain of name specifiers before an
/// unqualified id, e.g. `std::vector<int>::` before `size_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierData {
    pub span: SourceSpan,
    /// Specifiers in source order, outermost first.
    pub specifiers: Vec<SpecifierData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecifierData {
    /// The specifier's own name tokens, without the trailing `::`. Invalid
    /// for the global root, which has no name.
    pub span: SourceSpan,
    pub coloncolon: Location,
    pub kind: SpecifierKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// The leading `::` of a fully qualified name.
    Global,
    Namespace,
    NamespaceAlias,
    Identifier,
    TypeSpec { type_loc: TypeLocId, with_template_kw: bool },
    /// The Microsoft `__super` extension.
    Super,
}
