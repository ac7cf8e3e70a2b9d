//! Expanded-token buffers for the larch surface syntax.
//!
//! The lossless tree is built over the *expanded* token stream, i.e. the
//! stream after preprocessing. Tokens that originate in macro expansions have
//! no spelled counterpart; [`TokenBuffer::spelled_for_expanded`] reports that
//! absence and downstream consumers use it to decide whether a subtree maps
//! back onto the written source.

mod lexer;

use std::fmt;

pub use lexer::lex;
use text_size::{TextRange, TextSize};

/// Lexical category of a token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    ColonColon,
    Colon,
    Arrow,
    ArrowStar,
    Comma,
    Dot,

    Eq,
    EqEq,
    ExclaimEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Spaceship,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Pipe,
    Amp,
    LessLess,
    GreaterGreater,
    AmpAmp,
    PipePipe,
    Exclaim,
    Tilde,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    PipeEq,
    AmpEq,
    LessLessEq,
    GreaterGreaterEq,
    Question,

    TemplateKw,
    ExternKw,
    NamespaceKw,
    StructKw,
    ClassKw,
    UnionKw,
    EnumKw,
    IfKw,
    ElseKw,
    SwitchKw,
    CaseKw,
    DefaultKw,
    WhileKw,
    ForKw,
    ReturnKw,
    BreakKw,
    ContinueKw,
    UsingKw,
    TypedefKw,
    StaticAssertKw,
    DecltypeKw,
    ThisKw,
    TrueKw,
    FalseKw,
    NullptrKw,
    AutoKw,
    OperatorKw,

    Ident,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,

    Unknown,
    Eof,
}

/// Start offset of a token in the translation-unit text.
///
/// Semantic nodes refer to tokens by these offsets. The invalid sentinel marks
/// positions with no written counterpart, e.g. the synthetic operand that a
/// postfix `++` call carries.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location(TextSize);

impl Location {
    pub const INVALID: Location = Location(TextSize::new(u32::MAX));

    pub fn new(offset: TextSize) -> Location {
        Location(offset)
    }

    pub fn is_valid(self) -> bool {
        self != Location::INVALID
    }

    pub fn offset(self) -> TextSize {
        self.0
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Location({})", u32::from(self.0))
        } else {
            write!(f, "Location(invalid)")
        }
    }
}

/// Inclusive pair of token-start locations: the first and the last token of a
/// source construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub begin: Location,
    pub end: Location,
}

impl SourceSpan {
    pub const INVALID: SourceSpan =
        SourceSpan { begin: Location::INVALID, end: Location::INVALID };

    pub fn new(begin: Location, end: Location) -> SourceSpan {
        SourceSpan { begin, end }
    }

    /// A span covering a single token.
    pub fn point(loc: Location) -> SourceSpan {
        SourceSpan { begin: loc, end: loc }
    }

    pub fn is_valid(self) -> bool {
        self.begin.is_valid()
    }
}

/// Index of a token in the expanded-token array.
pub type TokenId = u32;

/// Half-open range of expanded-token indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRange {
    pub start: TokenId,
    pub end: TokenId,
}

impl TokenRange {
    pub fn new(start: TokenId, end: TokenId) -> TokenRange {
        assert!(start <= end, "inverted token range {start}..{end}");
        TokenRange { start, end }
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn first(self) -> TokenId {
        assert!(!self.is_empty());
        self.start
    }

    pub fn last(self) -> TokenId {
        assert!(!self.is_empty());
        self.end - 1
    }

    pub fn iter(self) -> impl Iterator<Item = TokenId> {
        self.start..self.end
    }
}

/// A single expanded token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    pub from_macro: bool,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange) -> Token {
        Token { kind, range, from_macro: false }
    }

    pub fn location(&self) -> Location {
        Location::new(self.range.start())
    }
}

/// The expanded tokens of one translation unit, in source order, terminated by
/// an [`TokenKind::Eof`] token. Owns the preprocessed text the ranges index.
#[derive(Debug)]
pub struct TokenBuffer {
    text: String,
    tokens: Vec<Token>,
}

impl TokenBuffer {
    pub fn new(text: String, tokens: Vec<Token>) -> TokenBuffer {
        assert_eq!(
            tokens.last().map(|token| token.kind),
            Some(TokenKind::Eof),
            "token buffer must be eof-terminated"
        );
        TokenBuffer { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expanded(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id as usize]
    }

    pub fn token_text(&self, id: TokenId) -> &str {
        &self.text[self.token(id).range]
    }

    /// Number of expanded tokens, including the trailing eof.
    pub fn len(&self) -> u32 {
        self.tokens.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Marks a token as originating in a macro expansion, removing its spelled
    /// counterpart. The preprocessor records this while expanding.
    pub fn mark_from_macro(&mut self, id: TokenId) {
        self.tokens[id as usize].from_macro = true;
    }

    /// Maps a range of expanded tokens back to the written text, or `None` if
    /// any covered token originated in a macro expansion.
    pub fn spelled_for_expanded(&self, range: TokenRange) -> Option<TextRange> {
        if range.iter().any(|id| self.token(id).from_macro) {
            return None;
        }
        if range.is_empty() {
            return Some(TextRange::empty(TextSize::new(0)));
        }
        Some(TextRange::new(
            self.token(range.first()).range.start(),
            self.token(range.last()).range.end(),
        ))
    }
}
