//! Reference lexer for the larch surface syntax.
//!
//! Produces the expanded-token array the tree builder consumes. Trivia
//! (whitespace, comments) is skipped entirely: the buffer holds only the
//! tokens the tree must cover. Numeric and string literals keep a directly
//! attached suffix identifier, so user-defined literals like `1.2_w` come out
//! as one token.

use text_size::{TextRange, TextSize};

use crate::{Token, TokenBuffer, TokenKind};

pub fn lex(text: &str) -> TokenBuffer {
    let mut cursor = Cursor { text, pos: 0 };
    let mut tokens = Vec::new();

    loop {
        cursor.skip_trivia();
        let start = cursor.pos;
        let Some(first) = cursor.bump() else {
            let end = TextSize::new(start as u32);
            tokens.push(Token::new(TokenKind::Eof, TextRange::empty(end)));
            break;
        };
        let kind = cursor.token_kind(first, start);
        let range = TextRange::new(TextSize::new(start as u32), TextSize::new(cursor.pos as u32));
        tokens.push(Token::new(kind, range));
    }

    TokenBuffer::new(text.to_string(), tokens)
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.eat_while(char::is_whitespace);
                }
                (Some('/'), Some('/')) => {
                    self.eat_while(|ch| ch != '\n');
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.pos < self.text.len() {
                        if self.text[self.pos..].starts_with("*/") {
                            self.pos += 2;
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn token_kind(&mut self, first: char, start: usize) -> TokenKind {
        use TokenKind::*;

        match first {
            ';' => Semi,
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '[' => LBracket,
            ']' => RBracket,
            ',' => Comma,
            '.' => Dot,
            '?' => Question,
            '~' => Tilde,
            ':' => {
                if self.eat(':') {
                    ColonColon
                } else {
                    Colon
                }
            }
            '=' => {
                if self.eat('=') {
                    EqEq
                } else {
                    Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    ExclaimEq
                } else {
                    Exclaim
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') { LessLessEq } else { LessLess }
                } else if self.eat('=') {
                    if self.eat('>') { Spaceship } else { LessEq }
                } else {
                    Less
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('=') { GreaterGreaterEq } else { GreaterGreater }
                } else if self.eat('=') {
                    GreaterEq
                } else {
                    Greater
                }
            }
            '+' => {
                if self.eat('+') {
                    PlusPlus
                } else if self.eat('=') {
                    PlusEq
                } else {
                    Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    MinusMinus
                } else if self.eat('=') {
                    MinusEq
                } else if self.eat('>') {
                    if self.eat('*') { ArrowStar } else { Arrow }
                } else {
                    Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    StarEq
                } else {
                    Star
                }
            }
            '/' => {
                if self.eat('=') {
                    SlashEq
                } else {
                    Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    PercentEq
                } else {
                    Percent
                }
            }
            '^' => {
                if self.eat('=') {
                    CaretEq
                } else {
                    Caret
                }
            }
            '|' => {
                if self.eat('|') {
                    PipePipe
                } else if self.eat('=') {
                    PipeEq
                } else {
                    Pipe
                }
            }
            '&' => {
                if self.eat('&') {
                    AmpAmp
                } else if self.eat('=') {
                    AmpEq
                } else {
                    Amp
                }
            }
            '"' => self.string_literal(),
            '\'' => self.char_literal(),
            '0'..='9' => self.number(first),
            'A'..='Z' | 'a'..='z' | '_' => self.identifier_or_keyword(start),
            _ => Unknown,
        }
    }

    fn identifier_or_keyword(&mut self, start: usize) -> TokenKind {
        use TokenKind::*;

        self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');

        match &self.text[start..self.pos] {
            "template" => TemplateKw,
            "extern" => ExternKw,
            "namespace" => NamespaceKw,
            "struct" => StructKw,
            "class" => ClassKw,
            "union" => UnionKw,
            "enum" => EnumKw,
            "if" => IfKw,
            "else" => ElseKw,
            "switch" => SwitchKw,
            "case" => CaseKw,
            "default" => DefaultKw,
            "while" => WhileKw,
            "for" => ForKw,
            "return" => ReturnKw,
            "break" => BreakKw,
            "continue" => ContinueKw,
            "using" => UsingKw,
            "typedef" => TypedefKw,
            "static_assert" => StaticAssertKw,
            "decltype" => DecltypeKw,
            "this" => ThisKw,
            "true" => TrueKw,
            "false" => FalseKw,
            "nullptr" => NullptrKw,
            "auto" => AutoKw,
            "operator" => OperatorKw,
            _ => Ident,
        }
    }

    /// Numbers follow the preprocessing-number shape: digits, digit
    /// separators, a fraction, an exponent, and any directly attached suffix
    /// letters. The fraction or exponent decides integer vs. floating.
    fn number(&mut self, first: char) -> TokenKind {
        let mut floating = false;
        let hex = first == '0' && (self.eat('x') || self.eat('X'));
        let digit = move |ch: char| {
            ch == '\'' || if hex { ch.is_ascii_hexdigit() } else { ch.is_ascii_digit() }
        };
        self.eat_while(digit);

        if self.peek() == Some('.') && self.peek_second().is_none_or(|ch| ch != '.') {
            floating = true;
            self.bump();
            self.eat_while(digit);
        }

        let exponent = if hex { ['p', 'P'] } else { ['e', 'E'] };
        if self.peek().is_some_and(|ch| exponent.contains(&ch)) {
            floating = true;
            self.bump();
            let _ = self.eat('+') || self.eat('-');
            self.eat_while(|ch| ch.is_ascii_digit());
        }

        // A directly attached suffix: `u`, `f`, or a literal operator name.
        self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');

        if floating { TokenKind::FloatLiteral } else { TokenKind::IntLiteral }
    }

    fn string_literal(&mut self) -> TokenKind {
        self.quoted('"');
        self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        TokenKind::StringLiteral
    }

    fn char_literal(&mut self) -> TokenKind {
        self.quoted('\'');
        self.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        TokenKind::CharLiteral
    }

    fn quoted(&mut self, terminator: char) {
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                ch if ch == terminator => break,
                _ => {}
            }
        }
    }
}
