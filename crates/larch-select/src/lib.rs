//! The range-selector mini-language.
//!
//! Selectors name source ranges relative to bound node ids, written as
//! `op("id")`, `op(selector)`, or the two-argument forms of either. This
//! crate only parses the surface syntax into a [`RangeSelector`] tree;
//! evaluation belongs to the refactoring layer that owns the bindings.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSelector {
    /// The name token of the declaration bound to the id.
    Name(String),
    /// The whole node bound to the id.
    Node(String),
    /// The node as a statement, including its semicolon.
    Statement(String),
    /// The statements of the bound compound statement, without the braces.
    Statements(String),
    /// The member name of the bound member expression.
    Member(String),
    /// The arguments of the bound call, without the parentheses.
    CallArgs(String),
    /// The else branch of the bound if statement, including the keyword.
    ElseBranch(String),
    /// The elements of the bound initializer list, without the braces.
    InitListElements(String),
    /// The empty range before the inner selection.
    Before(Box<RangeSelector>),
    /// The empty range after the inner selection.
    After(Box<RangeSelector>),
    /// The inner selection extended to cover a macro expansion around it.
    Expansion(Box<RangeSelector>),
    /// The range spanning both bound nodes.
    EncloseNodes(String, String),
    /// The range spanning both inner selections.
    Enclose(Box<RangeSelector>, Box<RangeSelector>),
    /// The range between the two inner selections.
    Between(Box<RangeSelector>, Box<RangeSelector>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position ({pos}): {message}: {excerpt}")]
pub struct ParseError {
    /// Byte position of the error in the input.
    pub pos: usize,
    pub message: String,
    /// Excerpt of the input starting at the error position.
    pub excerpt: String,
}

fn unary_string_op(name: &str) -> Option<fn(String) -> RangeSelector> {
    Some(match name {
        "name" => RangeSelector::Name,
        "node" => RangeSelector::Node,
        "statement" => RangeSelector::Statement,
        "statements" => RangeSelector::Statements,
        "member" => RangeSelector::Member,
        "callArgs" => RangeSelector::CallArgs,
        "elseBranch" => RangeSelector::ElseBranch,
        "initListElements" => RangeSelector::InitListElements,
        _ => return None,
    })
}

fn unary_selector_op(name: &str) -> Option<fn(RangeSelector) -> RangeSelector> {
    Some(match name {
        "before" => |inner| RangeSelector::Before(Box::new(inner)),
        "after" => |inner| RangeSelector::After(Box::new(inner)),
        "expansion" => |inner| RangeSelector::Expansion(Box::new(inner)),
        _ => return None,
    })
}

fn binary_string_op(name: &str) -> Option<fn(String, String) -> RangeSelector> {
    match name {
        "encloseNodes" => Some(RangeSelector::EncloseNodes),
        _ => None,
    }
}

fn binary_selector_op(name: &str) -> Option<fn(RangeSelector, RangeSelector) -> RangeSelector> {
    Some(match name {
        "enclose" => |left, right| RangeSelector::Enclose(Box::new(left), Box::new(right)),
        "between" => |left, right| RangeSelector::Between(Box::new(left), Box::new(right)),
        _ => return None,
    })
}

struct Parser<'a> {
    /// The remaining input.
    input: &'a str,
    /// The original input, for error positions and excerpts.
    original: &'a str,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        let pos = self.original.len() - self.input.len();
        let excerpt = self.original[pos..].chars().take(20).collect();
        ParseError { pos, message: message.into(), excerpt }
    }

    fn skip_whitespace(&mut self) {
        self.input = self.input.trim_start();
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.input.strip_prefix(expected) {
            Some(rest) => {
                self.input = rest;
                Ok(())
            }
            None => Err(self.error(format!("expected char not found: {expected}"))),
        }
    }

    fn parse_id(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let end = self
            .input
            .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
            .unwrap_or(self.input.len());
        if end == 0 {
            return Err(self.error("failed to parse name"));
        }
        let (id, rest) = self.input.split_at(end);
        self.input = rest;
        Ok(id.to_string())
    }

    /// Node ids are written as strings for consistency with the matcher
    /// language; escaping is not supported.
    fn parse_string_id(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        if self.input.is_empty() {
            return Err(self.error("unexpected end of input"));
        }
        let Some(rest) = self.input.strip_prefix('"') else {
            return Err(
                self.error("expecting string, but encountered other character or end of input")
            );
        };
        self.input = rest;
        let Some(end) = self.input.find('"') else {
            return Err(self.error("unterminated string"));
        };
        let id = self.input[..end].to_string();
        self.input = &self.input[end + 1..];
        Ok(id)
    }

    fn parse_single<T>(
        &mut self,
        element: fn(&mut Self) -> Result<T, ParseError>,
        op: fn(T) -> RangeSelector,
    ) -> Result<RangeSelector, ParseError> {
        self.expect_char('(')?;
        let value = element(self)?;
        self.expect_char(')')?;
        Ok(op(value))
    }

    fn parse_pair<T>(
        &mut self,
        element: fn(&mut Self) -> Result<T, ParseError>,
        op: fn(T, T) -> RangeSelector,
    ) -> Result<RangeSelector, ParseError> {
        self.expect_char('(')?;
        let left = element(self)?;
        self.expect_char(',')?;
        let right = element(self)?;
        self.expect_char(')')?;
        Ok(op(left, right))
    }

    fn parse_selector(&mut self) -> Result<RangeSelector, ParseError> {
        let name = self.parse_id()?;
        if let Some(op) = unary_string_op(&name) {
            return self.parse_single(Self::parse_string_id, op);
        }
        if let Some(op) = unary_selector_op(&name) {
            return self.parse_single(Self::parse_selector, op);
        }
        if let Some(op) = binary_string_op(&name) {
            return self.parse_pair(Self::parse_string_id, op);
        }
        if let Some(op) = binary_selector_op(&name) {
            return self.parse_pair(Self::parse_selector, op);
        }
        Err(self.error(format!("unknown selector name: {name}")))
    }
}

pub fn parse_range_selector(input: &str) -> Result<RangeSelector, ParseError> {
    let mut parser = Parser { input, original: input };
    let result = parser.parse_selector()?;
    parser.skip_whitespace();
    if parser.input.is_empty() {
        Ok(result)
    } else {
        Err(parser.error("unexpected input after selector"))
    }
}
