//! # Expression Tokens
//!
//! This module defines the lexical units shared by the tokenizer and both
//! parsers:
//!
//! - [`TokenKind`]: the category of a token (number, operator, parenthesis,
//!   end of input),
//! - [`Token`]: a kind paired with its source text and zero-based position.
//!
//! Tokens are immutable once produced. Every successfully tokenized sequence
//! ends with exactly one [`TokenKind::EndOfInput`] token whose text is the
//! sentinel [`END_SYMBOL`].
use crate::grammar::Symbol;
use smartstring::alias::String;
use std::fmt;

/// Text carried by the synthetic end-of-input token.
pub const END_SYMBOL: &str = "$";

/// The category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A decimal literal such as `42`, `3.5` or `.5`.
    Number,
    /// One of `+`, `-`, `*`, `/`.
    Operator,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// The synthetic terminator appended by the tokenizer.
    EndOfInput,
}

impl TokenKind {
    /// Upper-case name used in diagnostics (`NUMBER`, `OPERATOR`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::EndOfInput => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexical unit with its source position.
///
/// `position` is a zero-based character offset into the trimmed source text
/// and is used only for diagnostics.
///
/// # Example
/// ```rust
/// # use exparse::{Token, TokenKind};
/// let tok = Token::new(TokenKind::Operator, "*", 2);
/// assert_eq!(tok.kind, TokenKind::Operator);
/// assert_eq!(tok.text, "*");
/// assert_eq!(tok.to_string(), "OPERATOR '*' at 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's category.
    pub kind: TokenKind,
    /// The exact source text (`"$"` for end of input).
    pub text: String,
    /// Zero-based character offset of the first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl AsRef<str>, position: usize) -> Self {
        Self {
            kind,
            text: String::from(text.as_ref()),
            position,
        }
    }

    /// Creates the end-of-input token at `position`.
    pub fn end(position: usize) -> Self {
        Self::new(TokenKind::EndOfInput, END_SYMBOL, position)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Returns `true` if this is the operator token `op`.
    #[inline]
    pub fn is_operator(&self, op: char) -> bool {
        self.kind == TokenKind::Operator && self.text.chars().eq(std::iter::once(op))
    }

    /// Maps the token to the grammar symbol it stands for on a parse stack.
    ///
    /// Returns `None` only for an operator token whose text is not one of the
    /// four arithmetic operators, which the tokenizer never produces.
    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            TokenKind::Number => Some(Symbol::Number),
            TokenKind::LParen => Some(Symbol::LParen),
            TokenKind::RParen => Some(Symbol::RParen),
            TokenKind::EndOfInput => Some(Symbol::End),
            TokenKind::Operator => match self.text.as_str() {
                "+" => Some(Symbol::Plus),
                "-" => Some(Symbol::Minus),
                "*" => Some(Symbol::Star),
                "/" => Some(Symbol::Slash),
                _ => None,
            },
        }
    }

    /// One past the last character covered by this token.
    pub fn end_position(&self) -> usize {
        if self.is_end() {
            self.position
        } else {
            self.position + self.text.chars().count()
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.position)
    }
}
