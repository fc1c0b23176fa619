//! # Expression Tokenizer
//!
//! Converts expression text into a sequence of [`Token`]s terminated by a
//! single end-of-input token.
//!
//! The source is trimmed first; every reported position is a zero-based
//! character offset into the trimmed text. Whitespace between tokens is
//! skipped. Numbers are decimal literals with at most one point (`12`, `3.5`,
//! `.5`); a second point or a trailing point is an error.
//!
//! ## Example
//! ```rust
//! # use exparse::{TokenKind, tokenize};
//! let tokens = tokenize("  (1 + 2.5) ").unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::LParen,
//!         TokenKind::Number,
//!         TokenKind::Operator,
//!         TokenKind::Number,
//!         TokenKind::RParen,
//!         TokenKind::EndOfInput,
//!     ]
//! );
//! assert_eq!(tokens[3].text, "2.5");
//! assert_eq!(tokens[5].position, 9);
//! ```
use crate::error::TokenizerError;
use crate::token::{Token, TokenKind};
use smartstring::alias::String;

/// A single-pass scanner over the trimmed source characters.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            input: source.trim().chars().collect(),
            pos: 0,
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self) -> Result<String, TokenizerError> {
        let start = self.pos;
        let mut text = String::new();
        let mut has_point = false;

        while let Some(c) = self.current() {
            if c == '.' {
                if has_point {
                    return Err(TokenizerError::MultipleDecimalPoints { position: self.pos });
                }
                has_point = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }

        if text.ends_with('.') {
            return Err(TokenizerError::MalformedNumber {
                text,
                position: start,
            });
        }
        Ok(text)
    }

    fn emit(&self, tokens: &mut Vec<Token>, token: Token) {
        log::trace!("TOKEN: {}", token);
        tokens.push(token);
    }

    /// Scans the whole input.
    ///
    /// # Errors
    /// Returns the first [`TokenizerError`] encountered; no partial token list
    /// is produced.
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizerError> {
        if self.input.is_empty() {
            return Err(TokenizerError::EmptyExpression);
        }

        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(c) = self.current() else {
                break;
            };
            let position = self.pos;

            let token = match c {
                '0'..='9' | '.' => {
                    let text = self.read_number()?;
                    Token::new(TokenKind::Number, text, position)
                }
                '+' | '-' | '*' | '/' => {
                    self.advance();
                    Token::new(TokenKind::Operator, c.encode_utf8(&mut [0; 4]), position)
                }
                '(' => {
                    self.advance();
                    Token::new(TokenKind::LParen, "(", position)
                }
                ')' => {
                    self.advance();
                    Token::new(TokenKind::RParen, ")", position)
                }
                _ => {
                    return Err(TokenizerError::InvalidCharacter {
                        character: c,
                        position,
                    });
                }
            };
            self.emit(&mut tokens, token);
        }

        if tokens.is_empty() {
            return Err(TokenizerError::NoTokens);
        }

        let end = Token::end(self.pos);
        self.emit(&mut tokens, end);
        log::debug!("tokenized {} characters into {} tokens", self.input.len(), tokens.len());
        Ok(tokens)
    }
}

/// Tokenizes `source`; see [`Tokenizer`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizerError> {
    Tokenizer::new(source).tokenize()
}
