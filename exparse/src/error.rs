//! # Interpreter Errors
//!
//! This module defines the error taxonomy of the interpretation pipeline:
//!
//! - [`TokenizerError`]: lexical failures (bad characters, malformed numbers,
//!   empty input),
//! - [`ParserError`]: syntactic failures raised by either parsing strategy,
//! - [`EvaluatorError`]: arithmetic failures raised while walking the tree,
//! - [`InterpretError`]: the union of the three, produced by
//!   [`interpret`](crate::interpret).
//!
//! Every error reports an [`ErrorCategory`], a message (its `Display`), and an
//! optional zero-based source position. [`InterpretError::render`] turns these
//! into a caret diagnostic beneath the expression text.
use crate::ast::{BinaryOperator, OperatorArity};
use crate::token::TokenKind;
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// Column at which the echoed expression starts in a rendered diagnostic
/// (the width of `"Expression: "`).
const ECHO_PREFIX: &str = "Expression: ";

/// The pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Tokenizer,
    Parser,
    Evaluator,
}

impl ErrorCategory {
    pub fn name(self) -> &'static str {
        match self {
            ErrorCategory::Tokenizer => "TOKENIZER",
            ErrorCategory::Parser => "PARSER",
            ErrorCategory::Evaluator => "EVALUATOR",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lexical errors raised by [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    /// The input was empty or whitespace only.
    #[error("Empty expression")]
    EmptyExpression,

    /// A number contained a second decimal point.
    #[error("Invalid number format: multiple decimal points")]
    MultipleDecimalPoints {
        /// Position of the offending point.
        position: usize,
    },

    /// A number was a bare `.` or ended with `.`.
    #[error("Invalid number format: '{text}'")]
    MalformedNumber {
        /// The scanned number text.
        text: String,
        /// Position of the number's first character.
        position: usize,
    },

    /// A character outside the expression alphabet.
    #[error("Invalid character '{character}'")]
    InvalidCharacter { character: char, position: usize },

    /// Scanning finished without producing a single token.
    #[error("No valid tokens found")]
    NoTokens,
}

impl TokenizerError {
    pub fn position(&self) -> usize {
        match self {
            TokenizerError::EmptyExpression | TokenizerError::NoTokens => 0,
            TokenizerError::MultipleDecimalPoints { position }
            | TokenizerError::MalformedNumber { position, .. }
            | TokenizerError::InvalidCharacter { position, .. } => *position,
        }
    }
}

/// Syntactic errors raised by either parsing strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The token stream held nothing but end of input.
    #[error("Empty expression")]
    EmptyExpression,

    /// `eat` found a different token kind than the grammar requires here.
    #[error("Expected {expected}, got {found}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },

    /// A token that cannot start a factor.
    #[error("Unexpected token: {kind} '{text}'")]
    UnexpectedToken {
        kind: TokenKind,
        text: String,
        position: usize,
    },

    /// Input left over after a complete expression.
    #[error("Unexpected token at end: {kind} '{text}'")]
    TrailingToken {
        kind: TokenKind,
        text: String,
        position: usize,
    },

    /// A number token whose text is not a finite `f64`.
    #[error("Invalid number: '{text}'")]
    InvalidNumber { text: String, position: usize },

    /// The shift-reduce engine could neither reduce nor shift.
    #[error("Syntax error: unexpected end of expression")]
    UnexpectedEnd { position: usize },

    /// The shift-reduce engine exceeded its iteration cap.
    #[error("Parser error: maximum iterations exceeded")]
    IterationLimit { limit: usize },

    /// Parentheses and prefix signs are nested, or binary operators chained,
    /// past `limit` levels. Raised at the token that crossed the limit.
    #[error("Expression nested too deeply (limit {limit})")]
    NestingTooDeep { limit: usize, position: usize },

    /// A reduce action received stack values of the wrong shape. This means
    /// the grammar table is defective, not the input.
    #[error("Parser error: malformed handle for rule {rule}")]
    MalformedHandle { rule: String },
}

impl ParserError {
    pub fn position(&self) -> Option<usize> {
        match self {
            ParserError::EmptyExpression => Some(0),
            ParserError::ExpectedToken { position, .. }
            | ParserError::UnexpectedToken { position, .. }
            | ParserError::TrailingToken { position, .. }
            | ParserError::InvalidNumber { position, .. }
            | ParserError::NestingTooDeep { position, .. }
            | ParserError::UnexpectedEnd { position } => Some(*position),
            ParserError::IterationLimit { .. } | ParserError::MalformedHandle { .. } => None,
        }
    }
}

/// Arithmetic errors raised by [`evaluate`](crate::evaluate) and
/// [`evaluate_with_trace`](crate::evaluate_with_trace). None of them is
/// positional.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    /// A `Number` leaf held NaN or an infinity.
    #[error("Invalid number value: {value}")]
    InvalidNumber { value: f64 },

    /// An operand of a binary operation was not finite.
    #[error("Invalid operand values")]
    InvalidOperands,

    /// The result of `+`, `-`, `*` or `/` was not finite.
    #[error("{} result overflow", .operator.operation_name())]
    Overflow { operator: BinaryOperator },

    /// The right operand of `/` was zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// An operator symbol with no meaning for its arity.
    ///
    /// Only [`UnaryOperator::from_str`](crate::ast::UnaryOperator) and
    /// [`BinaryOperator::from_str`](crate::ast::BinaryOperator) produce this.
    /// The tree stores typed operators, so [`interpret`](crate::interpret)
    /// never returns it: an unknown operator token is rejected by the parser
    /// as [`ParserError::UnexpectedToken`] first.
    #[error("Unknown {arity} operator: {operator}")]
    UnknownOperator {
        arity: OperatorArity,
        operator: String,
    },
}

/// Any error the interpretation pipeline can produce.
///
/// Conversions from the stage errors are derived with `#[from]`, so the
/// pipeline can be written with `?`.
///
/// # Example
/// ```rust
/// # use exparse::{ErrorCategory, InterpretError, ParseStrategy, interpret};
/// let err = interpret("2 $ 3", ParseStrategy::TopDown).unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Tokenizer);
/// assert_eq!(err.position(), Some(2));
/// assert_eq!(
///     err.render("2 $ 3"),
///     "TOKENIZER ERROR: Invalid character '$'\n\nExpression: 2 $ 3\n              ^"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

impl InterpretError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InterpretError::Tokenizer(_) => ErrorCategory::Tokenizer,
            InterpretError::Parser(_) => ErrorCategory::Parser,
            InterpretError::Evaluator(_) => ErrorCategory::Evaluator,
        }
    }

    /// Zero-based position into the trimmed expression, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            InterpretError::Tokenizer(e) => Some(e.position()),
            InterpretError::Parser(e) => e.position(),
            InterpretError::Evaluator(_) => None,
        }
    }

    /// Renders the error as a multi-line diagnostic.
    ///
    /// The expression is echoed trimmed, since positions are offsets into the
    /// trimmed text. The caret line is omitted when the position is absent or
    /// does not fall on a character of the expression.
    pub fn render(&self, expression: &str) -> std::string::String {
        let expression = expression.trim();
        let mut out = format!(
            "{} ERROR: {}\n\n{}{}",
            self.category(),
            self,
            ECHO_PREFIX,
            expression
        );
        if let Some(position) = self.position()
            && position < expression.chars().count()
        {
            out.push('\n');
            out.extend(std::iter::repeat_n(' ', ECHO_PREFIX.len() + position));
            out.push('^');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}

    #[test]
    fn errors_are_send_sync_static() {
        _assert_send_sync_static::<TokenizerError>();
        _assert_send_sync_static::<ParserError>();
        _assert_send_sync_static::<EvaluatorError>();
        _assert_send_sync_static::<InterpretError>();
    }

    #[test]
    fn overflow_message_names_the_operation() {
        let cases = [
            (BinaryOperator::Add, "Addition result overflow"),
            (BinaryOperator::Subtract, "Subtraction result overflow"),
            (BinaryOperator::Multiply, "Multiplication result overflow"),
            (BinaryOperator::Divide, "Division result overflow"),
        ];
        for (operator, msg) in cases {
            assert_eq!(EvaluatorError::Overflow { operator }.to_string(), msg);
        }
    }

    #[test]
    fn unknown_operator_message_mentions_arity() {
        let err = EvaluatorError::UnknownOperator {
            arity: OperatorArity::Unary,
            operator: "*".into(),
        };
        assert_eq!(err.to_string(), "Unknown unary operator: *");
    }

    #[test]
    fn categories_and_positions() {
        let err: InterpretError = TokenizerError::InvalidCharacter {
            character: 'x',
            position: 4,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Tokenizer);
        assert_eq!(err.position(), Some(4));

        let err: InterpretError = ParserError::IterationLimit { limit: 10 }.into();
        assert_eq!(err.category(), ErrorCategory::Parser);
        assert_eq!(err.position(), None);

        let err: InterpretError = EvaluatorError::DivisionByZero.into();
        assert_eq!(err.category(), ErrorCategory::Evaluator);
        assert_eq!(err.position(), None);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn render_places_caret_under_position() {
        let err: InterpretError = ParserError::UnexpectedToken {
            kind: TokenKind::RParen,
            text: ")".into(),
            position: 4,
        }
        .into();
        let out = err.render("2 + )");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "PARSER ERROR: Unexpected token: RPAREN ')'");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Expression: 2 + )");
        assert_eq!(lines[3].len(), ECHO_PREFIX.len() + 5);
        assert!(lines[3].ends_with('^'));
    }

    #[test]
    fn render_omits_caret_out_of_range() {
        // end of input sits one past the last character
        let err: InterpretError = ParserError::ExpectedToken {
            expected: TokenKind::RParen,
            found: TokenKind::EndOfInput,
            position: 6,
        }
        .into();
        let out = err.render("(2 + 3");
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains('^'));

        let err: InterpretError = EvaluatorError::DivisionByZero.into();
        assert!(!err.render("1 / 0").contains('^'));
    }

    #[test]
    fn render_echoes_trimmed_expression() {
        let err: InterpretError = TokenizerError::InvalidCharacter {
            character: '#',
            position: 0,
        }
        .into();
        let out = err.render("   #");
        assert!(out.contains("Expression: #\n"));
        assert!(out.ends_with(&format!("{}^", " ".repeat(ECHO_PREFIX.len()))));
    }
}
