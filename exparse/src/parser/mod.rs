//! # Parsers
//!
//! Two interchangeable strategies turn a token sequence into an [`Ast`]:
//!
//! - [`DescentParser`]: top-down recursive descent, one function per
//!   precedence level,
//! - [`ShiftReduceParser`]: bottom-up shift-reduce over an explicit stack,
//!   driven by the rule table in [`grammar`](crate::grammar).
//!
//! Given the same tokens both produce structurally equal trees. Each reports
//! its progress to a [`StepSink`](crate::step::StepSink); [`parse`] collects
//! the steps, [`parse_ast`] discards them.
//!
//! Both parsers stop at [`MAX_DEPTH`] with [`ParserError::NestingTooDeep`].
//! The limit applies to open parentheses plus pending prefix signs, and to
//! the depth of the tree being built, so every accepted tree can be walked,
//! printed and dropped recursively.
use crate::ast::Ast;
use crate::error::ParserError;
use crate::step::{NoSteps, ParseStep};
use crate::token::Token;
use smartstring::alias::String;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod descent;
pub mod shift_reduce;

pub use descent::DescentParser;
pub use shift_reduce::ShiftReduceParser;

/// Deepest nesting either parser accepts, counted both as open groups and
/// signs at any token and as levels of the resulting tree.
pub const MAX_DEPTH: usize = 256;

/// Selects the parsing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseStrategy {
    /// Recursive descent.
    #[default]
    TopDown,
    /// Shift-reduce.
    BottomUp,
}

impl ParseStrategy {
    pub fn name(self) -> &'static str {
        match self {
            ParseStrategy::TopDown => "top-down",
            ParseStrategy::BottomUp => "bottom-up",
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a strategy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parse strategy '{0}' (expected 'top-down' or 'bottom-up')")]
pub struct UnknownStrategy(pub String);

impl FromStr for ParseStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-down" => Ok(ParseStrategy::TopDown),
            "bottom-up" => Ok(ParseStrategy::BottomUp),
            _ => Err(UnknownStrategy(s.into())),
        }
    }
}

/// Counters collected during one parse and logged at `debug` level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Tokens in the normalized input, end marker included.
    pub tokens: usize,
    /// Tokens consumed.
    pub shifts: usize,
    /// Tree nodes built.
    pub reductions: usize,
    /// Engine loop iterations (shift-reduce only).
    pub iterations: usize,
}

/// The outcome of a traced parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub ast: Ast,
    /// The complete step trace, ending with one `Accept` step.
    pub steps: Vec<ParseStep>,
    pub strategy: ParseStrategy,
}

/// Parses `tokens` with the chosen strategy, recording every step.
///
/// # Errors
/// Returns the first [`ParserError`]; no partial tree or trace is returned.
///
/// # Example
/// ```rust
/// # use exparse::{ParseAction, ParseStrategy, ast_to_string, parse, tokenize};
/// let tokens = tokenize("2 + 3 * 4").unwrap();
/// let top_down = parse(&tokens, ParseStrategy::TopDown).unwrap();
/// let bottom_up = parse(&tokens, ParseStrategy::BottomUp).unwrap();
/// assert_eq!(top_down.ast, bottom_up.ast);
/// assert_eq!(bottom_up.steps.last().unwrap().action, ParseAction::Accept);
/// assert_eq!(
///     ast_to_string(&top_down.ast),
///     "BinaryOp(+)\n  Number(2)\n  BinaryOp(*)\n    Number(3)\n    Number(4)"
/// );
/// ```
pub fn parse(tokens: &[Token], strategy: ParseStrategy) -> Result<ParseResult, ParserError> {
    let mut steps = Vec::new();
    let ast = match strategy {
        ParseStrategy::TopDown => DescentParser::new(tokens)?.parse(&mut steps)?,
        ParseStrategy::BottomUp => ShiftReduceParser::new(tokens).parse(&mut steps)?,
    };
    Ok(ParseResult {
        ast,
        steps,
        strategy,
    })
}

/// Parses `tokens` top-down without recording steps.
pub fn parse_ast(tokens: &[Token]) -> Result<Ast, ParserError> {
    DescentParser::new(tokens)?.parse(&mut NoSteps)
}

/// Returns `tokens` with every end marker removed and exactly one appended.
///
/// The appended marker keeps the position of the last marker in the input, or
/// sits just past the last token when there was none.
///
/// # Errors
/// [`ParserError::EmptyExpression`] if nothing but end markers remains.
pub(crate) fn normalize_tokens(tokens: &[Token]) -> Result<Vec<Token>, ParserError> {
    let end_position = tokens
        .iter()
        .rev()
        .find(|t| t.is_end())
        .or_else(|| tokens.last())
        .map_or(0, Token::end_position);

    let mut normalized: Vec<Token> = tokens.iter().filter(|t| !t.is_end()).cloned().collect();
    if normalized.is_empty() {
        return Err(ParserError::EmptyExpression);
    }
    normalized.push(Token::end(end_position));
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, UnaryOperator};
    use crate::lexer::tokenize;
    use crate::step::ParseAction;
    use crate::token::TokenKind;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn both(src: &str) -> (Ast, Ast) {
        let tokens = tokenize(src).unwrap();
        let td = parse(&tokens, ParseStrategy::TopDown).unwrap();
        let bu = parse(&tokens, ParseStrategy::BottomUp).unwrap();
        assert_eq!(td.strategy, ParseStrategy::TopDown);
        assert_eq!(bu.strategy, ParseStrategy::BottomUp);
        (td.ast, bu.ast)
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [ParseStrategy::TopDown, ParseStrategy::BottomUp] {
            assert_eq!(strategy.to_string().parse::<ParseStrategy>(), Ok(strategy));
        }
        assert_eq!(ParseStrategy::default(), ParseStrategy::TopDown);
        let err = "sideways".parse::<ParseStrategy>().unwrap_err();
        assert_eq!(err, UnknownStrategy("sideways".into()));
    }

    #[test]
    fn strategies_agree_on_precedence_and_associativity() {
        init_logger();
        for src in [
            "2 + 3 * 4",
            "(5 + 3) * 2",
            "10 - 4 / 2",
            "2 * (3 + 4) - 1",
            "-5 + 3",
            "8 / 4 / 2",
            "1 - 2 - 3",
            "--5",
            "2 * -3",
            "1 - -2",
            "+(1 + +2) * -(3)",
        ] {
            let (td, bu) = both(src);
            assert_eq!(td, bu, "strategies disagree on {src:?}");
        }
    }

    #[test]
    fn left_associative_subtraction() {
        let (ast, _) = both("1 - 2 - 3");
        let expected = Ast::binary(
            BinaryOperator::Subtract,
            Ast::binary(BinaryOperator::Subtract, Ast::number(1.0), Ast::number(2.0)),
            Ast::number(3.0),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn unary_minus_binds_tighter_than_product() {
        let (ast, _) = both("-2 * 3");
        let expected = Ast::binary(
            BinaryOperator::Multiply,
            Ast::unary(UnaryOperator::Minus, Ast::number(2.0)),
            Ast::number(3.0),
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn parse_ast_matches_traced_parse() {
        let tokens = tokenize("2 * (3 + 4)").unwrap();
        let traced = parse(&tokens, ParseStrategy::TopDown).unwrap();
        assert_eq!(parse_ast(&tokens).unwrap(), traced.ast);
    }

    #[test]
    fn traces_end_with_single_accept() {
        let tokens = tokenize("(1 + 2) * 3").unwrap();
        for strategy in [ParseStrategy::TopDown, ParseStrategy::BottomUp] {
            let result = parse(&tokens, strategy).unwrap();
            let accepts = result
                .steps
                .iter()
                .filter(|s| s.action == ParseAction::Accept)
                .count();
            assert_eq!(accepts, 1);
            assert_eq!(result.steps.last().unwrap().action, ParseAction::Accept);
            for (i, step) in result.steps.iter().enumerate() {
                assert_eq!(step.index, i);
            }
        }
    }

    #[test]
    fn end_markers_are_normalized() {
        let mut tokens = tokenize("1 + 2").unwrap();
        tokens.push(Token::end(9));
        let normalized = normalize_tokens(&tokens).unwrap();
        assert_eq!(normalized.iter().filter(|t| t.is_end()).count(), 1);
        assert_eq!(normalized.last().unwrap().position, 9);

        let bare = vec![Token::new(TokenKind::Number, "42", 0)];
        let normalized = normalize_tokens(&bare).unwrap();
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[1].position, 2);
        assert_eq!(parse_ast(&bare).unwrap(), Ast::number(42.0));
    }

    #[test]
    fn only_end_marker_is_empty_expression() {
        for strategy in [ParseStrategy::TopDown, ParseStrategy::BottomUp] {
            assert_eq!(
                parse(&[Token::end(0)], strategy),
                Err(ParserError::EmptyExpression)
            );
            assert_eq!(parse(&[], strategy), Err(ParserError::EmptyExpression));
        }
    }
}
