//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! # exparse
//!
//! An arithmetic expression interpreter with two interchangeable parsing
//! strategies and auditable step traces.
//!
//! The pipeline is `text → tokens → AST → f64`:
//!
//! - [`lexer`]: turns the source into [`Token`]s ending with one end marker,
//! - [`parser`]: builds an [`Ast`] either top-down (recursive descent) or
//!   bottom-up (shift-reduce over the rule table in [`grammar`]); both produce
//!   equal trees and record [`ParseStep`]s,
//! - [`eval`]: walks the tree in `f64`, optionally recording a trace,
//! - [`error`]: the categorized, positioned errors of every stage.
//!
//! The grammar supports `+ - * /`, parentheses and prefix signs, with the usual
//! precedence and left associativity.
//!
//! ## Example
//!
//! ```rust
//! use exparse::{ParseStrategy, interpret};
//!
//! let out = interpret("2 * (3 + 4) - 1", ParseStrategy::BottomUp).unwrap();
//! assert_eq!(out.result, 13.0);
//! assert_eq!(out.tokens.len(), 10);
//! assert_eq!(out.evaluation_steps[0], "Evaluating BinaryOp: -");
//!
//! let err = interpret("(2 + 3", ParseStrategy::BottomUp).unwrap_err();
//! assert_eq!(err.to_string(), "Syntax error: unexpected end of expression");
//! ```
//!
//! All entry points are pure functions of their input; nothing is shared
//! between calls.

pub mod ast;
pub mod error;
pub mod eval;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod step;
pub mod token;

pub use ast::{Ast, BinaryOperator, OperatorArity, UnaryOperator, ast_to_string};
pub use error::{ErrorCategory, EvaluatorError, InterpretError, ParserError, TokenizerError};
pub use eval::{Evaluation, evaluate, evaluate_with_trace};
pub use lexer::{Tokenizer, tokenize};
pub use parser::{
    DescentParser, MAX_DEPTH, ParseResult, ParseStrategy, ParserStats, ShiftReduceParser,
    UnknownStrategy, parse, parse_ast,
};
pub use step::{NoSteps, ParseAction, ParseStep, StepSink};
pub use token::{Token, TokenKind};

/// Everything produced by one run of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub tokens: Vec<Token>,
    pub ast: Ast,
    /// [`ast_to_string`] of `ast`.
    pub tree: String,
    pub strategy: ParseStrategy,
    pub parse_steps: Vec<ParseStep>,
    pub result: f64,
    pub evaluation_steps: Vec<String>,
}

/// Tokenizes, parses with `strategy` and evaluates `expression`, keeping
/// every intermediate artifact.
///
/// # Errors
/// The first [`InterpretError`] raised by any stage. Use
/// [`InterpretError::render`] for a caret diagnostic.
pub fn interpret(
    expression: &str,
    strategy: ParseStrategy,
) -> Result<Interpretation, InterpretError> {
    let tokens = tokenize(expression)?;
    let ParseResult {
        ast,
        steps: parse_steps,
        strategy,
    } = parse(&tokens, strategy)?;
    let Evaluation {
        result,
        steps: evaluation_steps,
    } = evaluate_with_trace(&ast)?;
    log::debug!("{} [{}] = {}", expression.trim(), strategy, result);

    Ok(Interpretation {
        tree: ast_to_string(&ast),
        tokens,
        ast,
        strategy,
        parse_steps,
        result,
        evaluation_steps,
    })
}
