//! Bottom-up shift-reduce parser.
//!
//! The engine keeps a value stack and a symbol stack in lockstep. On every
//! iteration it looks at the next token (the lookahead) and
//!
//! 1. accepts if the symbol stack is exactly `[E]` and the lookahead is `$`,
//! 2. otherwise reduces by the first rule of [`RULES`] whose handle is on top
//!    of the stack and whose left-hand side may be followed by the lookahead,
//! 3. otherwise shifts the lookahead, unless it is `$`, which is a syntax
//!    error.
//!
//! Reductions are preferred over shifts; precedence comes entirely from the
//! follow sets in [`grammar`](crate::grammar).
//!
//! A third stack holds the tree depth of each value. Together with the count
//! of open parentheses and prefix signs it is checked against [`MAX_DEPTH`].
use super::{MAX_DEPTH, ParserStats, normalize_tokens};
use crate::ast::Ast;
use crate::error::ParserError;
use crate::grammar::{GrammarRule, RULES, StackValue, Symbol, find_reduction};
use crate::step::{ParseAction, ParseStep, StepSink};
use crate::token::Token;

/// Iteration cap used for short inputs.
pub const MIN_ITERATIONS: usize = 1000;

/// Iterations allowed per input token beyond [`MIN_ITERATIONS`].
pub const ITERATIONS_PER_TOKEN: usize = 8;

/// Shift-reduce parser driven by the grammar rule table.
///
/// # Example
/// ```rust
/// # use exparse::{ParseAction, ParseStep, ShiftReduceParser, tokenize};
/// let tokens = tokenize("1 + 2").unwrap();
/// let mut steps: Vec<ParseStep> = Vec::new();
/// let ast = ShiftReduceParser::new(&tokens).parse(&mut steps).unwrap();
/// assert_eq!(ast.to_string(), "BinaryOp(+)\n  Number(1)\n  Number(2)");
/// assert_eq!(steps[1].description, "Shift token: 1");
/// assert_eq!(steps.last().unwrap().action, ParseAction::Accept);
/// ```
#[derive(Debug, Clone)]
pub struct ShiftReduceParser {
    tokens: Vec<Token>,
    max_iterations: usize,
    stats: ParserStats,
}

impl ShiftReduceParser {
    pub fn new(tokens: &[Token]) -> Self {
        let max_iterations = MIN_ITERATIONS.max(ITERATIONS_PER_TOKEN * tokens.len());
        Self {
            tokens: tokens.to_vec(),
            max_iterations,
            stats: ParserStats::default(),
        }
    }

    /// Overrides the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }

    /// Runs the engine to completion, reporting steps to `sink`.
    ///
    /// # Errors
    /// - [`ParserError::EmptyExpression`] if the input holds no real token,
    /// - [`ParserError::UnexpectedEnd`] if end of input is reached with
    ///   nothing left to reduce,
    /// - [`ParserError::IterationLimit`] if the cap is exceeded,
    /// - [`ParserError::NestingTooDeep`] past [`MAX_DEPTH`],
    /// - errors raised by a rule's reduce action.
    pub fn parse<S: StepSink>(&mut self, sink: &mut S) -> Result<Ast, ParserError> {
        let tokens = normalize_tokens(&self.tokens)?;
        self.stats = ParserStats {
            tokens: tokens.len(),
            ..ParserStats::default()
        };

        let mut values: Vec<StackValue> = Vec::new();
        let mut symbols: Vec<Symbol> = Vec::new();
        let mut depths: Vec<usize> = Vec::new();
        let mut nesting = 0;
        let mut cursor = 0;

        record(sink, ParseAction::Process, &symbols, &tokens[cursor..], None, || {
            "Starting bottom-up parsing...".into()
        });

        loop {
            self.stats.iterations += 1;
            if self.stats.iterations > self.max_iterations {
                log::debug!("iteration cap reached: {:?}", self.stats);
                return Err(ParserError::IterationLimit {
                    limit: self.max_iterations,
                });
            }

            let token = &tokens[cursor];
            let Some(lookahead) = token.symbol() else {
                return Err(ParserError::UnexpectedToken {
                    kind: token.kind,
                    text: token.text.clone(),
                    position: token.position,
                });
            };

            if lookahead == Symbol::End && symbols == [Symbol::Expr] {
                log::trace!("Accept");
                let Some(StackValue::Node(ast)) = values.pop() else {
                    return Err(ParserError::MalformedHandle {
                        rule: Symbol::Expr.name().into(),
                    });
                };
                record(sink, ParseAction::Accept, &symbols, &tokens[cursor..], None, || {
                    "Accept: Parsing complete".into()
                });
                log::debug!("bottom-up parse finished: {:?}", self.stats);
                return Ok(ast);
            }

            if let Some(index) = find_reduction(&symbols, lookahead) {
                let rule = &RULES[index];
                let label = rule.label();
                log::trace!("Reduce {} on {}", label, lookahead);

                let at = symbols.len() - rule.rhs.len();
                let handle = values.split_off(at);
                symbols.truncate(at);
                let depth = depths.split_off(at).into_iter().max().unwrap_or(0)
                    + usize::from(rule.builds_node);
                if depth > MAX_DEPTH {
                    return Err(ParserError::NestingTooDeep {
                        limit: MAX_DEPTH,
                        position: token.position,
                    });
                }
                if closes_group(rule) {
                    nesting -= 1;
                }
                let node = rule.apply(handle)?;
                values.push(StackValue::Node(node));
                symbols.push(rule.lhs);
                depths.push(depth);
                self.stats.reductions += 1;

                record(
                    sink,
                    ParseAction::Reduce,
                    &symbols,
                    &tokens[cursor..],
                    Some(label.as_str()),
                    || format!("Reduce by rule: {label}"),
                );
            } else if lookahead != Symbol::End {
                if opens_group(&symbols, lookahead) {
                    nesting += 1;
                    if nesting > MAX_DEPTH {
                        log::debug!("nesting limit reached at {}", token.position);
                        return Err(ParserError::NestingTooDeep {
                            limit: MAX_DEPTH,
                            position: token.position,
                        });
                    }
                }
                log::trace!("Shift {}", token);
                values.push(StackValue::Token(token.clone()));
                symbols.push(lookahead);
                depths.push(0);
                cursor += 1;
                self.stats.shifts += 1;

                record(sink, ParseAction::Shift, &symbols, &tokens[cursor..], None, || {
                    format!("Shift token: {}", token.text)
                });
            } else {
                log::debug!("no reduction at end of input, stack: {:?}", symbols);
                return Err(ParserError::UnexpectedEnd {
                    position: token.position,
                });
            }
        }
    }
}

/// Shifting `lookahead` onto `symbols` opens a parenthesis or a prefix sign.
fn opens_group(symbols: &[Symbol], lookahead: Symbol) -> bool {
    match lookahead {
        Symbol::LParen => true,
        Symbol::Plus | Symbol::Minus => symbols.last().is_none_or(|s| !s.is_operand()),
        _ => false,
    }
}

/// Reducing by `rule` completes a parenthesis or a prefix sign.
fn closes_group(rule: &GrammarRule) -> bool {
    rule.prefix_only || rule.rhs.first() == Some(&Symbol::LParen)
}

fn record<S, D>(
    sink: &mut S,
    action: ParseAction,
    symbols: &[Symbol],
    remaining: &[Token],
    rule: Option<&str>,
    describe: D,
) where
    S: StepSink,
    D: FnOnce() -> String,
{
    sink.record(|index| {
        let step = ParseStep::new(index, action, describe())
            .with_stack(symbols.iter().map(|s| s.name()))
            .with_input(remaining.iter().map(|t| t.text.as_str()));
        match rule {
            Some(rule) => step.with_rule(rule),
            None => step,
        }
    });
}
