//! Top-down recursive-descent parser.
//!
//! `expr`, `term` and `factor` mirror the three precedence levels of the
//! grammar. Binary operators are folded in loops so that each level stays
//! left-associative; prefix signs recurse into `factor`.
//!
//! Each level returns its subtree together with the subtree's depth. Open
//! groups and signs are counted in `nesting`; both are held to [`MAX_DEPTH`]
//! before the recursion can exhaust the stack.
use super::{MAX_DEPTH, ParserStats, normalize_tokens};
use crate::ast::{Ast, BinaryOperator, UnaryOperator};
use crate::error::ParserError;
use crate::grammar::{Symbol, number_value};
use crate::step::{ParseAction, ParseStep, StepSink};
use crate::token::{Token, TokenKind};

/// Recursive-descent parser over a normalized token sequence.
#[derive(Debug, Clone)]
pub struct DescentParser {
    tokens: Vec<Token>,
    current: usize,
    /// Nonterminals currently being expanded, outermost first.
    path: Vec<Symbol>,
    /// Parentheses and prefix signs entered but not yet completed.
    nesting: usize,
    stats: ParserStats,
}

impl DescentParser {
    /// Creates a parser over `tokens`, normalizing the end marker.
    ///
    /// # Errors
    /// [`ParserError::EmptyExpression`] if `tokens` holds no real token.
    pub fn new(tokens: &[Token]) -> Result<Self, ParserError> {
        let tokens = normalize_tokens(tokens)?;
        let stats = ParserStats {
            tokens: tokens.len(),
            ..ParserStats::default()
        };
        Ok(Self {
            tokens,
            current: 0,
            path: Vec::new(),
            nesting: 0,
            stats,
        })
    }

    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }

    /// Parses the whole input, reporting steps to `sink`.
    ///
    /// # Errors
    /// Any [`ParserError`] raised while descending, or
    /// [`ParserError::TrailingToken`] if input remains after a complete
    /// expression, or [`ParserError::NestingTooDeep`] past [`MAX_DEPTH`].
    pub fn parse<S: StepSink>(&mut self, sink: &mut S) -> Result<Ast, ParserError> {
        self.current = 0;
        self.path.clear();
        self.nesting = 0;
        self.stats = ParserStats {
            tokens: self.tokens.len(),
            ..ParserStats::default()
        };

        self.record(sink, ParseAction::Process, None, "Starting top-down parsing...");
        let (ast, _) = self.expr(sink)?;

        let token = self.peek();
        if !token.is_end() {
            return Err(ParserError::TrailingToken {
                kind: token.kind,
                text: token.text.clone(),
                position: token.position,
            });
        }

        log::trace!("Accept");
        self.record(sink, ParseAction::Accept, None, "Parsing complete");
        log::debug!("top-down parse finished: {:?}", self.stats);
        Ok(ast)
    }

    #[inline]
    fn peek(&self) -> &Token {
        // normalization guarantees a trailing end marker, never consumed
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Consumes the current token if it has the expected kind.
    fn eat(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let token = self.peek();
        if token.kind != expected {
            return Err(ParserError::ExpectedToken {
                expected,
                found: token.kind,
                position: token.position,
            });
        }
        let token = token.clone();
        log::trace!("Eat {}", token);
        if !token.is_end() {
            self.current += 1;
        }
        self.stats.shifts += 1;
        Ok(token)
    }

    fn record<S: StepSink>(
        &self,
        sink: &mut S,
        action: ParseAction,
        rule: Option<&str>,
        description: impl AsRef<str>,
    ) {
        sink.record(|index| {
            let step = ParseStep::new(index, action, description)
                .with_stack(self.path.iter().map(|s| s.name()))
                .with_input(self.tokens[self.current..].iter().map(|t| t.text.as_str()));
            match rule {
                Some(rule) => step.with_rule(rule),
                None => step,
            }
        });
    }

    fn reduced<S: StepSink>(&mut self, sink: &mut S, rule: Option<&str>, description: String) {
        self.stats.reductions += 1;
        self.record(sink, ParseAction::Reduce, rule, description);
    }

    /// Enters a group or sign opened by `token`.
    fn enter(&mut self, token: &Token) -> Result<(), ParserError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            log::debug!("nesting limit reached at {}", token.position);
            return Err(ParserError::NestingTooDeep {
                limit: MAX_DEPTH,
                position: token.position,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Depth of a new node over children of depth `child`.
    fn node_depth(&self, child: usize) -> Result<usize, ParserError> {
        let depth = child + 1;
        if depth > MAX_DEPTH {
            return Err(ParserError::NestingTooDeep {
                limit: MAX_DEPTH,
                position: self.peek().position,
            });
        }
        Ok(depth)
    }

    /// The binary operator at the cursor, if it is one of `ops`.
    fn binary_operator(&self, ops: [BinaryOperator; 2]) -> Option<BinaryOperator> {
        let token = self.peek();
        ops.into_iter().find(|op| token.is_operator(op.symbol()))
    }

    fn expr<S: StepSink>(&mut self, sink: &mut S) -> Result<(Ast, usize), ParserError> {
        self.path.push(Symbol::Expr);
        self.record(sink, ParseAction::Process, None, "Processing expression");

        let (mut left, mut depth) = self.term(sink)?;
        while let Some(op) = self.binary_operator([BinaryOperator::Add, BinaryOperator::Subtract]) {
            self.eat(TokenKind::Operator)?;
            let (right, right_depth) = self.term(sink)?;
            depth = self.node_depth(depth.max(right_depth))?;
            left = Ast::binary(op, left, right);
            let rule = format!("E → E {op} T");
            self.reduced(sink, Some(rule.as_str()), format!("Created binary operation: {op}"));
        }

        self.path.pop();
        Ok((left, depth))
    }

    fn term<S: StepSink>(&mut self, sink: &mut S) -> Result<(Ast, usize), ParserError> {
        self.path.push(Symbol::Term);
        self.record(sink, ParseAction::Process, None, "Processing term");

        let (mut left, mut depth) = self.factor(sink)?;
        while let Some(op) =
            self.binary_operator([BinaryOperator::Multiply, BinaryOperator::Divide])
        {
            self.eat(TokenKind::Operator)?;
            let (right, right_depth) = self.factor(sink)?;
            depth = self.node_depth(depth.max(right_depth))?;
            left = Ast::binary(op, left, right);
            let rule = format!("T → T {op} F");
            self.reduced(sink, Some(rule.as_str()), format!("Created binary operation: {op}"));
        }

        self.path.pop();
        Ok((left, depth))
    }

    fn factor<S: StepSink>(&mut self, sink: &mut S) -> Result<(Ast, usize), ParserError> {
        self.path.push(Symbol::Factor);
        let token = self.peek().clone();
        self.record(
            sink,
            ParseAction::Process,
            None,
            format!("Processing factor: {}", token.text),
        );

        let node = match token.kind {
            TokenKind::Number => {
                self.eat(TokenKind::Number)?;
                let value = number_value(&token)?;
                self.reduced(sink, None, format!("Created number node: {value}"));
                (Ast::number(value), 1)
            }
            TokenKind::Operator if token.is_operator('+') || token.is_operator('-') => {
                let op = if token.is_operator('-') {
                    UnaryOperator::Minus
                } else {
                    UnaryOperator::Plus
                };
                self.enter(&token)?;
                self.eat(TokenKind::Operator)?;
                let (operand, operand_depth) = self.factor(sink)?;
                let depth = self.node_depth(operand_depth)?;
                self.leave();
                self.reduced(sink, None, format!("Created unary operation: {op}"));
                (Ast::unary(op, operand), depth)
            }
            TokenKind::LParen => {
                self.enter(&token)?;
                self.eat(TokenKind::LParen)?;
                self.record(
                    sink,
                    ParseAction::Process,
                    None,
                    "Processing parenthesized expression",
                );
                let inner = self.expr(sink)?;
                self.eat(TokenKind::RParen)?;
                self.leave();
                self.reduced(sink, None, "Completed parenthesized expression".into());
                inner
            }
            _ => {
                return Err(ParserError::UnexpectedToken {
                    kind: token.kind,
                    text: token.text,
                    position: token.position,
                });
            }
        };

        self.path.pop();
        Ok(node)
    }
}
