//! # Expression Grammar
//!
//! Declarative description of the expression grammar shared by both parsers:
//!
//! ```text
//! E -> E + T | E - T | T
//! T -> T * F | T / F | F
//! F -> NUMBER | ( E ) | + F | - F
//! ```
//!
//! Precedence is encoded in the rule structure: `E` (additive) sits below `T`
//! (multiplicative), which sits below `F` (atoms and prefix signs). Binary
//! operators are left-associative; prefix signs nest (`--5`).
//!
//! [`RULES`] is the ordered rule table that drives the shift-reduce engine.
//! The engine picks the *first* rule whose right-hand side matches the top of
//! the stack and whose left-hand side admits the lookahead (see
//! [`can_reduce_with_lookahead`]), so order is significant:
//!
//! - within each nonterminal the longer handle comes first, so `T * F` is
//!   reduced as a whole before its trailing `F` could become a `T`;
//! - the prefix-sign rules only match in prefix position (at the stack bottom,
//!   after `(`, or after another operator), so the `+` of `E + F` is never
//!   taken for a sign.
use crate::ast::{Ast, BinaryOperator, UnaryOperator};
use crate::error::ParserError;
use crate::token::Token;
use smartstring::alias::String;
use std::fmt;

/// Terminal and nonterminal symbols of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `E`, additive expression.
    Expr,
    /// `T`, multiplicative term.
    Term,
    /// `F`, factor.
    Factor,
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    /// End of input, `$`.
    End,
}

impl Symbol {
    /// Name used in stack snapshots and rule labels.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Expr => "E",
            Symbol::Term => "T",
            Symbol::Factor => "F",
            Symbol::Number => "NUMBER",
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Star => "*",
            Symbol::Slash => "/",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::End => "$",
        }
    }

    pub fn is_nonterminal(self) -> bool {
        matches!(self, Symbol::Expr | Symbol::Term | Symbol::Factor)
    }

    /// Symbols that complete an operand: anything that may stand to the left
    /// of a binary operator.
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            Symbol::Expr | Symbol::Term | Symbol::Factor | Symbol::Number | Symbol::RParen
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value on the shift-reduce value stack: either a shifted token or a tree
/// fragment built by a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue {
    Token(Token),
    Node(Ast),
}

/// Semantic action of a rule: builds a tree fragment from the popped handle,
/// given in left-to-right order.
pub type ReduceFn = fn(&GrammarRule, Vec<StackValue>) -> Result<Ast, ParserError>;

/// One production `lhs -> rhs` with its semantic action.
pub struct GrammarRule {
    pub lhs: Symbol,
    pub rhs: &'static [Symbol],
    /// Only match when the handle is in prefix position.
    pub prefix_only: bool,
    /// The reduction wraps its children in a new tree node, one level deeper.
    pub builds_node: bool,
    pub reduce: ReduceFn,
}

impl GrammarRule {
    /// Rule label, e.g. `T → T * F`.
    pub fn label(&self) -> String {
        let mut label = String::from(self.lhs.name());
        label.push_str(" →");
        for sym in self.rhs {
            label.push(' ');
            label.push_str(sym.name());
        }
        label
    }

    /// Returns `true` if the top of `stack` is exactly this rule's handle.
    pub fn matches(&self, stack: &[Symbol]) -> bool {
        if !stack.ends_with(self.rhs) {
            return false;
        }
        if !self.prefix_only {
            return true;
        }
        let below = stack.len() - self.rhs.len();
        below == 0 || !stack[below - 1].is_operand()
    }

    pub fn apply(&self, children: Vec<StackValue>) -> Result<Ast, ParserError> {
        (self.reduce)(self, children)
    }

    fn malformed(&self) -> ParserError {
        ParserError::MalformedHandle { rule: self.label() }
    }
}

impl fmt::Debug for GrammarRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarRule")
            .field("rule", &self.label())
            .field("prefix_only", &self.prefix_only)
            .field("builds_node", &self.builds_node)
            .finish()
    }
}

const EXPR_FOLLOW: &[Symbol] = &[Symbol::Plus, Symbol::Minus, Symbol::RParen, Symbol::End];
const TERM_FOLLOW: &[Symbol] = &[
    Symbol::Plus,
    Symbol::Minus,
    Symbol::Star,
    Symbol::Slash,
    Symbol::RParen,
    Symbol::End,
];

/// Lookahead symbols after which `lhs` may be reduced.
pub fn follow(lhs: Symbol) -> &'static [Symbol] {
    match lhs {
        Symbol::Expr => EXPR_FOLLOW,
        Symbol::Term | Symbol::Factor => TERM_FOLLOW,
        _ => &[],
    }
}

/// Whether a reduction to `lhs` is permitted with `lookahead` next.
///
/// Any nonterminal may be reduced at end of input.
pub fn can_reduce_with_lookahead(lhs: Symbol, lookahead: Symbol) -> bool {
    lookahead == Symbol::End || !lhs.is_nonterminal() || follow(lhs).contains(&lookahead)
}

/// Converts a number token into a finite `f64`.
pub(crate) fn number_value(token: &Token) -> Result<f64, ParserError> {
    match token.text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParserError::InvalidNumber {
            text: token.text.clone(),
            position: token.position,
        }),
    }
}

fn reduce_number(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    let Ok([StackValue::Token(token)]) = <[StackValue; 1]>::try_from(children) else {
        return Err(rule.malformed());
    };
    Ok(Ast::number(number_value(&token)?))
}

fn reduce_parens(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    let Ok([_, StackValue::Node(inner), _]) = <[StackValue; 3]>::try_from(children) else {
        return Err(rule.malformed());
    };
    Ok(inner)
}

fn reduce_unary(
    operator: UnaryOperator,
    rule: &GrammarRule,
    children: Vec<StackValue>,
) -> Result<Ast, ParserError> {
    let Ok([_, StackValue::Node(operand)]) = <[StackValue; 2]>::try_from(children) else {
        return Err(rule.malformed());
    };
    Ok(Ast::unary(operator, operand))
}

fn reduce_plus(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_unary(UnaryOperator::Plus, rule, children)
}

fn reduce_minus(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_unary(UnaryOperator::Minus, rule, children)
}

fn reduce_binary(
    operator: BinaryOperator,
    rule: &GrammarRule,
    children: Vec<StackValue>,
) -> Result<Ast, ParserError> {
    let Ok([StackValue::Node(left), _, StackValue::Node(right)]) =
        <[StackValue; 3]>::try_from(children)
    else {
        return Err(rule.malformed());
    };
    Ok(Ast::binary(operator, left, right))
}

fn reduce_add(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_binary(BinaryOperator::Add, rule, children)
}

fn reduce_subtract(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_binary(BinaryOperator::Subtract, rule, children)
}

fn reduce_multiply(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_binary(BinaryOperator::Multiply, rule, children)
}

fn reduce_divide(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    reduce_binary(BinaryOperator::Divide, rule, children)
}

fn reduce_pass(rule: &GrammarRule, children: Vec<StackValue>) -> Result<Ast, ParserError> {
    let Ok([StackValue::Node(node)]) = <[StackValue; 1]>::try_from(children) else {
        return Err(rule.malformed());
    };
    Ok(node)
}

/// The ordered rule table. See the module docs for why order matters.
pub static RULES: [GrammarRule; 10] = [
    // F -> NUMBER
    GrammarRule {
        lhs: Symbol::Factor,
        rhs: &[Symbol::Number],
        prefix_only: false,
        builds_node: true,
        reduce: reduce_number,
    },
    // F -> ( E )
    GrammarRule {
        lhs: Symbol::Factor,
        rhs: &[Symbol::LParen, Symbol::Expr, Symbol::RParen],
        prefix_only: false,
        builds_node: false,
        reduce: reduce_parens,
    },
    // F -> + F
    GrammarRule {
        lhs: Symbol::Factor,
        rhs: &[Symbol::Plus, Symbol::Factor],
        prefix_only: true,
        builds_node: true,
        reduce: reduce_plus,
    },
    // F -> - F
    GrammarRule {
        lhs: Symbol::Factor,
        rhs: &[Symbol::Minus, Symbol::Factor],
        prefix_only: true,
        builds_node: true,
        reduce: reduce_minus,
    },
    // T -> T * F
    GrammarRule {
        lhs: Symbol::Term,
        rhs: &[Symbol::Term, Symbol::Star, Symbol::Factor],
        prefix_only: false,
        builds_node: true,
        reduce: reduce_multiply,
    },
    // T -> T / F
    GrammarRule {
        lhs: Symbol::Term,
        rhs: &[Symbol::Term, Symbol::Slash, Symbol::Factor],
        prefix_only: false,
        builds_node: true,
        reduce: reduce_divide,
    },
    // T -> F
    GrammarRule {
        lhs: Symbol::Term,
        rhs: &[Symbol::Factor],
        prefix_only: false,
        builds_node: false,
        reduce: reduce_pass,
    },
    // E -> E + T
    GrammarRule {
        lhs: Symbol::Expr,
        rhs: &[Symbol::Expr, Symbol::Plus, Symbol::Term],
        prefix_only: false,
        builds_node: true,
        reduce: reduce_add,
    },
    // E -> E - T
    GrammarRule {
        lhs: Symbol::Expr,
        rhs: &[Symbol::Expr, Symbol::Minus, Symbol::Term],
        prefix_only: false,
        builds_node: true,
        reduce: reduce_subtract,
    },
    // E -> T
    GrammarRule {
        lhs: Symbol::Expr,
        rhs: &[Symbol::Term],
        prefix_only: false,
        builds_node: false,
        reduce: reduce_pass,
    },
];

/// Finds the first rule in [`RULES`] that can reduce the top of `stack` with
/// `lookahead` next, returning its index.
pub fn find_reduction(stack: &[Symbol], lookahead: Symbol) -> Option<usize> {
    RULES
        .iter()
        .position(|rule| rule.matches(stack) && can_reduce_with_lookahead(rule.lhs, lookahead))
}
