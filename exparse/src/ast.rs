//! # Abstract Syntax Tree
//!
//! The shared output type of both parsing strategies. [`Ast`] is a closed sum
//! type with exactly three variants; every child is owned by its parent, so a
//! tree is finite and acyclic by construction.
//!
//! Operators are typed ([`UnaryOperator`], [`BinaryOperator`]). Converting
//! operator text into them is the one place an unknown operator can appear,
//! and it fails with [`EvaluatorError::UnknownOperator`].
use crate::error::EvaluatorError;
use std::fmt;
use std::str::FromStr;

/// Distinguishes prefix operators from infix ones in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorArity {
    Unary,
    Binary,
}

impl fmt::Display for OperatorArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperatorArity::Unary => "unary",
            OperatorArity::Binary => "binary",
        })
    }
}

/// Prefix operators: `+` (identity) and `-` (negation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    pub fn symbol(self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Minus => '-',
        }
    }
}

impl FromStr for UnaryOperator {
    type Err = EvaluatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(UnaryOperator::Plus),
            "-" => Ok(UnaryOperator::Minus),
            _ => Err(EvaluatorError::UnknownOperator {
                arity: OperatorArity::Unary,
                operator: s.into(),
            }),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Infix operators, all left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    /// Name of the arithmetic operation, as used in overflow diagnostics.
    pub fn operation_name(self) -> &'static str {
        match self {
            BinaryOperator::Add => "Addition",
            BinaryOperator::Subtract => "Subtraction",
            BinaryOperator::Multiply => "Multiplication",
            BinaryOperator::Divide => "Division",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = EvaluatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(BinaryOperator::Add),
            "-" => Ok(BinaryOperator::Subtract),
            "*" => Ok(BinaryOperator::Multiply),
            "/" => Ok(BinaryOperator::Divide),
            _ => Err(EvaluatorError::UnknownOperator {
                arity: OperatorArity::Binary,
                operator: s.into(),
            }),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An expression tree node.
///
/// # Example
/// ```rust
/// # use exparse::{Ast, BinaryOperator, UnaryOperator};
/// // -2 * 3
/// let ast = Ast::binary(
///     BinaryOperator::Multiply,
///     Ast::unary(UnaryOperator::Minus, Ast::number(2.0)),
///     Ast::number(3.0),
/// );
/// assert_eq!(ast.depth(), 3);
/// assert_eq!(ast.to_string(), "BinaryOp(*)\n  UnaryOp(-)\n    Number(2)\n  Number(3)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Number {
        value: f64,
    },
    UnaryOp {
        operator: UnaryOperator,
        operand: Box<Ast>,
    },
    BinaryOp {
        operator: BinaryOperator,
        left: Box<Ast>,
        right: Box<Ast>,
    },
}

impl Ast {
    pub fn number(value: f64) -> Self {
        Ast::Number { value }
    }

    pub fn unary(operator: UnaryOperator, operand: Ast) -> Self {
        Ast::UnaryOp {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Ast, right: Ast) -> Self {
        Ast::BinaryOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Variant name as shown in trees and evaluation traces.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Ast::Number { .. } => "Number",
            Ast::UnaryOp { .. } => "UnaryOp",
            Ast::BinaryOp { .. } => "BinaryOp",
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Ast::Number { .. } => 1,
            Ast::UnaryOp { operand, .. } => 1 + operand.depth(),
            Ast::BinaryOp { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Ast::Number { .. } => 1,
            Ast::UnaryOp { operand, .. } => 1 + operand.node_count(),
            Ast::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            f.write_str("  ")?;
        }
        match self {
            Ast::Number { value } => write!(f, "{}({value})", self.kind_name()),
            Ast::UnaryOp { operator, operand } => {
                writeln!(f, "{}({operator})", self.kind_name())?;
                operand.write_indented(f, indent + 1)
            }
            Ast::BinaryOp {
                operator,
                left,
                right,
            } => {
                writeln!(f, "{}({operator})", self.kind_name())?;
                left.write_indented(f, indent + 1)?;
                writeln!(f)?;
                right.write_indented(f, indent + 1)
            }
        }
    }
}

/// Indented, parenthesis-free dump of a tree: one node per line, two spaces
/// per level, children after their parent (left before right).
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Renders `ast` with [`Ast`]'s `Display` format.
///
/// This is a display format, not a serialization format: it does not
/// round-trip through the parsers.
pub fn ast_to_string(ast: &Ast) -> String {
    ast.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_parse_from_text() {
        assert_eq!("+".parse::<UnaryOperator>().unwrap(), UnaryOperator::Plus);
        assert_eq!("-".parse::<UnaryOperator>().unwrap(), UnaryOperator::Minus);
        assert_eq!("/".parse::<BinaryOperator>().unwrap(), BinaryOperator::Divide);
        assert_eq!("*".parse::<BinaryOperator>().unwrap(), BinaryOperator::Multiply);
    }

    #[test]
    fn unknown_operators_are_evaluator_errors() {
        let err = "*".parse::<UnaryOperator>().unwrap_err();
        assert!(matches!(
            err,
            EvaluatorError::UnknownOperator {
                arity: OperatorArity::Unary,
                ..
            }
        ));
        let err = "^".parse::<BinaryOperator>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown binary operator: ^");
    }

    #[test]
    fn tree_string_of_leaf() {
        assert_eq!(ast_to_string(&Ast::number(42.0)), "Number(42)");
        assert_eq!(ast_to_string(&Ast::number(2.5)), "Number(2.5)");
    }

    #[test]
    fn tree_string_indents_children() {
        // (1 + 2) * -3
        let ast = Ast::binary(
            BinaryOperator::Multiply,
            Ast::binary(BinaryOperator::Add, Ast::number(1.0), Ast::number(2.0)),
            Ast::unary(UnaryOperator::Minus, Ast::number(3.0)),
        );
        let expected = "\
BinaryOp(*)
  BinaryOp(+)
    Number(1)
    Number(2)
  UnaryOp(-)
    Number(3)";
        assert_eq!(ast_to_string(&ast), expected);
    }

    #[test]
    fn depth_and_count() {
        let ast = Ast::unary(
            UnaryOperator::Minus,
            Ast::unary(UnaryOperator::Minus, Ast::number(5.0)),
        );
        assert_eq!(ast.depth(), 3);
        assert_eq!(ast.node_count(), 3);
        assert_eq!(ast.kind_name(), "UnaryOp");
    }

    #[test]
    fn clone_is_structurally_equal() {
        let ast = Ast::binary(
            BinaryOperator::Subtract,
            Ast::number(10.0),
            Ast::binary(BinaryOperator::Divide, Ast::number(4.0), Ast::number(2.0)),
        );
        let copy = ast.clone();
        assert_eq!(ast, copy);
        assert_ne!(ast, Ast::number(10.0));
    }
}
