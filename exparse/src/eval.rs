//! # Tree-Walking Evaluator
//!
//! Computes the value of an [`Ast`] by post-order traversal in `f64`
//! arithmetic. Every intermediate value is kept finite: a non-finite leaf,
//! operand or result is an [`EvaluatorError`].
//!
//! [`evaluate`] and [`evaluate_with_trace`] share one walker; the traced
//! variant only differs in the sink it hands over, so both agree on every
//! result and every error.
use crate::ast::{Ast, BinaryOperator, UnaryOperator};
use crate::error::EvaluatorError;

/// The outcome of a traced evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: f64,
    /// One line per visited node and per computed result, indented by two
    /// spaces per tree level.
    pub steps: Vec<String>,
}

/// Receives evaluation trace lines.
trait TraceSink {
    fn line<F>(&mut self, depth: usize, make: F)
    where
        F: FnOnce() -> String;
}

struct NoTrace;

impl TraceSink for NoTrace {
    #[inline]
    fn line<F>(&mut self, _depth: usize, _make: F)
    where
        F: FnOnce() -> String,
    {
    }
}

impl TraceSink for Vec<String> {
    fn line<F>(&mut self, depth: usize, make: F)
    where
        F: FnOnce() -> String,
    {
        let mut line = "  ".repeat(depth);
        line.push_str(&make());
        self.push(line);
    }
}

/// Evaluates `ast`.
///
/// # Errors
/// See [`EvaluatorError`]. Division checks for a zero divisor before
/// dividing.
///
/// # Example
/// ```rust
/// # use exparse::{evaluate, parse_ast, tokenize};
/// let ast = parse_ast(&tokenize("2 * (3 + 4) - 1").unwrap()).unwrap();
/// assert_eq!(evaluate(&ast), Ok(13.0));
/// ```
pub fn evaluate(ast: &Ast) -> Result<f64, EvaluatorError> {
    let result = walk(ast, 0, &mut NoTrace)?;
    log::debug!("evaluated {} nodes: {}", ast.node_count(), result);
    Ok(result)
}

/// Evaluates `ast`, recording a line for every node visited.
///
/// # Example
/// ```rust
/// # use exparse::{evaluate_with_trace, parse_ast, tokenize};
/// let ast = parse_ast(&tokenize("2 + 3").unwrap()).unwrap();
/// let eval = evaluate_with_trace(&ast).unwrap();
/// assert_eq!(eval.result, 5.0);
/// assert_eq!(
///     eval.steps,
///     [
///         "Evaluating BinaryOp: +",
///         "  Evaluating Number: 2",
///         "  Evaluating Number: 3",
///         "Result: 2 + 3 = 5",
///     ]
/// );
/// ```
pub fn evaluate_with_trace(ast: &Ast) -> Result<Evaluation, EvaluatorError> {
    let mut steps = Vec::new();
    let result = walk(ast, 0, &mut steps)?;
    log::debug!(
        "evaluated {} nodes at depth {} with {} trace lines",
        ast.node_count(),
        ast.depth(),
        steps.len()
    );
    Ok(Evaluation { result, steps })
}

fn walk<T: TraceSink>(ast: &Ast, depth: usize, trace: &mut T) -> Result<f64, EvaluatorError> {
    match ast {
        Ast::Number { value } => {
            trace.line(depth, || format!("Evaluating {}: {value}", ast.kind_name()));
            if !value.is_finite() {
                return Err(EvaluatorError::InvalidNumber { value: *value });
            }
            Ok(*value)
        }
        Ast::UnaryOp { operator, operand } => {
            trace.line(depth, || format!("Evaluating {}: {operator}", ast.kind_name()));
            let value = walk(operand, depth + 1, trace)?;
            let result = match operator {
                UnaryOperator::Plus => value,
                UnaryOperator::Minus => -value,
            };
            trace.line(depth, || format!("Result: {operator}{value} = {result}"));
            Ok(result)
        }
        Ast::BinaryOp {
            operator,
            left,
            right,
        } => {
            trace.line(depth, || format!("Evaluating {}: {operator}", ast.kind_name()));
            let lhs = walk(left, depth + 1, trace)?;
            let rhs = walk(right, depth + 1, trace)?;
            let result = apply_binary(*operator, lhs, rhs)?;
            trace.line(depth, || format!("Result: {lhs} {operator} {rhs} = {result}"));
            Ok(result)
        }
    }
}

fn apply_binary(operator: BinaryOperator, lhs: f64, rhs: f64) -> Result<f64, EvaluatorError> {
    if !lhs.is_finite() || !rhs.is_finite() {
        return Err(EvaluatorError::InvalidOperands);
    }
    let result = match operator {
        BinaryOperator::Add => lhs + rhs,
        BinaryOperator::Subtract => lhs - rhs,
        BinaryOperator::Multiply => lhs * rhs,
        BinaryOperator::Divide => {
            if rhs == 0.0 {
                return Err(EvaluatorError::DivisionByZero);
            }
            lhs / rhs
        }
    };
    if !result.is_finite() {
        return Err(EvaluatorError::Overflow { operator });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_ast;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn eval_str(src: &str) -> Result<f64, EvaluatorError> {
        evaluate(&parse_ast(&tokenize(src).unwrap()).unwrap())
    }

    #[test]
    fn arithmetic() {
        init_logger();
        let cases = [
            ("2 + 3 * 4", 14.0),
            ("(5 + 3) * 2", 16.0),
            ("10 - 4 / 2", 8.0),
            ("2 * (3 + 4) - 1", 13.0),
            ("-5 + 3", -2.0),
            ("--5", 5.0),
            ("+7", 7.0),
            ("8 / 4 / 2", 1.0),
            ("0.1 + 0.2", 0.1 + 0.2),
        ];
        for (src, expected) in cases {
            assert_eq!(eval_str(src), Ok(expected), "{src}");
        }
    }

    #[test]
    fn negative_zero_is_preserved() {
        let result = eval_str("-0").unwrap();
        assert_eq!(result, 0.0);
        assert!(result.is_sign_negative());
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval_str("1 / 0"), Err(EvaluatorError::DivisionByZero));
        assert_eq!(eval_str("1 / -0"), Err(EvaluatorError::DivisionByZero));
        assert_eq!(eval_str("0 / (2 - 2)"), Err(EvaluatorError::DivisionByZero));
    }

    #[test]
    fn overflow_is_reported_per_operator() {
        let big = "1".repeat(300);
        let cases = [
            (format!("{big} * {big}"), BinaryOperator::Multiply),
            (format!("{big} / 0.{}1", "0".repeat(20)), BinaryOperator::Divide),
        ];
        for (src, operator) in cases {
            assert_eq!(eval_str(&src), Err(EvaluatorError::Overflow { operator }));
        }

        let max = Ast::number(f64::MAX);
        let sum = Ast::binary(BinaryOperator::Add, max.clone(), max.clone());
        assert_eq!(
            evaluate(&sum),
            Err(EvaluatorError::Overflow {
                operator: BinaryOperator::Add
            })
        );
        let neg = Ast::unary(UnaryOperator::Minus, max.clone());
        let diff = Ast::binary(BinaryOperator::Subtract, neg, max);
        assert_eq!(
            evaluate(&diff).unwrap_err().to_string(),
            "Subtraction result overflow"
        );
    }

    #[test]
    fn non_finite_leaves_are_rejected() {
        let err = evaluate(&Ast::number(f64::INFINITY)).unwrap_err();
        assert_eq!(
            err,
            EvaluatorError::InvalidNumber {
                value: f64::INFINITY
            }
        );
        assert_eq!(err.to_string(), "Invalid number value: inf");

        let ast = Ast::binary(BinaryOperator::Add, Ast::number(1.0), Ast::number(f64::NAN));
        assert!(matches!(
            evaluate(&ast),
            Err(EvaluatorError::InvalidNumber { value }) if value.is_nan()
        ));
    }

    #[test]
    fn trace_of_nested_expression() {
        init_logger();
        let ast = parse_ast(&tokenize("-(2 * 3)").unwrap()).unwrap();
        let eval = evaluate_with_trace(&ast).unwrap();
        assert_eq!(eval.result, -6.0);
        assert_eq!(
            eval.steps,
            [
                "Evaluating UnaryOp: -",
                "  Evaluating BinaryOp: *",
                "    Evaluating Number: 2",
                "    Evaluating Number: 3",
                "  Result: 2 * 3 = 6",
                "Result: -6 = -6",
            ]
        );
    }

    #[test]
    fn traced_and_plain_agree() {
        for src in ["1 + 2 * 3 - 4 / 5", "-(-(1.5))", "1 / 0", "7 / (3 - 3) + 1"] {
            let ast = parse_ast(&tokenize(src).unwrap()).unwrap();
            let plain = evaluate(&ast);
            let traced = evaluate_with_trace(&ast).map(|e| e.result);
            assert_eq!(plain, traced, "{src}");
        }
    }

    #[test]
    fn left_is_evaluated_before_right() {
        let ast = parse_ast(&tokenize("(1 / 0) + (2 / 0)").unwrap()).unwrap();
        let mut steps = Vec::new();
        let err = walk(&ast, 0, &mut steps).unwrap_err();
        assert_eq!(err, EvaluatorError::DivisionByZero);
        assert!(steps.iter().any(|s| s.trim() == "Evaluating Number: 1"));
        assert!(!steps.iter().any(|s| s.trim() == "Evaluating Number: 2"));
    }

    #[test]
    fn clone_evaluates_identically() {
        let ast = parse_ast(&tokenize("3.5 * (2 - 8) / 7").unwrap()).unwrap();
        assert_eq!(evaluate(&ast), evaluate(&ast.clone()));
    }
}
