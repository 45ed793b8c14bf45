//! Expression parser using pest

mod ast;

pub use ast::{Constant, Expr};

use pest::error::LineColLocation;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct ExprParser;

/// Parse a complete arithmetic expression.
///
/// The whole input must match; trailing operators or unbalanced
/// parentheses are rejected with a message naming the column.
pub fn parse_expression(input: &str) -> Result<Expr, String> {
    let pairs = ExprParser::parse(Rule::line, input).map_err(|e| describe(&e))?;
    ast::build_ast(pairs)
}

fn describe(err: &pest::error::Error<Rule>) -> String {
    let column = match err.line_col {
        LineColLocation::Pos((_, col)) | LineColLocation::Span((_, col), _) => col,
    };
    format!("{} at column {column}", err.variant.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Function, Operator};
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42"), Ok(Expr::Number(42.0)));
        assert_eq!(parse_expression(".5"), Ok(Expr::Number(0.5)));
        assert_eq!(parse_expression("1.5e3"), Ok(Expr::Number(1500.0)));
    }

    #[test]
    fn test_precedence() {
        let expected = Expr::BinaryOp {
            op: Operator::Add,
            left: num(2.0),
            right: Box::new(Expr::BinaryOp {
                op: Operator::Multiply,
                left: num(3.0),
                right: num(4.0),
            }),
        };
        assert_eq!(parse_expression("2 + 3 * 4"), Ok(expected));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expected = Expr::BinaryOp {
            op: Operator::Subtract,
            left: Box::new(Expr::BinaryOp {
                op: Operator::Subtract,
                left: num(10.0),
                right: num(4.0),
            }),
            right: num(3.0),
        };
        assert_eq!(parse_expression("10 - 4 - 3"), Ok(expected));
    }

    #[test]
    fn test_power_is_right_associative() {
        let expected = Expr::BinaryOp {
            op: Operator::Power,
            left: num(2.0),
            right: Box::new(Expr::BinaryOp {
                op: Operator::Power,
                left: num(3.0),
                right: num(2.0),
            }),
        };
        assert_eq!(parse_expression("2 ^ 3 ** 2"), Ok(expected));
    }

    #[test]
    fn test_function_and_constants() {
        let expected = Expr::FunctionCall {
            function: Function::Sin,
            arg: Box::new(Expr::BinaryOp {
                op: Operator::Divide,
                left: Box::new(Expr::Constant(Constant::Pi)),
                right: num(2.0),
            }),
        };
        assert_eq!(parse_expression("sin(π / 2)"), Ok(expected));
        assert_eq!(parse_expression("e"), Ok(Expr::Constant(Constant::E)));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(parse_expression("-3"), Ok(Expr::Negate(num(3.0))));
        assert_eq!(parse_expression("--3"), Ok(Expr::Number(3.0)));
        assert_eq!(parse_expression("- - -3"), Ok(Expr::Negate(num(3.0))));
    }

    #[test]
    fn test_display_glyphs() {
        assert!(parse_expression("6 × 7 ÷ 2 − 1").is_ok());
        assert!(parse_expression("7 mod 3").is_ok());
    }

    #[test]
    fn test_rejects_incomplete_input() {
        assert!(parse_expression("2 +").is_err());
        assert!(parse_expression("(1 + 2").is_err());
        assert!(parse_expression("").is_err());
        assert!(parse_expression("foo(2)").is_err());
        assert!(parse_expression("2 3").is_err());
    }
}
