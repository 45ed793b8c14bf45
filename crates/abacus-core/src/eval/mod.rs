//! Expression evaluation engine

use crate::error::{Error, Result};
use crate::parser::{parse_expression, Expr};

/// Parse and evaluate an arithmetic expression.
///
/// Any failure, whether from parsing, from a function in the expression, or
/// from a non-finite result, is reported as [`Error::InvalidExpression`]
/// carrying the underlying cause.
pub fn evaluate(input: &str) -> Result<f64> {
    let expr = parse_expression(input).map_err(|e| {
        tracing::debug!(input, error = %e, "expression did not parse");
        Error::InvalidExpression(e)
    })?;

    let value = eval_expr(&expr).map_err(|e| Error::InvalidExpression(e.to_string()))?;

    if value.is_nan() || value.is_infinite() {
        return Err(Error::InvalidExpression("Invalid result".to_string()));
    }

    Ok(value)
}

/// Evaluate an AST node
pub fn eval_expr(expr: &Expr) -> Result<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Constant(c) => Ok(c.value()),
        Expr::Negate(inner) => Ok(-eval_expr(inner)?),
        Expr::BinaryOp { op, left, right } => {
            let l = eval_expr(left)?;
            let r = eval_expr(right)?;
            op.apply(l, r)
        }
        Expr::FunctionCall { function, arg } => function.apply(eval_expr(arg)?),
    }
}
