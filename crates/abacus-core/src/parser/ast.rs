//! Abstract Syntax Tree definitions

use crate::math::{Function, Operator};
use pest::iterators::{Pair, Pairs};

use super::Rule;

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Named constant: π or e
    Constant(Constant),
    /// Unary minus
    Negate(Box<Expr>),
    /// Binary operation
    BinaryOp {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Function call: sqrt(16), log(100)
    FunctionCall { function: Function, arg: Box<Expr> },
}

/// Constants recognised in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

fn parse_number_str(s: &str) -> Result<f64, String> {
    s.parse::<f64>().map_err(|e| format!("{e}: {s}"))
}

/// Build AST from parsed pairs
pub fn build_ast(pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    for pair in pairs {
        if pair.as_rule() == Rule::line {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::calculation {
                    return build_calculation(inner.into_inner());
                }
            }
        }
    }
    Err("Empty expression".to_string())
}

fn build_calculation(pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let mut terms: Vec<Expr> = Vec::new();
    let mut ops: Vec<Operator> = Vec::new();

    for pair in pairs {
        match pair.as_rule() {
            Rule::term => terms.push(build_term(pair)?),
            Rule::add => ops.push(Operator::Add),
            Rule::subtract => ops.push(Operator::Subtract),
            Rule::multiply => ops.push(Operator::Multiply),
            Rule::divide => ops.push(Operator::Divide),
            Rule::power => ops.push(Operator::Power),
            Rule::modulo => ops.push(Operator::Modulo),
            _ => {}
        }
    }

    if terms.is_empty() {
        return Err("Empty expression".to_string());
    }

    // Pass 1: Power, grouped from the right (2^3^2 = 2^9)
    reduce_right(&mut terms, &mut ops, &[Operator::Power]);

    // Pass 2: Multiply, Divide, Modulo
    reduce_left(
        &mut terms,
        &mut ops,
        &[Operator::Multiply, Operator::Divide, Operator::Modulo],
    );

    // Pass 3: Add, Subtract
    reduce_left(&mut terms, &mut ops, &[Operator::Add, Operator::Subtract]);

    if terms.len() != 1 {
        return Err("Failed to reduce expression".to_string());
    }

    Ok(terms.remove(0))
}

fn combine(terms: &mut Vec<Expr>, op: Operator, i: usize) {
    let left = terms.remove(i);
    let right = terms.remove(i); // shifted into i by the first remove
    terms.insert(
        i,
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    );
}

fn reduce_left(terms: &mut Vec<Expr>, ops: &mut Vec<Operator>, target_ops: &[Operator]) {
    let mut i = 0;
    while i < ops.len() {
        if target_ops.contains(&ops[i]) {
            let op = ops.remove(i);
            combine(terms, op, i);
        } else {
            i += 1;
        }
    }
}

fn reduce_right(terms: &mut Vec<Expr>, ops: &mut Vec<Operator>, target_ops: &[Operator]) {
    let mut i = ops.len();
    while i > 0 {
        i -= 1;
        if target_ops.contains(&ops[i]) {
            let op = ops.remove(i);
            combine(terms, op, i);
        }
    }
}

fn build_term(pair: Pair<'_, Rule>) -> Result<Expr, String> {
    let mut negations = 0usize;
    let mut operand = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negate => negations += 1,
            _ => operand = Some(build_atom(inner)?),
        }
    }

    // Double negation is the identity on f64, so only the parity matters
    let expr = operand.ok_or("Expected operand")?;
    if negations % 2 == 1 {
        Ok(Expr::Negate(Box::new(expr)))
    } else {
        Ok(expr)
    }
}

fn build_atom(pair: Pair<'_, Rule>) -> Result<Expr, String> {
    match pair.as_rule() {
        Rule::number => parse_number_str(pair.as_str()).map(Expr::Number),
        Rule::constant => {
            let inner = pair.into_inner().next().ok_or("Expected constant")?;
            match inner.as_rule() {
                Rule::pi => Ok(Expr::Constant(Constant::Pi)),
                _ => Ok(Expr::Constant(Constant::E)),
            }
        }
        Rule::parenthesized => {
            let inner = pair.into_inner().next().ok_or("Expected expression")?;
            build_calculation(inner.into_inner())
        }
        Rule::function_call => parse_function_call(pair),
        other => Err(format!("Unexpected rule: {other:?}")),
    }
}

fn parse_function_call(pair: Pair<'_, Rule>) -> Result<Expr, String> {
    let mut inner = pair.into_inner();
    let name = inner.next().ok_or("Expected function name")?.as_str();
    let function = name
        .parse::<Function>()
        .map_err(|_| format!("Unknown function: {name}"))?;

    let arg = inner.next().ok_or("Expected function argument")?;
    Ok(Expr::FunctionCall {
        function,
        arg: Box::new(build_calculation(arg.into_inner())?),
    })
}
