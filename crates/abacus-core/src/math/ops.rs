//! Binary operators and unary scientific functions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operator {
    /// Symbol used when rendering history expressions
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Power => "^",
            Operator::Modulo => "mod",
        }
    }

    /// Keypad name of the operator
    pub fn key(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "pow",
            Operator::Modulo => "mod",
        }
    }

    /// Reduce two operands
    pub fn apply(&self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(super::add(a, b)),
            Operator::Subtract => Ok(super::subtract(a, b)),
            Operator::Multiply => Ok(super::multiply(a, b)),
            Operator::Divide => super::divide(a, b),
            Operator::Power => Ok(super::power(a, b)),
            Operator::Modulo => super::modulo(a, b),
        }
    }

    pub fn all() -> impl Iterator<Item = Operator> {
        [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Power,
            Operator::Modulo,
        ]
        .into_iter()
    }

    /// Parse a keypad name or display symbol
    pub fn parse(s: &str) -> Option<Operator> {
        match s {
            "+" => Some(Operator::Add),
            "-" | "−" => Some(Operator::Subtract),
            "*" | "×" => Some(Operator::Multiply),
            "/" | "÷" => Some(Operator::Divide),
            "pow" | "^" => Some(Operator::Power),
            "mod" => Some(Operator::Modulo),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary scientific functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Base-10 logarithm
    Log,
    /// Natural logarithm
    Ln,
    Sqrt,
    Factorial,
}

impl Function {
    /// Name used on the keypad, in expressions, and in history entries
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Sqrt => "sqrt",
            Function::Factorial => "fact",
        }
    }

    pub fn apply(&self, a: f64) -> Result<f64> {
        match self {
            Function::Sin => Ok(super::sin(a)),
            Function::Cos => Ok(super::cos(a)),
            Function::Tan => Ok(super::tan(a)),
            Function::Asin => super::asin(a),
            Function::Acos => super::acos(a),
            Function::Atan => Ok(super::atan(a)),
            Function::Log => super::log10(a),
            Function::Ln => super::ln(a),
            Function::Sqrt => super::sqrt(a),
            Function::Factorial => super::factorial(a),
        }
    }

    pub fn all() -> impl Iterator<Item = Function> {
        [
            Function::Sin,
            Function::Cos,
            Function::Tan,
            Function::Asin,
            Function::Acos,
            Function::Atan,
            Function::Log,
            Function::Ln,
            Function::Sqrt,
            Function::Factorial,
        ]
        .into_iter()
    }
}

impl FromStr for Function {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Function::all()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
