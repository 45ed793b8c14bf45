//! Arithmetic engine
//!
//! Pure functions over `f64`. Functions with a restricted domain return
//! [`Result`] and fail with a typed [`Error`]; everything else follows IEEE-754.

mod ops;

pub use ops::{Function, Operator};

use crate::error::{Error, Result};

/// Largest n for which n! is representable as a finite f64
const MAX_FACTORIAL: f64 = 170.0;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divide `a` by `b`
pub fn divide(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(Error::DivisionByZero);
    }
    Ok(a / b)
}

/// Truncated remainder; the result takes the sign of `a`
pub fn modulo(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(Error::DivisionByZero);
    }
    Ok(a % b)
}

pub fn power(a: f64, b: f64) -> f64 {
    a.powf(b)
}

pub fn sqrt(a: f64) -> Result<f64> {
    if a < 0.0 {
        return Err(Error::NegativeRadicand);
    }
    Ok(a.sqrt())
}

/// `a` percent as a fraction (50 -> 0.5)
pub fn percentage(a: f64) -> f64 {
    a / 100.0
}

/// Iterative factorial.
///
/// Returns positive infinity above 170 since the product is no longer
/// representable.
pub fn factorial(a: f64) -> Result<f64> {
    if a < 0.0 {
        return Err(Error::NegativeFactorial);
    }
    if a.fract() != 0.0 {
        return Err(Error::NonIntegerFactorial);
    }
    if a == 0.0 || a == 1.0 {
        return Ok(1.0);
    }
    if a > MAX_FACTORIAL {
        return Ok(f64::INFINITY);
    }

    let n = a as u32;
    Ok((2..=n).fold(1.0, |acc, i| acc * f64::from(i)))
}

pub fn sin(a: f64) -> f64 {
    a.sin()
}

pub fn cos(a: f64) -> f64 {
    a.cos()
}

pub fn tan(a: f64) -> f64 {
    a.tan()
}

pub fn asin(a: f64) -> Result<f64> {
    if a.abs() > 1.0 {
        return Err(Error::DomainError { function: "asin" });
    }
    Ok(a.asin())
}

pub fn acos(a: f64) -> Result<f64> {
    if a.abs() > 1.0 {
        return Err(Error::DomainError { function: "acos" });
    }
    Ok(a.acos())
}

pub fn atan(a: f64) -> f64 {
    a.atan()
}

/// Natural logarithm
pub fn ln(a: f64) -> Result<f64> {
    if a <= 0.0 {
        return Err(Error::NonPositiveLogarithand);
    }
    Ok(a.ln())
}

pub fn log10(a: f64) -> Result<f64> {
    if a <= 0.0 {
        return Err(Error::NonPositiveLogarithand);
    }
    Ok(a.log10())
}
