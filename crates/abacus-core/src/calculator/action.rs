//! Keypad actions and keys

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::math::{Function, Operator};

/// Everything the keypad can ask of the calculator besides text entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `AC`
    ClearAll,
    /// `±`
    ToggleSign,
    /// `%`, divides the current input by 100
    Percent,
    /// `=`
    Equals,
    Operator(Operator),
    Function(Function),
    /// `MC`
    MemoryClear,
    /// `MR`
    MemoryRecall,
    /// `M+`
    MemoryAdd,
    /// `M-`
    MemorySubtract,
    /// `pi`
    Pi,
    /// `e`
    Euler,
    /// `exp`, starts an exponent on the current literal
    Exponent,
}

impl Action {
    /// Keypad name, accepted back by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Action::ClearAll => "AC",
            Action::ToggleSign => "±",
            Action::Percent => "%",
            Action::Equals => "=",
            Action::Operator(op) => op.key(),
            Action::Function(f) => f.name(),
            Action::MemoryClear => "MC",
            Action::MemoryRecall => "MR",
            Action::MemoryAdd => "M+",
            Action::MemorySubtract => "M-",
            Action::Pi => "pi",
            Action::Euler => "e",
            Action::Exponent => "exp",
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let action = match s {
            "AC" => Action::ClearAll,
            "±" | "+/-" => Action::ToggleSign,
            "%" => Action::Percent,
            "=" => Action::Equals,
            "MC" => Action::MemoryClear,
            "MR" => Action::MemoryRecall,
            "M+" => Action::MemoryAdd,
            "M-" => Action::MemorySubtract,
            "pi" | "π" => Action::Pi,
            "e" => Action::Euler,
            "exp" => Action::Exponent,
            other => {
                if let Some(op) = Operator::parse(other) {
                    Action::Operator(op)
                } else {
                    Action::Function(other.parse()?)
                }
            }
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single keypad key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Backspace,
    Action(Action),
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return Ok(Key::Digit(c));
            }
        }

        match s {
            "." => Ok(Key::Decimal),
            "del" | "backspace" | "⌫" => Ok(Key::Backspace),
            "enter" => Ok(Key::Action(Action::Equals)),
            "esc" => Ok(Key::Action(Action::ClearAll)),
            _ => s.parse().map(Key::Action),
        }
    }
}
