//! WebAssembly bindings for abacus-core
//!
//! This module provides wasm-bindgen bindings for use in web applications.
//! Enable the "wasm" feature to use these bindings. Structured results are
//! returned as JSON strings.

#![cfg(feature = "wasm")]

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::calculator::{Calculator, Key};
use crate::format::{format_conversion, format_number};
use crate::history::HistoryEntry;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible wrapper for one calculator session
#[wasm_bindgen]
pub struct WasmCalculator {
    calc: Calculator,
}

#[wasm_bindgen]
impl WasmCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            calc: Calculator::new(),
        }
    }

    /// Press a keypad key by name ("7", ".", "+", "sqrt", "M+", ...).
    /// Returns the state as JSON; unknown keys leave the state untouched.
    #[wasm_bindgen]
    pub fn press(&mut self, key: &str) -> String {
        match key.parse::<Key>() {
            Ok(key) => self.calc.press(key),
            Err(e) => return error_json(&e.to_string()),
        }
        self.state()
    }

    /// Current display, pending expression and memory as JSON
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        to_json(&StateJson {
            display: self.calc.display(),
            pending: self.calc.pending_expression(),
            memory: format_number(self.calc.memory()),
            is_error: self.calc.is_error(),
        })
    }

    #[wasm_bindgen]
    pub fn display(&self) -> String {
        self.calc.display().to_string()
    }

    /// History as a JSON array, most recent first
    #[wasm_bindgen]
    pub fn history(&self) -> String {
        to_json(&self.calc.history().entries())
    }

    /// Restore history saved by the page, e.g. from localStorage
    #[wasm_bindgen]
    pub fn load_history(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<HistoryEntry>>(json) {
            Ok(entries) => {
                self.calc.set_history(entries);
                true
            }
            Err(_) => false,
        }
    }

    /// Use the result of a history entry as the current operand.
    /// Returns the state as JSON, or an error for a missing entry.
    #[wasm_bindgen]
    pub fn recall(&mut self, index: usize) -> String {
        match self.calc.recall_history(index) {
            Ok(()) => self.state(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    #[wasm_bindgen]
    pub fn clear_history(&mut self) {
        self.calc.clear_history();
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.calc.clear_all();
    }
}

impl Default for WasmCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate an expression, returns `{"value", "formatted"}` or `{"error"}`
#[wasm_bindgen]
pub fn evaluate(input: &str) -> String {
    match crate::evaluate(input) {
        Ok(value) => to_json(&ValueJson {
            value,
            formatted: format_number(value),
        }),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Convert a value, returns `{"value", "formatted"}` or `{"error"}`
#[wasm_bindgen]
pub fn convert(category: &str, from: &str, to: &str, value: f64) -> String {
    match crate::convert(category, from, to, value) {
        Ok(value) => to_json(&ValueJson {
            value,
            formatted: format_conversion(value),
        }),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Format a conversion result for display
#[wasm_bindgen(js_name = formatConversion)]
pub fn format_conversion_js(value: f64) -> String {
    format_conversion(value)
}

/// All categories as a JSON array of names
#[wasm_bindgen]
pub fn categories() -> String {
    to_json(&crate::get_categories())
}

/// Units of a category as a JSON array of `{name, label}`
#[wasm_bindgen]
pub fn units(category: &str) -> String {
    match crate::Category::parse(category) {
        Some(c) => {
            let units: Vec<UnitJson> = c
                .def()
                .units
                .iter()
                .map(|u| UnitJson {
                    name: u.name,
                    label: u.label,
                })
                .collect();
            to_json(&units)
        }
        None => error_json(&crate::Error::UnknownCategory(category.to_string()).to_string()),
    }
}

#[derive(Serialize)]
struct StateJson<'a> {
    display: &'a str,
    pending: Option<String>,
    memory: String,
    is_error: bool,
}

#[derive(Serialize)]
struct ValueJson {
    value: f64,
    formatted: String,
}

#[derive(Serialize)]
struct UnitJson {
    name: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct ErrorJson<'a> {
    error: &'a str,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string())
}

fn error_json(message: &str) -> String {
    to_json(&ErrorJson { error: message })
}
