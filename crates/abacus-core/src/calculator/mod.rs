//! Calculator state machine
//!
//! Keeps the display text, the pending binary operation, the memory register
//! and the session history. Engine failures never escape a transition: they
//! put the display into the [`ERROR_DISPLAY`] state, from which a digit or
//! [`Calculator::clear_all`] recovers.

mod action;

pub use action::{Action, Key};

use crate::error::Result;
use crate::format::{format_number, parse_number};
use crate::history::{History, HistoryEntry, HistoryStore, SessionMode};
use crate::math::{self, Function, Operator};

/// Display text after a failed transition
pub const ERROR_DISPLAY: &str = "Error";

/// A history store bound to the key the session writes under
struct Persistence {
    user_id: String,
    store: Box<dyn HistoryStore>,
}

/// One calculator session
pub struct Calculator {
    current_input: String,
    pending_operator: Option<Operator>,
    left_operand: Option<f64>,
    awaiting_new_operand: bool,
    /// Set once the right-hand operand of a pending operator has been typed
    operand_entered: bool,
    memory: f64,
    history: History,
    persistence: Option<Persistence>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Calculator without persistence
    pub fn new() -> Self {
        Self {
            current_input: "0".to_string(),
            pending_operator: None,
            left_operand: None,
            awaiting_new_operand: false,
            operand_entered: false,
            memory: 0.0,
            history: History::new(),
            persistence: None,
        }
    }

    /// Calculator that loads from and writes to `store`.
    ///
    /// Anonymous sessions never touch the store. A store that fails to load
    /// is logged and the session starts with an empty history.
    pub fn with_store(mode: &SessionMode, store: Box<dyn HistoryStore>) -> Self {
        let mut calc = Self::new();
        let Some(user_id) = mode.storage_key() else {
            return calc;
        };

        match store.fetch_history(user_id) {
            Ok(entries) => {
                tracing::debug!(user_id, count = entries.len(), "history loaded");
                calc.history.replace(entries);
            }
            Err(e) => tracing::warn!(user_id, error = %e, "failed to load history"),
        }

        calc.persistence = Some(Persistence {
            user_id: user_id.to_string(),
            store,
        });
        calc
    }

    // ---- accessors ----

    /// Text currently shown on the display
    pub fn display(&self) -> &str {
        &self.current_input
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn left_operand(&self) -> Option<f64> {
        self.left_operand
    }

    pub fn is_awaiting_new_operand(&self) -> bool {
        self.awaiting_new_operand
    }

    /// Whether the display shows the error sentinel
    pub fn is_error(&self) -> bool {
        self.current_input == ERROR_DISPLAY
    }

    /// The pending half of a binary operation, e.g. `"2 +"`
    pub fn pending_expression(&self) -> Option<String> {
        match (self.left_operand, self.pending_operator) {
            (Some(left), Some(op)) => Some(format!("{} {}", format_number(left), op.symbol())),
            _ => None,
        }
    }

    // ---- text entry ----

    /// Type a digit. Anything but `0`-`9` is ignored.
    pub fn input_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }

        if self.awaiting_new_operand || self.is_error() {
            self.current_input = digit.to_string();
            self.awaiting_new_operand = false;
        } else if self.current_input == "0" {
            self.current_input = digit.to_string();
        } else {
            self.current_input.push(digit);
        }
        self.operand_entered = true;
    }

    /// Type a decimal point
    pub fn input_decimal(&mut self) {
        if self.awaiting_new_operand || self.is_error() {
            self.current_input = "0.".to_string();
            self.awaiting_new_operand = false;
        } else if !self.current_input.contains('.') {
            self.current_input.push('.');
        }
        self.operand_entered = true;
    }

    /// Backspace
    pub fn delete_last_digit(&mut self) {
        if self.is_error() || self.current_input.chars().count() <= 1 {
            self.current_input = "0".to_string();
            return;
        }

        self.current_input.pop();
        if self.current_input == "-" {
            self.current_input = "0".to_string();
        }
    }

    /// Reset input and pending operation. Memory and history are kept.
    pub fn clear_all(&mut self) {
        self.current_input = "0".to_string();
        self.pending_operator = None;
        self.left_operand = None;
        self.awaiting_new_operand = false;
        self.operand_entered = false;
    }

    // ---- actions ----

    /// Press a single keypad key
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Backspace => self.delete_last_digit(),
            Key::Action(action) => self.perform_action(action),
        }
    }

    /// Perform an action given by its keypad name, e.g. `"M+"` or `"sqrt"`
    pub fn perform_action_named(&mut self, name: &str) -> Result<()> {
        let action = name.parse()?;
        self.perform_action(action);
        Ok(())
    }

    pub fn perform_action(&mut self, action: Action) {
        match action {
            Action::ClearAll => self.clear_all(),
            Action::ToggleSign => self.map_input(|v| -v),
            Action::Percent => self.map_input(math::percentage),
            Action::Equals => self.calculate(),
            Action::Operator(op) => self.handle_operator(op),
            Action::Function(f) => self.apply_function(f),
            Action::MemoryClear => self.memory = 0.0,
            Action::MemoryRecall => {
                self.current_input = format_number(self.memory);
                self.awaiting_new_operand = true;
                self.operand_entered = true;
            }
            Action::MemoryAdd => {
                self.memory += parse_number(&self.current_input);
                self.awaiting_new_operand = true;
            }
            Action::MemorySubtract => {
                self.memory -= parse_number(&self.current_input);
                self.awaiting_new_operand = true;
            }
            Action::Pi => self.load_constant(std::f64::consts::PI),
            Action::Euler => self.load_constant(std::f64::consts::E),
            Action::Exponent => {
                if !self.is_error() && !self.current_input.contains('e') {
                    self.current_input.push_str("e+0");
                }
            }
        }
    }

    // ---- history ----

    /// Forget the history, in the store as well
    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Some(p) = self.persistence.as_mut() {
            if let Err(e) = p.store.clear_history(&p.user_id) {
                tracing::warn!(user_id = %p.user_id, error = %e, "failed to clear stored history");
            }
        }
    }

    /// Load the result of a history entry (0 is the most recent) as the
    /// current operand
    pub fn recall_history(&mut self, index: usize) -> Result<()> {
        let entry = self
            .history
            .entries()
            .get(index)
            .ok_or(crate::Error::UnknownHistoryEntry(index))?;
        self.current_input = entry.result.clone();
        self.awaiting_new_operand = true;
        self.operand_entered = true;
        Ok(())
    }

    /// Replace the in-session history without writing to the store
    pub fn set_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history.replace(entries);
    }

    fn record(&mut self, expression: String, result: String) {
        let entry = HistoryEntry::new(expression, result);
        if let Some(p) = self.persistence.as_mut() {
            if let Err(e) = p.store.append_history(&p.user_id, &entry) {
                tracing::warn!(user_id = %p.user_id, error = %e, "failed to store history entry");
            }
        }
        self.history.record(entry);
    }

    // ---- transitions ----

    fn handle_operator(&mut self, op: Operator) {
        if self.is_error() {
            return;
        }

        if self.pending_operator.is_some() && self.operand_entered {
            self.calculate();
            if self.is_error() {
                return;
            }
        }

        self.left_operand = Some(parse_number(&self.current_input));
        self.pending_operator = Some(op);
        self.awaiting_new_operand = true;
        self.operand_entered = false;
    }

    fn calculate(&mut self) {
        let (Some(op), Some(left)) = (self.pending_operator, self.left_operand) else {
            return;
        };
        if self.is_error() {
            return;
        }

        let right = parse_number(&self.current_input);
        match op.apply(left, right) {
            Ok(value) => {
                let expression = format!(
                    "{} {} {}",
                    format_number(left),
                    op.symbol(),
                    self.current_input
                );
                let result = format_number(value);
                self.record(expression, result.clone());
                self.current_input = result;
                self.pending_operator = None;
                self.left_operand = None;
                self.awaiting_new_operand = true;
                self.operand_entered = false;
            }
            Err(e) => self.fail(&e),
        }
    }

    fn apply_function(&mut self, function: Function) {
        if self.is_error() {
            return;
        }

        let value = parse_number(&self.current_input);
        match function.apply(value) {
            Ok(result) => {
                let expression = format!("{}({})", function.name(), format_number(value));
                let result = format_number(result);
                self.record(expression, result.clone());
                self.current_input = result;
                self.awaiting_new_operand = true;
                self.operand_entered = true;
            }
            Err(e) => self.fail(&e),
        }
    }

    fn map_input(&mut self, f: impl FnOnce(f64) -> f64) {
        if self.is_error() {
            return;
        }
        self.current_input = format_number(f(parse_number(&self.current_input)));
    }

    fn load_constant(&mut self, value: f64) {
        self.current_input = format_number(value);
        self.awaiting_new_operand = true;
        self.operand_entered = true;
    }

    fn fail(&mut self, error: &crate::Error) {
        tracing::debug!(input = %self.current_input, %error, "calculation failed");
        self.current_input = ERROR_DISPLAY.to_string();
        self.pending_operator = None;
        self.left_operand = None;
        self.awaiting_new_operand = true;
        self.operand_entered = false;
    }
}
