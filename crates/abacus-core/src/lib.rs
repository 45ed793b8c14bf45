//! abacus-core: Core engine for the abacus calculator
//!
//! This crate provides the pure arithmetic and unit conversion engines, the
//! keypad-driven calculator state machine, and the history persistence
//! boundary. It has no UI dependencies and can be used from the CLI, a
//! server, or WASM.
//!
//! # Example
//!
//! ```
//! use abacus_core::{convert, evaluate, Calculator};
//!
//! // Expressions
//! assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
//! assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
//!
//! // Unit conversion
//! assert_eq!(convert("length", "m", "cm", 1.0), Ok(100.0));
//!
//! // Keypad session
//! let mut calc = Calculator::new();
//! for key in ["2", "+", "3", "="] {
//!     calc.press(key.parse()?);
//! }
//! assert_eq!(calc.display(), "5");
//! assert_eq!(calc.history().entries()[0].expression, "2 + 3");
//! # Ok::<(), abacus_core::Error>(())
//! ```

pub mod calculator;
pub mod convert;
pub mod error;
pub mod eval;
pub mod format;
pub mod history;
pub mod math;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use calculator::{Action, Calculator, Key, ERROR_DISPLAY};
pub use convert::{
    convert, convert_temperature, get_categories, get_units_for_category, Category, CategoryDef,
    UnitDef, CATEGORIES,
};
pub use error::{Error, Result};
pub use eval::evaluate;
pub use format::{format_conversion, format_number, parse_number};
pub use history::{
    History, HistoryEntry, HistoryStore, MemoryStore, SessionMode, StoreError, GUEST_KEY,
};
pub use math::{Function, Operator};

#[cfg(not(target_arch = "wasm32"))]
pub use history::FileStore;
#[cfg(all(feature = "remote", not(target_arch = "wasm32")))]
pub use history::RemoteStore;
