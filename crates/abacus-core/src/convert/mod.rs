//! Unit conversion engine
//!
//! Linear categories convert through their base unit. Temperature needs an
//! offset as well as a factor and goes through Celsius instead.

mod registry;

pub use registry::{Category, CategoryDef, Scale, UnitDef, CATEGORIES};

use crate::error::{Error, Result};

/// Convert `value` between two units of the same category.
///
/// The category is checked first, then `from`, then `to`.
pub fn convert(category: &str, from: &str, to: &str, value: f64) -> Result<f64> {
    let def = Category::parse(category)
        .map(|c| c.def())
        .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;

    let from_unit = def
        .unit(from)
        .ok_or_else(|| Error::UnknownUnit(from.to_string()))?;
    let to_unit = def
        .unit(to)
        .ok_or_else(|| Error::UnknownUnit(to.to_string()))?;

    match (from_unit.scale, to_unit.scale) {
        (Scale::Factor(f), Scale::Factor(t)) => Ok(value * f / t),
        _ => convert_temperature(from, to, value),
    }
}

/// Convert a temperature between celsius, fahrenheit and kelvin.
pub fn convert_temperature(from: &str, to: &str, value: f64) -> Result<f64> {
    let celsius = match from {
        "celsius" => value,
        "fahrenheit" => (value - 32.0) * 5.0 / 9.0,
        "kelvin" => value - 273.15,
        _ => return Err(Error::UnknownUnit(from.to_string())),
    };

    match to {
        "celsius" => Ok(celsius),
        "fahrenheit" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "kelvin" => Ok(celsius + 273.15),
        _ => Err(Error::UnknownUnit(to.to_string())),
    }
}

/// Unit keys of a category, in registry order
pub fn get_units_for_category(category: &str) -> Result<Vec<&'static str>> {
    let category =
        Category::parse(category).ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
    Ok(category.def().units.iter().map(|u| u.name).collect())
}

/// All category keys, in registry order
pub fn get_categories() -> Vec<&'static str> {
    CATEGORIES.iter().map(|d| d.name).collect()
}
