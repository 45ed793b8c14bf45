//! Conversion categories and their units
//!
//! To add a unit, add an entry to the category's unit slice. Linear units
//! carry their factor to the category's base unit; the base unit itself has
//! factor 1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversion categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Mass,
    Temperature,
    Area,
    Volume,
    Time,
    Speed,
    Data,
    Pressure,
    Energy,
}

/// How a unit maps onto its category's base unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Multiply by this factor to reach the base unit
    Factor(f64),
    /// Needs an offset as well as a factor; handled by the temperature path
    Affine,
}

/// Unit metadata
pub struct UnitDef {
    /// Key used by `convert` (e.g. "km", "fl_oz")
    pub name: &'static str,
    /// Human readable label
    pub label: &'static str,
    pub scale: Scale,
}

impl UnitDef {
    /// Factor to the base unit, `None` for affine units
    pub fn factor(&self) -> Option<f64> {
        match self.scale {
            Scale::Factor(f) => Some(f),
            Scale::Affine => None,
        }
    }
}

/// Category metadata - single source of truth for each category
pub struct CategoryDef {
    pub category: Category,
    /// Key used by `convert` (e.g. "length")
    pub name: &'static str,
    pub units: &'static [UnitDef],
}

impl CategoryDef {
    /// Find a unit by its key
    pub fn unit(&self, name: &str) -> Option<&'static UnitDef> {
        self.units.iter().find(|u| u.name == name)
    }

    /// The unit with factor 1, `None` for temperature
    pub fn base_unit(&self) -> Option<&'static UnitDef> {
        self.units.iter().find(|u| u.scale == Scale::Factor(1.0))
    }
}

const fn linear(name: &'static str, label: &'static str, factor: f64) -> UnitDef {
    UnitDef {
        name,
        label,
        scale: Scale::Factor(factor),
    }
}

const fn affine(name: &'static str, label: &'static str) -> UnitDef {
    UnitDef {
        name,
        label,
        scale: Scale::Affine,
    }
}

/// Complete registry of all conversion categories, in display order.
pub static CATEGORIES: &[CategoryDef] = &[
    // Length (base: meter)
    CategoryDef {
        category: Category::Length,
        name: "length",
        units: &[
            linear("mm", "Millimeter (mm)", 0.001),
            linear("cm", "Centimeter (cm)", 0.01),
            linear("m", "Meter (m)", 1.0),
            linear("km", "Kilometer (km)", 1000.0),
            linear("inch", "Inch (in)", 0.0254),
            linear("foot", "Foot (ft)", 0.3048),
            linear("yard", "Yard (yd)", 0.9144),
            linear("mile", "Mile (mi)", 1609.344),
        ],
    },
    // Mass (base: kilogram)
    CategoryDef {
        category: Category::Mass,
        name: "mass",
        units: &[
            linear("mg", "Milligram (mg)", 0.000001),
            linear("g", "Gram (g)", 0.001),
            linear("kg", "Kilogram (kg)", 1.0),
            linear("ton", "Metric Ton (t)", 1000.0),
            linear("oz", "Ounce (oz)", 0.028349523125),
            linear("lb", "Pound (lb)", 0.45359237),
            linear("stone", "Stone (st)", 6.35029318),
        ],
    },
    // Temperature (pivot: celsius)
    CategoryDef {
        category: Category::Temperature,
        name: "temperature",
        units: &[
            affine("celsius", "Celsius (°C)"),
            affine("fahrenheit", "Fahrenheit (°F)"),
            affine("kelvin", "Kelvin (K)"),
        ],
    },
    // Area (base: square meter)
    CategoryDef {
        category: Category::Area,
        name: "area",
        units: &[
            linear("mm2", "Square Millimeter (mm²)", 0.000001),
            linear("cm2", "Square Centimeter (cm²)", 0.0001),
            linear("m2", "Square Meter (m²)", 1.0),
            linear("km2", "Square Kilometer (km²)", 1_000_000.0),
            linear("ha", "Hectare (ha)", 10_000.0),
            linear("acre", "Acre", 4046.8564224),
            linear("ft2", "Square Foot (ft²)", 0.09290304),
            linear("in2", "Square Inch (in²)", 0.00064516),
            linear("yd2", "Square Yard (yd²)", 0.83612736),
        ],
    },
    // Volume (base: cubic meter)
    CategoryDef {
        category: Category::Volume,
        name: "volume",
        units: &[
            linear("ml", "Milliliter (mL)", 0.000001),
            linear("l", "Liter (L)", 0.001),
            linear("m3", "Cubic Meter (m³)", 1.0),
            linear("gal", "Gallon (US)", 0.00378541),
            linear("qt", "Quart (US)", 0.000946353),
            linear("pt", "Pint (US)", 0.000473176),
            linear("cup", "Cup (US)", 0.000236588),
            linear("fl_oz", "Fluid Ounce (US)", 0.0000295735),
            linear("in3", "Cubic Inch (in³)", 0.0000163871),
            linear("ft3", "Cubic Foot (ft³)", 0.0283168),
        ],
    },
    // Time (base: second)
    CategoryDef {
        category: Category::Time,
        name: "time",
        units: &[
            linear("ms", "Millisecond (ms)", 0.001),
            linear("s", "Second (s)", 1.0),
            linear("min", "Minute (min)", 60.0),
            linear("h", "Hour (h)", 3600.0),
            linear("day", "Day (d)", 86_400.0),
            linear("week", "Week (wk)", 604_800.0),
            linear("month", "Month (30 days)", 2_592_000.0),
            linear("year", "Year (365 days)", 31_536_000.0),
        ],
    },
    // Speed (base: meters per second)
    CategoryDef {
        category: Category::Speed,
        name: "speed",
        units: &[
            linear("mps", "Meter/Second (m/s)", 1.0),
            linear("kph", "Kilometer/Hour (km/h)", 1000.0 / 3600.0),
            linear("mph", "Mile/Hour (mph)", 0.44704),
            linear("fps", "Foot/Second (ft/s)", 0.3048),
            linear("knot", "Knot (kn)", 1852.0 / 3600.0),
        ],
    },
    // Data (base: megabyte)
    CategoryDef {
        category: Category::Data,
        name: "data",
        units: &[
            linear("bit", "Bit (b)", 0.125e-6),
            linear("byte", "Byte (B)", 1e-6),
            linear("kb", "Kilobyte (KB)", 0.001),
            linear("mb", "Megabyte (MB)", 1.0),
            linear("gb", "Gigabyte (GB)", 1000.0),
            linear("tb", "Terabyte (TB)", 1_000_000.0),
        ],
    },
    // Pressure (base: pascal)
    CategoryDef {
        category: Category::Pressure,
        name: "pressure",
        units: &[
            linear("pa", "Pascal (Pa)", 1.0),
            linear("kpa", "Kilopascal (kPa)", 1000.0),
            linear("bar", "Bar", 100_000.0),
            linear("psi", "PSI", 6894.76),
            linear("atm", "Atmosphere (atm)", 101_325.0),
            linear("mmhg", "mmHg", 133.322),
        ],
    },
    // Energy (base: joule)
    CategoryDef {
        category: Category::Energy,
        name: "energy",
        units: &[
            linear("j", "Joule (J)", 1.0),
            linear("kj", "Kilojoule (kJ)", 1000.0),
            linear("cal", "Calorie (cal)", 4.184),
            linear("kcal", "Kilocalorie (kcal)", 4184.0),
            linear("wh", "Watt-hour (Wh)", 3600.0),
            linear("kwh", "Kilowatt-hour (kWh)", 3_600_000.0),
            linear("ev", "Electronvolt (eV)", 1.602176634e-19),
            linear("btu", "BTU", 1055.06),
        ],
    },
];

impl Category {
    /// Get the category definition
    pub fn def(&self) -> &'static CategoryDef {
        CATEGORIES
            .iter()
            .find(|d| d.category == *self)
            .expect("All categories must have definitions")
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    /// Parse category from its key
    pub fn parse(s: &str) -> Option<Category> {
        CATEGORIES
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.category)
    }

    /// Iterator over all categories
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORIES.iter().map(|d| d.category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
