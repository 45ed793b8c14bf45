use abacus_core::convert::Scale;
use abacus_core::{
    convert, convert_temperature, format_conversion, get_categories, get_units_for_category,
    Category, Error, CATEGORIES,
};

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_length() {
    assert_eq!(convert("length", "m", "cm", 1.0), Ok(100.0));
    assert_eq!(convert("length", "cm", "m", 100.0), Ok(1.0));
    assert_close(convert("length", "foot", "inch", 1.0).unwrap(), 12.0);
    assert_close(convert("length", "mile", "yard", 1.0).unwrap(), 1760.0);
}

#[test]
fn test_mass() {
    assert_close(convert("mass", "lb", "oz", 1.0).unwrap(), 16.0);
    assert_close(convert("mass", "stone", "lb", 1.0).unwrap(), 14.0);
    assert_close(convert("mass", "ton", "g", 1.0).unwrap(), 1_000_000.0);
}

#[test]
fn test_temperature() {
    assert_eq!(convert_temperature("celsius", "fahrenheit", 0.0), Ok(32.0));
    assert_close(convert_temperature("fahrenheit", "celsius", 32.0).unwrap(), 0.0);
    assert_eq!(convert_temperature("celsius", "kelvin", 0.0), Ok(273.15));
    assert_close(convert_temperature("kelvin", "fahrenheit", 0.0).unwrap(), -459.67);
    assert_eq!(convert_temperature("celsius", "celsius", -40.0), Ok(-40.0));
    assert_close(convert("temperature", "fahrenheit", "celsius", -40.0).unwrap(), -40.0);
}

#[test]
fn test_area_volume_time_speed() {
    assert_close(convert("area", "ha", "m2", 1.0).unwrap(), 10_000.0);
    assert_close(convert("area", "yd2", "ft2", 1.0).unwrap(), 9.0);
    assert_close(convert("volume", "l", "ml", 2.0).unwrap(), 2000.0);
    assert_close(convert("time", "week", "day", 1.0).unwrap(), 7.0);
    assert_close(convert("time", "year", "day", 1.0).unwrap(), 365.0);
    assert_close(convert("speed", "kph", "mps", 36.0).unwrap(), 10.0);
    assert_close(convert("speed", "knot", "kph", 1.0).unwrap(), 1.852);
}

#[test]
fn test_data_pressure_energy() {
    assert_close(convert("data", "byte", "bit", 1.0).unwrap(), 8.0);
    assert_close(convert("data", "tb", "gb", 2.0).unwrap(), 2000.0);
    assert_close(convert("pressure", "bar", "kpa", 1.0).unwrap(), 100.0);
    assert_close(convert("pressure", "atm", "pa", 1.0).unwrap(), 101_325.0);
    assert_close(convert("energy", "kcal", "cal", 1.0).unwrap(), 1000.0);
    assert_close(convert("energy", "kwh", "kj", 1.0).unwrap(), 3600.0);
}

#[test]
fn test_round_trips() {
    for def in CATEGORIES {
        for from in def.units {
            for to in def.units {
                let there = convert(def.name, from.name, to.name, 42.0).unwrap();
                let back = convert(def.name, to.name, from.name, there).unwrap();
                assert_close(back, 42.0);
            }
        }
    }
}

#[test]
fn test_unknown_category() {
    assert_eq!(
        convert("invalidCategory", "m", "cm", 1.0),
        Err(Error::UnknownCategory("invalidCategory".to_string()))
    );
    assert_eq!(
        convert("Length", "m", "cm", 1.0),
        Err(Error::UnknownCategory("Length".to_string()))
    );
}

#[test]
fn test_unknown_unit() {
    assert_eq!(
        convert("length", "bogus", "m", 1.0),
        Err(Error::UnknownUnit("bogus".to_string()))
    );
    assert_eq!(
        convert("temperature", "celsius", "rankine", 1.0),
        Err(Error::UnknownUnit("rankine".to_string()))
    );
    assert_eq!(
        convert_temperature("kelvin", "m", 1.0),
        Err(Error::UnknownUnit("m".to_string()))
    );
}

#[test]
fn test_one_base_unit_per_category() {
    for def in CATEGORIES {
        let base = def
            .units
            .iter()
            .filter(|u| u.scale == Scale::Factor(1.0))
            .count();
        let expected = if def.category == Category::Temperature { 0 } else { 1 };
        assert_eq!(base, expected, "{}", def.name);
    }
}

#[test]
fn test_listings_follow_registry_order() {
    assert_eq!(
        get_categories(),
        vec![
            "length",
            "mass",
            "temperature",
            "area",
            "volume",
            "time",
            "speed",
            "data",
            "pressure",
            "energy"
        ]
    );
    assert_eq!(
        get_units_for_category("temperature"),
        Ok(vec!["celsius", "fahrenheit", "kelvin"])
    );
    assert_eq!(
        get_units_for_category("length").map(|u| u.len()),
        Ok(8)
    );
}

#[test]
fn test_formatting_converted_values() {
    let km = convert("length", "mile", "km", 100.0).unwrap();
    assert_eq!(format_conversion(km), "160.93");

    let cm = convert("length", "km", "cm", 12.0).unwrap();
    assert_eq!(format_conversion(cm), "1.200000e+6");

    let f = convert_temperature("celsius", "fahrenheit", 37.0).unwrap();
    assert_eq!(format_conversion(f), "98.6");

    let mg = convert("mass", "mg", "ton", 1.0).unwrap();
    assert_eq!(format_conversion(mg), "1.000000e-9");
}
