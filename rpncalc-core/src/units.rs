// Unit conversion engine
//
// Linear units convert through their category's base unit: amount * from / to.
// Temperature has no single factor, so it routes through Celsius instead.

use crate::math;
use crate::value::{CalcError, Decimal, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Length,
    Mass,
    Temperature,
    Time,
    Volume,
    Angle,
    Percentage,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Length => "length",
            Category::Mass => "mass",
            Category::Temperature => "temperature",
            Category::Time => "time",
            Category::Volume => "volume",
            Category::Angle => "angle",
            Category::Percentage => "percentage",
        };
        write!(f, "{}", name)
    }
}

/// A unit's category and its factor relative to the category's base unit.
/// Temperature units have no factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFactor {
    pub category: Category,
    pub factor: Option<Decimal>,
}

// (symbol, category, factor to base unit)
const UNIT_TABLE: &[(&str, Category, Option<&str>)] = &[
    // Length (base: meter)
    ("mm", Category::Length, Some("0.001")),
    ("cm", Category::Length, Some("0.01")),
    ("m", Category::Length, Some("1")),
    ("km", Category::Length, Some("1000")),
    ("in", Category::Length, Some("0.0254")),
    ("ft", Category::Length, Some("0.3048")),
    ("yd", Category::Length, Some("0.9144")),
    ("mi", Category::Length, Some("1609.344")),
    // Mass (base: kilogram)
    ("mg", Category::Mass, Some("0.000001")),
    ("g", Category::Mass, Some("0.001")),
    ("kg", Category::Mass, Some("1")),
    ("oz", Category::Mass, Some("0.028349523125")),
    ("lb", Category::Mass, Some("0.45359237")),
    ("ton", Category::Mass, Some("907.18474")),
    ("tonne", Category::Mass, Some("1000")),
    // Temperature
    ("c", Category::Temperature, None),
    ("f", Category::Temperature, None),
    ("k", Category::Temperature, None),
    // Time (base: second)
    ("ms", Category::Time, Some("0.001")),
    ("s", Category::Time, Some("1")),
    ("min", Category::Time, Some("60")),
    ("hr", Category::Time, Some("3600")),
    ("day", Category::Time, Some("86400")),
    ("week", Category::Time, Some("604800")),
    // Volume (base: liter)
    ("ml", Category::Volume, Some("0.001")),
    ("l", Category::Volume, Some("1")),
    ("gal", Category::Volume, Some("3.785411784")),
    ("qt", Category::Volume, Some("0.946352946")),
    ("pt", Category::Volume, Some("0.473176473")),
    ("cup", Category::Volume, Some("0.2365882365")),
    ("floz", Category::Volume, Some("0.0295735295625")),
    // Angle (base: radian)
    ("rad", Category::Angle, Some("1")),
    (
        "deg",
        Category::Angle,
        Some("0.01745329251994329576923690768488612713442871888542"),
    ),
    // Percentage (unitless)
    ("num", Category::Percentage, Some("1")),
    ("percent", Category::Percentage, Some("0.01")),
    ("%", Category::Percentage, Some("0.01")),
];

fn table() -> &'static HashMap<&'static str, ConversionFactor> {
    static TABLE: OnceLock<HashMap<&'static str, ConversionFactor>> = OnceLock::new();
    TABLE.get_or_init(|| {
        UNIT_TABLE
            .iter()
            .map(|(symbol, category, factor)| {
                let factor = factor.and_then(|f| Decimal::from_str(f).ok());
                (
                    *symbol,
                    ConversionFactor {
                        category: *category,
                        factor,
                    },
                )
            })
            .collect()
    })
}

/// Look up a unit symbol, ignoring case.
pub fn lookup(symbol: &str) -> Result<&'static ConversionFactor> {
    table()
        .get(symbol.to_lowercase().as_str())
        .ok_or_else(|| CalcError::UnknownUnit(symbol.to_string()))
}

/// All known symbols grouped by category, in table order.
pub fn symbols_by_category() -> Vec<(Category, Vec<&'static str>)> {
    let mut groups: Vec<(Category, Vec<&'static str>)> = Vec::new();
    for (symbol, category, _) in UNIT_TABLE {
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, symbols)) => symbols.push(*symbol),
            None => groups.push((*category, vec![*symbol])),
        }
    }
    groups
}

/// Convert `amount` between two units of the same category.
pub fn convert(amount: &Decimal, from: &str, to: &str) -> Result<Decimal> {
    let source = lookup(from)?;
    let target = lookup(to)?;
    if source.category != target.category {
        return Err(CalcError::IncompatibleUnits {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    match (&source.factor, &target.factor) {
        (Some(from_factor), Some(to_factor)) => math::divide(&(amount * from_factor), to_factor),
        _ => convert_temperature(amount, &from.to_lowercase(), &to.to_lowercase()),
    }
}

fn convert_temperature(amount: &Decimal, from: &str, to: &str) -> Result<Decimal> {
    let freezing_offset = Decimal::from(32);
    let kelvin_offset = Decimal::new(27315.into(), 2);

    let celsius = match from {
        "f" => math::divide(&((amount - &freezing_offset) * Decimal::from(5)), &Decimal::from(9))?,
        "k" => amount - &kelvin_offset,
        "c" => amount.clone(),
        other => return Err(CalcError::UnknownUnit(other.to_string())),
    };

    match to {
        "f" => Ok(math::divide(&(&celsius * Decimal::from(9)), &Decimal::from(5))? + freezing_offset),
        "k" => Ok(celsius + kelvin_offset),
        "c" => Ok(celsius),
        other => Err(CalcError::UnknownUnit(other.to_string())),
    }
}
