//! Unit definitions - static tables for the built-in quantity kinds

use std::sync::{Arc, LazyLock};

use mensura_core::Decimal;

use crate::hooks::AliasNormalizer;
use crate::{ExchangeRateTable, UnitSystem};

/// One row of a static unit table
pub struct UnitDef {
    pub symbol: &'static str,
    /// Rate as `unscaled * 10^-scale`
    pub rate: (i64, u32),
    pub aliases: &'static [&'static str],
}

const fn def(symbol: &'static str, rate: (i64, u32), aliases: &'static [&'static str]) -> UnitDef {
    UnitDef { symbol, rate, aliases }
}

pub const DURATION_UNITS: &[UnitDef] = &[
    def("w", (604_800, 0), &["week", "weeks", "wk", "wks"]),
    def("d", (86_400, 0), &["day", "days"]),
    def("h", (3_600, 0), &["hour", "hours", "hr", "hrs"]),
    def("min", (60, 0), &["minute", "minutes", "mins"]),
    def("s", (1, 0), &["second", "seconds", "sec", "secs"]),
];

pub const WEIGHT_UNITS: &[UnitDef] = &[
    def("t", (1_000, 0), &["tonne", "tonnes"]),
    def("kg", (1, 0), &["kilogram", "kilograms", "kilo", "kilos", "kgs"]),
    def("g", (1, 3), &["gram", "grams"]),
    def("mg", (1, 6), &["milligram", "milligrams"]),
];

pub const LENGTH_UNITS: &[UnitDef] = &[
    def("km", (1_000, 0), &["kilometer", "kilometers", "kilometre", "kilometres"]),
    def("m", (1, 0), &["meter", "meters", "metre", "metres"]),
    def("cm", (1, 2), &["centimeter", "centimeters", "centimetre", "centimetres"]),
    def("mm", (1, 3), &["millimeter", "millimeters", "millimetre", "millimetres"]),
];

static DURATION: LazyLock<Arc<UnitSystem>> =
    LazyLock::new(|| Arc::new(build("duration", DURATION_UNITS, "s", "s")));

static WEIGHT: LazyLock<Arc<UnitSystem>> =
    LazyLock::new(|| Arc::new(build("weight", WEIGHT_UNITS, "mg", "kg")));

static LENGTH: LazyLock<Arc<UnitSystem>> =
    LazyLock::new(|| Arc::new(build("length", LENGTH_UNITS, "mm", "m")));

/// Weeks down to seconds; atom and default unit `s`
pub fn duration() -> Arc<UnitSystem> {
    Arc::clone(&DURATION)
}

/// Tonnes down to milligrams; atom `mg`, default `kg`
pub fn weight() -> Arc<UnitSystem> {
    Arc::clone(&WEIGHT)
}

/// Kilometers down to millimeters; atom `mm`, default `m`
pub fn length() -> Arc<UnitSystem> {
    Arc::clone(&LENGTH)
}

fn build(name: &str, defs: &[UnitDef], atom_unit: &str, default_unit: &str) -> UnitSystem {
    let mut rates = ExchangeRateTable::new();
    let mut normalizer = AliasNormalizer::new();

    for unit in defs {
        let (unscaled, scale) = unit.rate;
        rates.insert(unit.symbol, Decimal::from_scaled(unscaled, scale));
        normalizer = normalizer.aliases(unit.symbol, unit.aliases);
    }

    UnitSystem::from_parts(name, rates, atom_unit, default_unit, normalizer)
}
