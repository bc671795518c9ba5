//! Mensura Units - Measurements over exchange-rate tables
//!
//! A `Measurement` is an exact decimal tagged with a unit of a `UnitSystem`.
//! Conversion goes through the system's exchange rates; composite strings
//! such as "1h 30min" are parsed by summing every term in the atom unit, and
//! `serialize` turns a magnitude back into a breakdown like "1h 1min 1s".
//!
//! Built-in systems:
//! - Duration (w, d, h, min, s)
//! - Weight (t, kg, g, mg)
//! - Length (km, m, cm, mm)

mod rates;
mod system;
mod measurement;
mod parse;
mod decompose;
mod format;
pub mod hooks;
pub mod units;

pub use rates::ExchangeRateTable;
pub use system::UnitSystem;
pub use measurement::Measurement;
pub use parse::{parse_composite, Term};
pub use decompose::{decompose, extract, Breakdown};
pub use format::{FormatOptions, Suffix, ValueFormatter};
pub use hooks::{AliasNormalizer, FormatSuffix, Identity, NormalizeUnit};

pub use mensura_core::{Decimal, MeasureError, Precision, RoundingMode};

pub type Result<T> = std::result::Result<T, MeasureError>;
