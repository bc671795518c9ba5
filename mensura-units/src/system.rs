//! Unit systems - a rate table plus the rules for one quantity kind

use std::fmt;
use std::sync::Arc;

use mensura_core::{Decimal, MeasureError, Precision};
use tracing::trace;

use crate::hooks::{FormatSuffix, Identity, NormalizeUnit};
use crate::{ExchangeRateTable, Measurement, Result};

/// Everything a measurement needs to know about its quantity kind
///
/// Shared by reference between measurements; edits go through
/// `Arc::make_mut`, so holders of older snapshots never see them.
#[derive(Clone)]
pub struct UnitSystem {
    name: String,
    rates: ExchangeRateTable,
    atom_unit: String,
    default_unit: String,
    available: Option<Vec<String>>,
    normalizer: Arc<dyn NormalizeUnit>,
    suffix_formatter: Option<Arc<dyn FormatSuffix>>,
}

impl UnitSystem {
    /// Create a unit system over `rates`
    ///
    /// The atom unit is the unit with the smallest rate; the default unit is
    /// the base unit when the table has one, the atom unit otherwise.
    pub fn new(name: &str, rates: ExchangeRateTable) -> Result<Self> {
        let atom_unit = rates.atom_unit().ok_or(MeasureError::EmptyRateTable)?.to_string();
        let default_unit = rates.base_unit().map(str::to_string).unwrap_or_else(|_| atom_unit.clone());

        Ok(Self {
            name: name.to_string(),
            rates,
            atom_unit,
            default_unit,
            available: None,
            normalizer: Arc::new(Identity),
            suffix_formatter: None,
        })
    }

    /// Builder: override the atom unit
    pub fn with_atom_unit(mut self, unit: &str) -> Result<Self> {
        self.atom_unit = self.known_unit(unit)?;
        Ok(self)
    }

    /// Builder: override the default unit
    pub fn with_default_unit(mut self, unit: &str) -> Result<Self> {
        self.default_unit = self.known_unit(unit)?;
        Ok(self)
    }

    /// Builder: restrict operations to a subset of the rate table
    pub fn with_available_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let units: Vec<String> = units
            .into_iter()
            .map(|unit| {
                let unit: String = unit.into();
                self.normalize(&unit)
            })
            .collect();
        self.available = Some(units);
        self
    }

    /// Builder: lift the available-unit restriction
    pub fn with_all_units(mut self) -> Self {
        self.available = None;
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl NormalizeUnit + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn with_suffix_formatter(mut self, formatter: impl FormatSuffix + 'static) -> Self {
        self.suffix_formatter = Some(Arc::new(formatter));
        self
    }

    // ========== Accessors ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atom_unit(&self) -> &str {
        &self.atom_unit
    }

    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// The full rate table, ignoring the available-unit restriction
    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    pub fn available_units(&self) -> Option<&[String]> {
        self.available.as_deref()
    }

    pub fn suffix_formatter(&self) -> Option<&dyn FormatSuffix> {
        self.suffix_formatter.as_deref()
    }

    pub fn normalize(&self, unit: &str) -> String {
        self.normalizer.normalize(unit)
    }

    /// Whether `unit` (already normalized) is usable in this system
    pub fn is_active(&self, unit: &str) -> bool {
        self.rates.contains(unit)
            && self.available.as_ref().map_or(true, |units| units.iter().any(|u| u == unit))
    }

    /// Active units in table order
    pub fn units(&self) -> Vec<&str> {
        self.rates.units().filter(|unit| self.is_active(unit)).collect()
    }

    /// Active units, largest rate first
    pub fn units_by_rate_desc(&self) -> Vec<&str> {
        self.rates.sorted_by_rate_desc()
            .into_iter()
            .map(|(unit, _)| unit)
            .filter(|unit| self.is_active(unit))
            .collect()
    }

    /// Rate of an active unit
    pub fn rate(&self, unit: &str) -> Result<&Decimal> {
        match self.rates.get(unit) {
            Some(rate) if self.is_active(unit) => Ok(rate),
            _ => Err(MeasureError::UnknownUnit(unit.to_string())),
        }
    }

    /// The active unit whose rate is exactly 1
    pub fn base_unit(&self) -> Result<&str> {
        let one = Decimal::one();
        self.rates.iter()
            .find(|(unit, rate)| **rate == one && self.is_active(unit))
            .map(|(unit, _)| unit)
            .ok_or(MeasureError::NoBaseUnitFound)
    }

    /// Accessor names of the form `to_<unit>`, one per active unit
    pub fn shortcuts(&self) -> Vec<String> {
        self.units()
            .into_iter()
            .map(|unit| format!("to_{}", unit.replace(' ', "_")))
            .collect()
    }

    // ========== Conversion ==========

    /// Convert a raw value between two units of this system
    pub fn convert<V>(&self, value: V, from: &str, to: &str, precision: Precision) -> Result<Decimal>
    where
        V: TryInto<Decimal>,
        MeasureError: From<V::Error>,
    {
        let value: Decimal = value.try_into()?;
        let from = self.normalize(from);
        let to = self.normalize(to);
        if from == to {
            self.rate(&from)?;
            return Ok(value);
        }
        self.convert_normalized(&value, &from, &to, precision)
    }

    /// `value * rate(from) / rate(to)`, with both units already normalized
    pub(crate) fn convert_normalized(
        &self,
        value: &Decimal,
        from: &str,
        to: &str,
        precision: Precision,
    ) -> Result<Decimal> {
        self.rate(from)?;
        self.rate(to)?;
        self.rescale(value, from, to, precision)
    }

    /// Same as `convert_normalized`, but against the full rate table
    ///
    /// Used where the atom unit is an internal working unit that the
    /// available-unit restriction must not hide.
    pub(crate) fn rescale(
        &self,
        value: &Decimal,
        from: &str,
        to: &str,
        precision: Precision,
    ) -> Result<Decimal> {
        let unknown = |unit: &str| MeasureError::UnknownUnit(unit.to_string());
        let from_rate = self.rates.get(from).ok_or_else(|| unknown(from))?;
        let to_rate = self.rates.get(to).ok_or_else(|| unknown(to))?;

        if value.is_zero() {
            return Ok(Decimal::zero());
        }

        let converted = value.mul(from_rate).div(to_rate, precision)?;
        trace!(system = %self.name, %value, from, to, %converted, "converted");
        Ok(converted)
    }

    // ========== Parsing ==========

    /// Parse a composite string into a measurement
    ///
    /// The result is expressed in `as_unit`, or the default unit when none
    /// is given.
    pub fn parse(self: &Arc<Self>, text: &str, as_unit: Option<&str>, precision: Precision) -> Result<Measurement> {
        Measurement::zero(Arc::clone(self)).with_parse(text, as_unit, precision)
    }

    /// Parse a composite string and return only the magnitude
    pub fn parse_to_value(self: &Arc<Self>, text: &str, as_unit: Option<&str>, precision: Precision) -> Result<Decimal> {
        self.parse(text, as_unit, precision).map(|m| m.value().clone())
    }

    /// Create a measurement in this system
    pub fn measure<V>(self: &Arc<Self>, value: V, unit: Option<&str>) -> Result<Measurement>
    where
        V: TryInto<Decimal>,
        MeasureError: From<V::Error>,
    {
        Measurement::new(Arc::clone(self), value, unit)
    }

    // ========== Crate-internal editing ==========

    /// Build from trusted static data
    pub(crate) fn from_parts(
        name: &str,
        rates: ExchangeRateTable,
        atom_unit: &str,
        default_unit: &str,
        normalizer: impl NormalizeUnit + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            rates,
            atom_unit: atom_unit.to_string(),
            default_unit: default_unit.to_string(),
            available: None,
            normalizer: Arc::new(normalizer),
            suffix_formatter: None,
        }
    }

    pub(crate) fn rates_mut(&mut self) -> &mut ExchangeRateTable {
        &mut self.rates
    }

    pub(crate) fn set_available(&mut self, units: Option<Vec<String>>) {
        self.available = units;
    }

    /// Re-derive atom and default units after a rate was removed
    pub(crate) fn repair_units(&mut self) -> Result<()> {
        if !self.rates.contains(&self.atom_unit) {
            self.atom_unit = self.rates.atom_unit().ok_or(MeasureError::EmptyRateTable)?.to_string();
        }
        if !self.rates.contains(&self.default_unit) {
            self.default_unit = self.rates.base_unit()
                .map(str::to_string)
                .unwrap_or_else(|_| self.atom_unit.clone());
        }
        Ok(())
    }

    fn known_unit(&self, unit: &str) -> Result<String> {
        let unit = self.normalize(unit);
        if self.rates.contains(&unit) {
            Ok(unit)
        } else {
            Err(MeasureError::UnknownUnit(unit))
        }
    }
}

impl fmt::Debug for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitSystem")
            .field("name", &self.name)
            .field("rates", &self.rates)
            .field("atom_unit", &self.atom_unit)
            .field("default_unit", &self.default_unit)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}
