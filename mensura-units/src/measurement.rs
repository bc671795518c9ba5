//! Measurement type - a decimal magnitude tagged with a unit

use std::fmt;
use std::sync::Arc;

use mensura_core::{Decimal, MeasureError, Precision};
use tracing::{debug, trace};

use crate::decompose::{self, Breakdown};
use crate::format::{self, FormatOptions, Suffix};
use crate::parse::parse_composite;
use crate::{Result, UnitSystem};

/// A magnitude expressed in one unit of a unit system
///
/// Every operation returns a new measurement; the unit system is shared by
/// reference and forked on the first rate edit.
#[derive(Debug, Clone)]
pub struct Measurement {
    value: Decimal,
    unit: String,
    system: Arc<UnitSystem>,
}

impl Measurement {
    /// Create a measurement; `unit` defaults to the system's default unit
    pub fn new<V>(system: Arc<UnitSystem>, value: V, unit: Option<&str>) -> Result<Self>
    where
        V: TryInto<Decimal>,
        MeasureError: From<V::Error>,
    {
        let value: Decimal = value.try_into()?;
        let unit = match unit {
            Some(unit) => system.normalize(unit),
            None => system.default_unit().to_string(),
        };
        system.rate(&unit)?;
        Ok(Self { value, unit, system })
    }

    /// Zero in the system's default unit
    pub fn zero(system: Arc<UnitSystem>) -> Self {
        let unit = system.default_unit().to_string();
        Self { value: Decimal::zero(), unit, system }
    }

    pub(crate) fn from_parts(system: Arc<UnitSystem>, value: Decimal, unit: String) -> Self {
        Self { value, unit, system }
    }

    // ========== Accessors ==========

    pub fn value(&self) -> &Decimal {
        &self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn system(&self) -> &Arc<UnitSystem> {
        &self.system
    }

    pub fn atom_unit(&self) -> &str {
        self.system.atom_unit()
    }

    pub fn default_unit(&self) -> &str {
        self.system.default_unit()
    }

    pub fn base_unit(&self) -> Result<&str> {
        self.system.base_unit()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    // ========== Derivation ==========

    /// Same unit, new magnitude
    pub fn with_value<V>(&self, value: V) -> Result<Self>
    where
        V: TryInto<Decimal>,
        MeasureError: From<V::Error>,
    {
        Ok(self.relabeled(value.try_into()?, self.unit.clone()))
    }

    /// Same magnitude, new unit label. No scaling happens: this is only
    /// meaningful when both units share a rate or the value is zero.
    pub fn with_unit(&self, unit: &str) -> Self {
        self.relabeled(self.value.clone(), self.system.normalize(unit))
    }

    pub(crate) fn relabeled(&self, value: Decimal, unit: String) -> Self {
        Self::from_parts(Arc::clone(&self.system), value, unit)
    }

    // ========== Conversion ==========

    /// Exact conversion; fails on a non-terminating quotient
    pub fn convert_to(&self, target: &str) -> Result<Self> {
        self.convert_to_with(target, Precision::Exact)
    }

    pub fn convert_to_with(&self, target: &str, precision: Precision) -> Result<Self> {
        let target = self.system.normalize(target);
        if target == self.unit {
            return Ok(self.clone());
        }
        let value = self.system.convert_normalized(&self.value, &self.unit, &target, precision)?;
        Ok(self.relabeled(value, target))
    }

    /// Whole atom units, truncated
    pub fn convert_to_atom_unit(&self) -> Result<Self> {
        let atom = self.system.atom_unit().to_string();
        self.convert_to_with(&atom, Precision::fixed(0))
    }

    /// Whole base units, truncated
    pub fn convert_to_base_unit(&self) -> Result<Self> {
        let base = self.system.base_unit()?.to_string();
        self.convert_to_with(&base, Precision::fixed(0))
    }

    /// Whole default units, truncated
    pub fn convert_to_default_unit(&self) -> Result<Self> {
        let default = self.system.default_unit().to_string();
        self.convert_to_with(&default, Precision::fixed(0))
    }

    /// The magnitude in `unit`, without a unit attached
    pub fn to(&self, unit: &str, precision: Precision) -> Result<Decimal> {
        self.convert_to_with(unit, precision).map(|m| m.value)
    }

    /// Exact magnitude in `unit`
    pub fn to_unit(&self, unit: &str) -> Result<Decimal> {
        self.to(unit, Precision::Exact)
    }

    /// Resolve a `to<Unit>` accessor name ("toHours", "to_min") and apply it
    pub fn shortcut(&self, method: &str) -> Result<Decimal> {
        let unknown = || MeasureError::UnknownOperation(method.to_string());
        let rest = method
            .get(..2)
            .filter(|prefix| prefix.eq_ignore_ascii_case("to"))
            .map(|_| &method[2..])
            .ok_or_else(unknown)?;

        let key = squash(rest);
        if key.is_empty() {
            return Err(unknown());
        }

        let unit = self.system.units()
            .into_iter()
            .find(|unit| squash(unit) == key)
            .map(str::to_string)
            .or_else(|| {
                let normalized = self.system.normalize(&key);
                self.system.is_active(&normalized).then_some(normalized)
            })
            .ok_or_else(unknown)?;

        trace!(method, unit = %unit, "resolved shortcut");
        self.to_unit(&unit)
    }

    // ========== Arithmetic ==========

    /// Sum, expressed in the receiver's unit
    pub fn add(&self, other: &Measurement) -> Result<Self> {
        let other = self.system.convert_normalized(&other.value, &other.unit, &self.unit, Precision::Exact)?;
        Ok(self.relabeled(self.value.add(&other), self.unit.clone()))
    }

    /// Difference, expressed in the receiver's unit
    pub fn sub(&self, other: &Measurement) -> Result<Self> {
        let other = self.system.convert_normalized(&other.value, &other.unit, &self.unit, Precision::Exact)?;
        Ok(self.relabeled(self.value.sub(&other), self.unit.clone()))
    }

    // ========== Parsing ==========

    /// Parse a composite string ("1h 30min") into a new measurement
    ///
    /// Every term is converted to atom units with `precision` and summed;
    /// the total is then expressed in `as_unit`, falling back to the
    /// receiver's unit.
    pub fn with_parse(&self, text: &str, as_unit: Option<&str>, precision: Precision) -> Result<Self> {
        let atom = self.system.atom_unit().to_string();
        let mut total = Decimal::zero();

        for term in parse_composite(text)? {
            let literal = Decimal::parse_grouped(&term.literal)?;
            let unit = self.system.normalize(&term.unit);
            self.system.rate(&unit)?;
            let atoms = self.system.rescale(&literal, &unit, &atom, precision)?;
            total = total.add(&atoms);
        }

        let target = match as_unit {
            Some(unit) => self.system.normalize(unit),
            None => self.unit.clone(),
        };
        debug!(input = text, atoms = %total, target = %target, "parsed measurement");

        if target == atom {
            return Ok(self.relabeled(total, atom));
        }
        self.system.rate(&target)?;
        let value = self.system.rescale(&total, &atom, &target, precision)?;
        Ok(self.relabeled(value, target))
    }

    // ========== Decomposition ==========

    /// Split off the whole `unit`s: `(part, remainder)`
    pub fn extract(&self, unit: &str) -> Result<(Self, Self)> {
        decompose::extract(self, unit)
    }

    /// Greedy breakdown across `units` (all units when `None`)
    pub fn breakdown(&self, units: Option<&[&str]>) -> Result<Breakdown> {
        decompose::decompose(self, units)
    }

    /// Human-readable breakdown, e.g. "1h 1min 1s"
    ///
    /// `units` filters the candidates; order always follows the rate table,
    /// largest rate first.
    pub fn serialize(&self, units: Option<&[&str]>) -> Result<String> {
        let breakdown = self.breakdown(units)?;
        let parts: Vec<String> = breakdown.parts.iter().map(|part| part.to_string()).collect();

        let rendered = if parts.is_empty() {
            Measurement::zero(Arc::clone(&self.system)).to_string()
        } else {
            parts.join(" ")
        };
        debug!(value = %self.value, unit = %self.unit, rendered = %rendered, "serialized");
        Ok(rendered)
    }

    // ========== Formatting ==========

    pub fn format(&self, options: &FormatOptions<'_>) -> Result<String> {
        format::format(self, options)
    }

    // ========== Rate edits (copy-on-write) ==========

    /// Add or overwrite a rate on a private copy of the unit system
    pub fn with_rate(&self, unit: &str, rate: impl Into<Decimal>) -> Self {
        let mut next = self.clone();
        let unit = next.system.normalize(unit);
        Arc::make_mut(&mut next.system).rates_mut().insert(unit, rate.into());
        next
    }

    /// Like `with_rate`, but the unit moves to the front of the table
    pub fn with_prepended_rate(&self, unit: &str, rate: impl Into<Decimal>) -> Self {
        let mut next = self.clone();
        let unit = next.system.normalize(unit);
        Arc::make_mut(&mut next.system).rates_mut().prepend(unit, rate.into());
        next
    }

    /// Drop a rate. The receiver's own unit cannot be removed.
    pub fn without_rate(&self, unit: &str) -> Result<Self> {
        let unit = self.system.normalize(unit);
        if unit == self.unit || !self.system.rates().contains(&unit) {
            return Err(MeasureError::UnknownUnit(unit));
        }
        let mut next = self.clone();
        let system = Arc::make_mut(&mut next.system);
        system.rates_mut().remove(&unit);
        system.repair_units()?;
        Ok(next)
    }

    /// Restrict the units this measurement may use (`None` lifts it)
    pub fn with_available_units(&self, units: Option<&[&str]>) -> Self {
        let mut next = self.clone();
        let units = units.map(|units| units.iter().map(|u| next.system.normalize(u)).collect());
        Arc::make_mut(&mut next.system).set_available(units);
        next
    }
}

/// Lower-case, with separators removed: "Fl_Oz" -> "floz"
fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format::render(self, &Suffix::Unit, None))
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value == other.value
    }
}
