//! Greedy decomposition of a magnitude into whole units

use mensura_core::{Decimal, Precision, RoundingMode};
use tracing::trace;

use crate::{Measurement, Result};

/// Result of a decomposition: the non-zero whole parts, largest unit first,
/// and whatever did not fit into any of them (in the atom unit)
#[derive(Debug, Clone)]
pub struct Breakdown {
    pub parts: Vec<Measurement>,
    pub remainder: Measurement,
}

/// Split `measurement` into whole `unit`s and the remainder
///
/// The whole part is truncated toward zero, so for negative magnitudes both
/// the part and the remainder are negative. The remainder stays in the
/// measurement's own unit.
pub fn extract(measurement: &Measurement, unit: &str) -> Result<(Measurement, Measurement)> {
    let system = measurement.system();
    let unit = system.normalize(unit);
    system.rate(&unit)?;
    split(measurement, unit)
}

/// `extract` for an already validated unit; the measurement's own unit is
/// looked up in the full table, so atom-unit working values stay usable
/// when the atom unit is not available.
fn split(measurement: &Measurement, unit: String) -> Result<(Measurement, Measurement)> {
    let system = measurement.system();

    // One `unit` expressed in the measurement's unit
    let rate = system.rescale(&Decimal::one(), &unit, measurement.unit(), Precision::Exact)?;
    let whole = measurement.value().div_with_scale(&rate, 0, RoundingMode::Down)?;
    let remainder = measurement.value().sub(&whole.mul(&rate));

    trace!(unit = %unit, %whole, %remainder, "extracted");
    Ok((
        measurement.relabeled(whole, unit),
        measurement.relabeled(remainder, measurement.unit().to_string()),
    ))
}

/// Walk the active units from the largest rate down, extracting each one
/// from the atom-unit magnitude of `measurement`
///
/// `units`, when given, only filters the candidates (unknown names are
/// ignored); it does not change their order.
pub fn decompose(measurement: &Measurement, units: Option<&[&str]>) -> Result<Breakdown> {
    let system = measurement.system();
    let wanted: Option<Vec<String>> = units.map(|units| units.iter().map(|u| system.normalize(u)).collect());

    let candidates: Vec<&str> = system.units_by_rate_desc()
        .into_iter()
        .filter(|unit| wanted.as_ref().map_or(true, |wanted| wanted.iter().any(|w| w == unit)))
        .collect();

    let atom = system.atom_unit().to_string();
    let atoms = system.rescale(measurement.value(), measurement.unit(), &atom, Precision::fixed(0))?;
    let mut remainder = measurement.relabeled(atoms, atom);
    let mut parts = Vec::new();

    for unit in candidates {
        let (part, rest) = split(&remainder, unit.to_string())?;
        remainder = rest;
        if !part.is_zero() {
            parts.push(part);
        }
    }

    Ok(Breakdown { parts, remainder })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units;

    fn measure(value: &str, unit: &str) -> Measurement {
        units::length().measure(value, Some(unit)).unwrap()
    }

    #[test]
    fn test_extract_in_non_atom_unit() {
        let (part, rest) = extract(&measure("2.5", "km"), "m").unwrap();
        assert_eq!(part.value(), &Decimal::from(2500));
        assert_eq!(part.unit(), "m");
        assert!(rest.is_zero());
        assert_eq!(rest.unit(), "km");
    }

    #[test]
    fn test_extract_keeps_fractional_remainder() {
        let (part, rest) = extract(&measure("2.5", "m"), "m").unwrap();
        assert_eq!(part.value(), &Decimal::from(2));
        assert_eq!(rest.value(), &"0.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_extract_unknown_unit() {
        assert!(extract(&measure("1", "m"), "league").is_err());
    }

    #[test]
    fn test_decompose_parts_and_remainder() {
        let breakdown = decompose(&measure("1234.5678", "m"), None).unwrap();
        let rendered: Vec<String> = breakdown.parts.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["1km", "234m", "56cm", "7mm"]);
        assert!(breakdown.remainder.is_zero());
        assert_eq!(breakdown.remainder.unit(), "mm");
    }

    #[test]
    fn test_decompose_filtered_remainder() {
        let breakdown = decompose(&measure("1234.5678", "m"), Some(&["km", "cm"])).unwrap();
        let rendered: Vec<String> = breakdown.parts.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["1km", "23456cm"]);
        assert_eq!(breakdown.remainder.value(), &Decimal::from(7));
    }

    #[test]
    fn test_decompose_with_atom_unit_unavailable() {
        let m = measure("1.5", "m").with_available_units(Some(&["m", "cm"][..]));
        let breakdown = decompose(&m, None).unwrap();
        let rendered: Vec<String> = breakdown.parts.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["1m", "50cm"]);
        assert!(breakdown.remainder.is_zero());
        assert_eq!(breakdown.remainder.unit(), "mm");

        assert!(extract(&m, "mm").is_err());
    }
}
