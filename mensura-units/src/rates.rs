//! Exchange rate table - unit name to rate, in insertion order

use serde::{Deserialize, Serialize};
use mensura_core::{Decimal, MeasureError};

/// Ordered mapping from unit name to exchange rate
///
/// A rate states how much one of the unit is worth relative to the other
/// units of the table; the unit whose rate is exactly 1 is the base unit.
/// Keys are expected to be normalized unit names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    entries: Vec<(String, Decimal)>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: insert a rate
    pub fn with_rate(mut self, unit: impl Into<String>, rate: impl Into<Decimal>) -> Self {
        self.insert(unit, rate.into());
        self
    }

    pub fn get(&self, unit: &str) -> Option<&Decimal> {
        self.position(unit).map(|i| &self.entries[i].1)
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.position(unit).is_some()
    }

    /// Insert a rate. An existing unit keeps its position.
    pub fn insert(&mut self, unit: impl Into<String>, rate: Decimal) {
        let unit = unit.into();
        match self.position(&unit) {
            Some(i) => self.entries[i].1 = rate,
            None => self.entries.push((unit, rate)),
        }
    }

    /// Insert a rate at the front, moving the unit there if it already exists
    pub fn prepend(&mut self, unit: impl Into<String>, rate: Decimal) {
        let unit = unit.into();
        if let Some(i) = self.position(&unit) {
            self.entries.remove(i);
        }
        self.entries.insert(0, (unit, rate));
    }

    pub fn remove(&mut self, unit: &str) -> Option<Decimal> {
        self.position(unit).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decimal)> {
        self.entries.iter().map(|(unit, rate)| (unit.as_str(), rate))
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(unit, _)| unit.as_str())
    }

    /// Entries ordered by rate, largest first. Equal rates keep table order.
    pub fn sorted_by_rate_desc(&self) -> Vec<(&str, &Decimal)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        sorted
    }

    /// The unit whose rate is exactly 1
    pub fn base_unit(&self) -> Result<&str, MeasureError> {
        let one = Decimal::one();
        self.iter()
            .find(|(_, rate)| **rate == one)
            .map(|(unit, _)| unit)
            .ok_or(MeasureError::NoBaseUnitFound)
    }

    /// The unit with the smallest rate (first one on ties)
    pub fn atom_unit(&self) -> Option<&str> {
        self.iter()
            .reduce(|best, next| if next.1 < best.1 { next } else { best })
            .map(|(unit, _)| unit)
    }

    /// Copy of the table holding only the listed units, in table order
    pub fn restricted_to<S: AsRef<str>>(&self, units: &[S]) -> Self {
        let entries = self.entries.iter()
            .filter(|(unit, _)| units.iter().any(|u| u.as_ref() == unit))
            .cloned()
            .collect();
        Self { entries }
    }

    fn position(&self, unit: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == unit)
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for ExchangeRateTable {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (unit, rate) in iter {
            table.insert(unit, rate);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn lengths() -> ExchangeRateTable {
        ExchangeRateTable::new()
            .with_rate("m", 1)
            .with_rate("km", 1000)
            .with_rate("mm", dec("0.001"))
            .with_rate("cm", dec("0.01"))
    }

    #[test]
    fn test_lookup() {
        let table = lengths();
        assert_eq!(table.get("km"), Some(&Decimal::from(1000)));
        assert!(table.contains("mm"));
        assert!(!table.contains("mi"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut table = lengths();
        table.insert("km", Decimal::from(999));
        assert_eq!(table.units().collect::<Vec<_>>(), vec!["m", "km", "mm", "cm"]);
        assert_eq!(table.get("km"), Some(&Decimal::from(999)));
    }

    #[test]
    fn test_prepend_moves_to_front() {
        let mut table = lengths();
        table.prepend("cm", dec("0.01"));
        table.prepend("dm", dec("0.1"));
        assert_eq!(table.units().collect::<Vec<_>>(), vec!["dm", "cm", "m", "km", "mm"]);
    }

    #[test]
    fn test_remove() {
        let mut table = lengths();
        assert_eq!(table.remove("km"), Some(Decimal::from(1000)));
        assert_eq!(table.remove("km"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_sorted_by_rate_desc() {
        let table = lengths().with_rate("klick", 1000);
        let order: Vec<_> = table.sorted_by_rate_desc().into_iter().map(|(u, _)| u).collect();
        assert_eq!(order, vec!["km", "klick", "m", "cm", "mm"]);
    }

    #[test]
    fn test_base_and_atom_units() {
        let table = lengths();
        assert_eq!(table.base_unit(), Ok("m"));
        assert_eq!(table.atom_unit(), Some("mm"));

        let no_base = table.restricted_to(&["km", "cm"]);
        assert_eq!(no_base.base_unit(), Err(MeasureError::NoBaseUnitFound));
        assert_eq!(ExchangeRateTable::new().atom_unit(), None);
    }

    #[test]
    fn test_restricted_keeps_table_order() {
        let table = lengths().restricted_to(&["cm", "m", "furlong"]);
        assert_eq!(table.units().collect::<Vec<_>>(), vec!["m", "cm"]);
    }

    #[test]
    fn test_from_iterator() {
        let table: ExchangeRateTable = vec![("s", Decimal::one()), ("min", Decimal::from(60))]
            .into_iter()
            .collect();
        assert_eq!(table.base_unit(), Ok("s"));
        assert_eq!(table.get("min"), Some(&Decimal::from(60)));
    }

    #[test]
    fn test_serde_keeps_order_and_rates() {
        let table = lengths();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains(r#"["mm","0.001"]"#));

        let restored: ExchangeRateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table);
        assert_eq!(restored.units().collect::<Vec<_>>(), vec!["m", "km", "mm", "cm"]);
    }
}
