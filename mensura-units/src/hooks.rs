//! Capability hooks: unit normalization and suffix formatting

use std::collections::HashMap;

use mensura_core::Decimal;
use crate::Measurement;

/// Canonicalizes unit spellings before they are looked up
pub trait NormalizeUnit: Send + Sync {
    fn normalize(&self, unit: &str) -> String;
}

/// Rewrites the unit suffix when a measurement is formatted
pub trait FormatSuffix: Send + Sync {
    fn format_suffix(
        &self,
        suffix: &str,
        value: &Decimal,
        unit: &str,
        measurement: &Measurement,
    ) -> String;
}

/// No-op hook: units and suffixes pass through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl NormalizeUnit for Identity {
    fn normalize(&self, unit: &str) -> String {
        unit.to_string()
    }
}

impl FormatSuffix for Identity {
    fn format_suffix(&self, suffix: &str, _: &Decimal, _: &str, _: &Measurement) -> String {
        suffix.to_string()
    }
}

impl<F> NormalizeUnit for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, unit: &str) -> String {
        self(unit)
    }
}

impl<F> FormatSuffix for F
where
    F: Fn(&str, &Decimal, &str, &Measurement) -> String + Send + Sync,
{
    fn format_suffix(
        &self,
        suffix: &str,
        value: &Decimal,
        unit: &str,
        measurement: &Measurement,
    ) -> String {
        self(suffix, value, unit, measurement)
    }
}

/// Case-insensitive alias lookup ("Hours" -> "h")
///
/// Input is trimmed, lower-cased and has inner whitespace collapsed before
/// the lookup; names without an alias come back in that folded form.
#[derive(Debug, Clone, Default)]
pub struct AliasNormalizer {
    aliases: HashMap<String, String>,
}

impl AliasNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: map `alias` to `canonical`
    pub fn alias(mut self, alias: &str, canonical: &str) -> Self {
        self.aliases.insert(fold(alias), canonical.to_string());
        self
    }

    /// Builder: map every name in `aliases` to `canonical`
    pub fn aliases(mut self, canonical: &str, aliases: &[&str]) -> Self {
        for alias in aliases {
            self.aliases.insert(fold(alias), canonical.to_string());
        }
        self
    }
}

impl NormalizeUnit for AliasNormalizer {
    fn normalize(&self, unit: &str) -> String {
        let folded = fold(unit);
        match self.aliases.get(&folded) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }
}

fn fold(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(Identity.normalize(" Min "), " Min ");
    }

    #[test]
    fn test_closure_normalizer() {
        let upper = |unit: &str| unit.to_uppercase();
        assert_eq!(upper.normalize("kg"), "KG");
    }

    #[test]
    fn test_alias_normalizer() {
        let normalizer = AliasNormalizer::new()
            .aliases("h", &["hour", "hours", "hr"])
            .alias("fluid  ounce", "fl oz");

        assert_eq!(normalizer.normalize("Hours"), "h");
        assert_eq!(normalizer.normalize("  HR "), "h");
        assert_eq!(normalizer.normalize("Fluid Ounce"), "fl oz");
        assert_eq!(normalizer.normalize("Parsec"), "parsec");
    }
}
