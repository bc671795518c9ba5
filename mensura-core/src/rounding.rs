//! Rounding modes and result precision

use serde::{Deserialize, Serialize};

/// How a quotient is rounded when it is cut to a fixed number of places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero (truncation)
    #[default]
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
}

/// Number of fractional digits a result keeps
///
/// `Exact` keeps the shortest exact representation and refuses quotients
/// that never terminate. `Fixed` rounds to `scale` places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    #[default]
    Exact,
    Fixed { scale: u32, mode: RoundingMode },
}

impl Precision {
    /// Fixed scale, truncating
    pub const fn fixed(scale: u32) -> Self {
        Precision::Fixed { scale, mode: RoundingMode::Down }
    }

    /// Fixed scale with an explicit rounding mode
    pub const fn fixed_with(scale: u32, mode: RoundingMode) -> Self {
        Precision::Fixed { scale, mode }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Precision::Exact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RoundingMode::default(), RoundingMode::Down);
        assert_eq!(Precision::default(), Precision::Exact);
        assert!(Precision::default().is_exact());
    }

    #[test]
    fn test_fixed_truncates_by_default() {
        assert_eq!(
            Precision::fixed(2),
            Precision::Fixed { scale: 2, mode: RoundingMode::Down }
        );
        assert!(!Precision::fixed(0).is_exact());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RoundingMode::HalfEven).unwrap();
        assert_eq!(json, "\"half_even\"");

        let precision: Precision =
            serde_json::from_str(r#"{"fixed":{"scale":3,"mode":"half_up"}}"#).unwrap();
        assert_eq!(precision, Precision::fixed_with(3, RoundingMode::HalfUp));
    }
}
