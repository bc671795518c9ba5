//! Exact decimal numbers using dashu
//!
//! Uses dashu-ratio (RBig) so that sums, products and terminating quotients
//! are exact. A `Decimal` only ever holds a value with a finite decimal
//! expansion: division either proves the quotient terminates or rounds it
//! to an explicit scale.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{Precision, RoundingMode};

/// Error type for decimal operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Non-terminating decimal expansion: {dividend} / {divisor}")]
    NonTerminating { dividend: String, divisor: String },
}

/// Largest decimal exponent accepted by the parser ("1e5000")
const MAX_EXPONENT: u64 = 4096;

/// Arbitrary precision decimal number
///
/// All operations return Results or new Decimals - never panic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal {
    inner: RBig,
}

impl Decimal {
    // ========== Construction ==========

    pub fn zero() -> Self {
        Self { inner: RBig::ZERO }
    }

    pub fn one() -> Self {
        Self { inner: RBig::ONE }
    }

    /// Create from i64
    pub fn from_i64(n: i64) -> Self {
        Self { inner: RBig::from(IBig::from(n)) }
    }

    /// Create from an unscaled integer and a scale: `unscaled * 10^-scale`
    pub fn from_scaled(unscaled: i64, scale: u32) -> Self {
        Self { inner: RBig::from_parts(IBig::from(unscaled), pow10(scale as usize)) }
    }

    /// Parse a literal that may carry thousands separators ("1,234.5")
    pub fn parse_grouped(s: &str) -> Result<Self, NumberError> {
        let stripped: String = s.chars().filter(|c| *c != ',').collect();
        stripped.parse().map_err(|_| NumberError::ParseError(s.to_string()))
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        *self.inner.numerator() == IBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        *self.inner.numerator() < IBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        *self.inner.denominator() == UBig::ONE
    }

    // ========== Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    pub fn neg(&self) -> Self {
        let num = -self.inner.numerator().clone();
        Self { inner: RBig::from_parts(num, self.inner.denominator().clone()) }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() { self.neg() } else { self.clone() }
    }

    /// Exact division. Fails when the quotient has no finite decimal expansion.
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let quotient = &self.inner / &other.inner;
        if terminating_scale(quotient.denominator()).is_none() {
            return Err(NumberError::NonTerminating {
                dividend: self.to_string(),
                divisor: other.to_string(),
            });
        }
        Ok(Self { inner: quotient })
    }

    /// Division rounded to `scale` fractional digits
    pub fn div_with_scale(
        &self,
        other: &Self,
        scale: u32,
        mode: RoundingMode,
    ) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let quotient = Self { inner: &self.inner / &other.inner };
        Ok(quotient.round(scale, mode))
    }

    /// Division under the given precision
    pub fn div(&self, other: &Self, precision: Precision) -> Result<Self, NumberError> {
        match precision {
            Precision::Exact => self.checked_div(other),
            Precision::Fixed { scale, mode } => self.div_with_scale(other, scale, mode),
        }
    }

    // ========== Rounding ==========

    /// Round to `scale` fractional digits
    pub fn round(&self, scale: u32, mode: RoundingMode) -> Self {
        let factor = pow10(scale as usize);
        let (num, den) = self.parts();
        let unscaled = round_quotient(&(num * IBig::from(factor.clone())), &den, mode);
        Self { inner: RBig::from_parts(unscaled, factor) }
    }

    /// Integer part, truncated toward zero
    pub fn trunc(&self) -> Self {
        self.round(0, RoundingMode::Down)
    }

    /// Apply a precision: fixed scales round, `Exact` is a no-op
    pub fn with_precision(&self, precision: Precision) -> Self {
        match precision {
            Precision::Exact => self.clone(),
            Precision::Fixed { scale, mode } => self.round(scale, mode),
        }
    }

    // ========== Conversion ==========

    /// Number of fractional digits in the shortest exact representation
    pub fn scale(&self) -> u32 {
        terminating_scale(self.inner.denominator()).unwrap_or(0) as u32
    }

    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        self.inner.numerator().clone().try_into().ok()
    }

    // ========== Display ==========

    /// Render with exactly `scale` fractional digits
    pub fn to_fixed(&self, scale: u32, mode: RoundingMode) -> String {
        let factor = IBig::from(pow10(scale as usize));
        let (num, den) = self.parts();
        let unscaled = round_quotient(&(num * factor), &den, mode);
        render_scaled(&unscaled, scale as usize)
    }

    /// Render with trailing fractional zeros stripped
    pub fn to_plain_string(&self) -> String {
        match terminating_scale(self.inner.denominator()) {
            Some(scale) => self.to_fixed(scale as u32, RoundingMode::Down),
            // Unreachable through the public API; keep something readable.
            None => strip_trailing_zeros(self.to_fixed(32, RoundingMode::HalfEven)),
        }
    }

    fn parts(&self) -> (IBig, IBig) {
        (
            self.inner.numerator().clone(),
            IBig::from(self.inner.denominator().clone()),
        )
    }
}

// ========== Helpers ==========

fn pow10(exp: usize) -> UBig {
    UBig::from(10u8).pow(exp)
}

/// Smallest k with `den | 10^k`, if the expansion terminates at all
fn terminating_scale(den: &UBig) -> Option<usize> {
    let two = UBig::from(2u8);
    let five = UBig::from(5u8);
    let mut rest = den.clone();
    let mut twos = 0;
    let mut fives = 0;

    while &rest % &two == UBig::ZERO {
        rest = &rest / &two;
        twos += 1;
    }
    while &rest % &five == UBig::ZERO {
        rest = &rest / &five;
        fives += 1;
    }

    (rest == UBig::ONE).then_some(twos.max(fives))
}

fn abs_int(value: IBig) -> IBig {
    if value < IBig::ZERO { -value } else { value }
}

/// Integer quotient `num / den` (den > 0) rounded under `mode`
fn round_quotient(num: &IBig, den: &IBig, mode: RoundingMode) -> IBig {
    let quotient = num / den;
    let remainder = num.clone() - quotient.clone() * den.clone();
    if remainder == IBig::ZERO {
        return quotient;
    }

    let positive = *num > IBig::ZERO;
    let increment = match mode {
        RoundingMode::Down => false,
        RoundingMode::Up => true,
        RoundingMode::Ceiling => positive,
        RoundingMode::Floor => !positive,
        RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
            let twice = abs_int(remainder) * IBig::from(2);
            match twice.cmp(den) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => match mode {
                    RoundingMode::HalfUp => true,
                    RoundingMode::HalfDown => false,
                    _ => quotient.clone() % IBig::from(2) != IBig::ZERO,
                },
            }
        }
    };

    match (increment, positive) {
        (false, _) => quotient,
        (true, true) => quotient + IBig::ONE,
        (true, false) => quotient - IBig::ONE,
    }
}

/// Place a decimal point `scale` digits from the right of `unscaled`
fn render_scaled(unscaled: &IBig, scale: usize) -> String {
    let negative = *unscaled < IBig::ZERO;
    let digits = abs_int(unscaled.clone()).to_string();
    let sign = if negative { "-" } else { "" };

    if scale == 0 {
        return format!("{}{}", sign, digits);
    }

    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, int_part, frac_part)
}

fn strip_trailing_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Supports: "123", "-3.14", ".5", "1.5e3", "25E-2"
fn parse_decimal(s: &str) -> Result<RBig, NumberError> {
    let err = || NumberError::ParseError(s.to_string());
    let trimmed = s.trim();

    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => {
            let exp: i64 = body[pos + 1..].parse().map_err(|_| err())?;
            if exp.unsigned_abs() > MAX_EXPONENT {
                return Err(err());
            }
            (&body[..pos], exp)
        }
        None => (body, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(err());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let digits = format!("{}{}", int_part, frac_part);
    let digits = match digits.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    let significand: UBig = digits.parse().map_err(|_| err())?;
    let mut numerator = IBig::from(significand);
    if negative {
        numerator = -numerator;
    }

    let scale = frac_part.len() as i64 - exponent;
    let value = if scale >= 0 {
        RBig::from_parts(numerator, pow10(scale as usize))
    } else {
        RBig::from_parts(numerator * IBig::from(pow10((-scale) as usize)), UBig::ONE)
    };
    Ok(value)
}

// ========== Trait Implementations ==========

impl FromStr for Decimal {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).map(|inner| Self { inner })
    }
}

impl TryFrom<&str> for Decimal {
    type Error = NumberError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Decimal {
    type Error = NumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<i32> for Decimal {
    fn from(n: i32) -> Self {
        Self::from_i64(n.into())
    }
}

impl From<u32> for Decimal {
    fn from(n: u32) -> Self {
        Self::from_i64(n.into())
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Self {
        Self { inner: RBig::from(IBig::from(n)) }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(dec("123").to_i64(), Some(123));
        assert_eq!(dec("-3.14").to_string(), "-3.14");
        assert_eq!(dec("+.5").to_string(), "0.5");
        assert_eq!(dec("1.5e3").to_i64(), Some(1500));
        assert_eq!(dec("25E-2").to_string(), "0.25");
        assert_eq!(dec("007.100").to_string(), "7.1");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", ".", "-", "1,234", "1.2.3", "abc", "1e", "1e99999", "--1"] {
            assert!(input.parse::<Decimal>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_parse_grouped() {
        assert_eq!(Decimal::parse_grouped("1,234.5").unwrap(), dec("1234.5"));
        assert_eq!(Decimal::parse_grouped("500,000").unwrap().to_i64(), Some(500000));
        assert!(Decimal::parse_grouped("1,2a").is_err());
    }

    #[test]
    fn test_equality_ignores_representation() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert_eq!(dec("1e2"), Decimal::from(100));
        assert_eq!(Decimal::from_scaled(1500, 3), dec("1.5"));
        assert!(dec("0.1") < dec("0.25"));
    }

    #[test]
    fn test_arithmetic() {
        let a = dec("0.1");
        let b = dec("0.2");
        assert_eq!(a.add(&b), dec("0.3"));
        assert_eq!(a.sub(&b), dec("-0.1"));
        assert_eq!(a.mul(&b), dec("0.02"));
        assert_eq!(dec("-2.5").abs(), dec("2.5"));
        assert_eq!(dec("2.5").neg(), dec("-2.5"));
    }

    #[test]
    fn test_checked_div_terminating() {
        assert_eq!(dec("1").checked_div(&dec("8")).unwrap(), dec("0.125"));
        assert_eq!(dec("5400").checked_div(&dec("60")).unwrap(), Decimal::from(90));
    }

    #[test]
    fn test_checked_div_non_terminating() {
        let err = dec("1").checked_div(&dec("3")).unwrap_err();
        assert!(matches!(err, NumberError::NonTerminating { .. }));
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(dec("1").checked_div(&Decimal::zero()), Err(NumberError::DivisionByZero));
        assert!(dec("1").div_with_scale(&Decimal::zero(), 2, RoundingMode::Down).is_err());
    }

    #[test]
    fn test_div_with_scale() {
        let third = dec("1").div_with_scale(&dec("3"), 4, RoundingMode::Down).unwrap();
        assert_eq!(third, dec("0.3333"));

        let two_thirds = dec("2").div(&dec("3"), Precision::fixed_with(2, RoundingMode::HalfUp));
        assert_eq!(two_thirds.unwrap(), dec("0.67"));
    }

    #[test]
    fn test_rounding_modes() {
        let cases = [
            ("2.5", RoundingMode::Up, "3"),
            ("2.5", RoundingMode::Down, "2"),
            ("2.5", RoundingMode::Ceiling, "3"),
            ("2.5", RoundingMode::Floor, "2"),
            ("2.5", RoundingMode::HalfUp, "3"),
            ("2.5", RoundingMode::HalfDown, "2"),
            ("2.5", RoundingMode::HalfEven, "2"),
            ("3.5", RoundingMode::HalfEven, "4"),
            ("-2.5", RoundingMode::Up, "-3"),
            ("-2.5", RoundingMode::Down, "-2"),
            ("-2.5", RoundingMode::Ceiling, "-2"),
            ("-2.5", RoundingMode::Floor, "-3"),
            ("-2.5", RoundingMode::HalfUp, "-3"),
            ("-2.6", RoundingMode::HalfDown, "-3"),
            ("-2.4", RoundingMode::HalfUp, "-2"),
        ];
        for (input, mode, expected) in cases {
            assert_eq!(dec(input).round(0, mode), dec(expected), "{} {:?}", input, mode);
        }
    }

    #[test]
    fn test_trunc_is_toward_zero() {
        assert_eq!(dec("1.99").trunc(), Decimal::from(1));
        assert_eq!(dec("-1.99").trunc(), Decimal::from(-1));
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(dec("1.5").to_fixed(3, RoundingMode::Down), "1.500");
        assert_eq!(dec("1.2345").to_fixed(2, RoundingMode::HalfUp), "1.23");
        assert_eq!(dec("-0.004").to_fixed(2, RoundingMode::HalfUp), "0.00");
        assert_eq!(dec("-0.05").to_fixed(1, RoundingMode::Down), "0.0");
        assert_eq!(dec("-0.15").to_fixed(1, RoundingMode::Down), "-0.1");
        assert_eq!(dec("0.05").to_fixed(0, RoundingMode::Down), "0");
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        assert_eq!(dec("1.2300").to_string(), "1.23");
        assert_eq!(dec("100").to_string(), "100");
        assert_eq!(dec("-0.001").to_string(), "-0.001");
        assert_eq!(Decimal::zero().to_string(), "0");
    }

    #[test]
    fn test_scale_and_integer() {
        assert_eq!(dec("1.125").scale(), 3);
        assert_eq!(dec("42").scale(), 0);
        assert!(dec("42.0").is_integer());
        assert_eq!(dec("42.5").to_i64(), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let value = dec("1234.5");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"1234.5\"");
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert!(serde_json::from_str::<Decimal>("\"nope\"").is_err());
    }
}
