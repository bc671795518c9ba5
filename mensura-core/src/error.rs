//! Structured errors for measurement operations
//!
//! Every failure propagates to the caller as a value. Each variant carries a
//! machine-readable code and, where one helps, a suggestion for the caller.

use std::convert::Infallible;

use thiserror::Error;

use crate::NumberError;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_NUMBER: &str = "INVALID_NUMBER";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const NO_BASE_UNIT: &str = "NO_BASE_UNIT";
    pub const ADJACENT_NUMBERS: &str = "ADJACENT_NUMBERS";
    pub const UNIT_WITHOUT_VALUE: &str = "UNIT_WITHOUT_VALUE";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const MISSING_UNIT: &str = "MISSING_UNIT";
    pub const NON_TERMINATING: &str = "NON_TERMINATING";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    pub const EMPTY_RATE_TABLE: &str = "EMPTY_RATE_TABLE";
}

/// Errors raised by conversion, parsing and formatting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("Invalid number format: {0}")]
    InvalidNumericFormat(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("No base unit: no unit has an exchange rate of exactly 1")]
    NoBaseUnitFound,

    #[error("Adjacent numeric tokens: '{0}' follows a number that has no unit")]
    AdjacentNumericTokens(String),

    #[error("Unit '{0}' is not preceded by a value")]
    UnitWithoutValue(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid format: {0:?}")]
    InvalidFormat(String),

    #[error("Value '{0}' has no unit")]
    MissingUnit(String),

    #[error("Non-terminating decimal expansion: {0}")]
    NonTerminatingDivision(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Exchange rate table is empty")]
    EmptyRateTable,
}

impl MeasureError {
    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            MeasureError::InvalidNumericFormat(_) => codes::INVALID_NUMBER,
            MeasureError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            MeasureError::NoBaseUnitFound => codes::NO_BASE_UNIT,
            MeasureError::AdjacentNumericTokens(_) => codes::ADJACENT_NUMBERS,
            MeasureError::UnitWithoutValue(_) => codes::UNIT_WITHOUT_VALUE,
            MeasureError::InvalidToken(_) => codes::INVALID_TOKEN,
            MeasureError::InvalidFormat(_) => codes::INVALID_FORMAT,
            MeasureError::MissingUnit(_) => codes::MISSING_UNIT,
            MeasureError::NonTerminatingDivision(_) => codes::NON_TERMINATING,
            MeasureError::DivisionByZero => codes::DIV_ZERO,
            MeasureError::UnknownOperation(_) => codes::UNKNOWN_OPERATION,
            MeasureError::EmptyRateTable => codes::EMPTY_RATE_TABLE,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            MeasureError::NonTerminatingDivision(_) => {
                Some("Pass a fixed scale to round the result")
            }
            MeasureError::AdjacentNumericTokens(_) | MeasureError::MissingUnit(_) => {
                Some("Write every number with its unit, e.g. \"1h 30min\"")
            }
            MeasureError::UnitWithoutValue(_) => Some("Put a number before each unit"),
            MeasureError::NoBaseUnitFound => Some("Give exactly one unit an exchange rate of 1"),
            _ => None,
        }
    }
}

impl From<NumberError> for MeasureError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => MeasureError::InvalidNumericFormat(s),
            NumberError::DivisionByZero => MeasureError::DivisionByZero,
            NumberError::NonTerminating { dividend, divisor } => {
                MeasureError::NonTerminatingDivision(format!("{} / {}", dividend, divisor))
            }
        }
    }
}

impl From<Infallible> for MeasureError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
