//! Mensura Core - Fundamental types
//!
//! This crate provides the core types used throughout Mensura:
//! - `Decimal`: Exact decimal numbers with explicit rounding
//! - `RoundingMode` / `Precision`: How quotients are cut to a scale
//! - `MeasureError`: Error taxonomy with machine-readable codes

mod decimal;
mod error;
mod rounding;

pub use decimal::{Decimal, NumberError};
pub use error::{MeasureError, codes};
pub use rounding::{Precision, RoundingMode};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Decimal, MeasureError, Precision, RoundingMode};
    pub use crate::error::codes;
}
