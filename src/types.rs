//! Re-exported types from external crates for convenience.
//!
//! These types appear throughout the public API of this crate and are
//! re-exported here so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for request dates and response timestamps.
pub use chrono::{DateTime, NaiveDate, Utc};
/// Arbitrary precision decimal type for stakes, odds, and exchange rates.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use stake_converter::types::dec;
/// let rate = dec!(0.818185);
/// ```
pub use rust_decimal_macros::dec;
