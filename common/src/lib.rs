//! Exchange Common Types
//!
//! Shared types for the exchange service: the currency registry, the error
//! type and decimal rounding helpers.

pub mod currency;
pub mod error;
pub mod monetary;

pub use currency::*;
pub use error::*;
pub use monetary::*;
