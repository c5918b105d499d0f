//! HTTP handlers
//!
//! - [`transfer`]: create / lookup / list endpoints
//! - [`health`]: liveness probe with a store ping

pub mod health;
pub mod transfer;

pub use health::*;
pub use transfer::*;
