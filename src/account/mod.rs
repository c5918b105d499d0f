//! Member account management

pub mod models;

pub use models::{Account, AccountId};
