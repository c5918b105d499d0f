//! Pointflow - Member Points Transfer Core
//!
//! Idempotent two-party point transfers with an auditable lifecycle,
//! built step by step.
//!
//! # Modules
//!
//! - [`account`] - Member accounts and point arithmetic
//! - [`transfer`] - Transfer records, lifecycle state machine, orchestrator
//! - [`store`] - Persistence seam (in-memory and PostgreSQL backends)
//! - [`gateway`] - HTTP API (axum handlers, OpenAPI document)
//! - [`config`] - YAML configuration loading
//! - [`logging`] - Rolling-file tracing setup

// Domain
pub mod account;
pub mod transfer;

// Persistence
pub mod store;

// HTTP surface
pub mod gateway;

// Runtime plumbing
pub mod config;
pub mod logging;

// Convenient re-exports at crate root
pub use account::{Account, AccountId};
pub use config::{AppConfig, StoreBackend};
pub use store::{MemoryStore, PgStore, Store};
pub use transfer::{
    KeyGenerator, Transfer, TransferError, TransferOrchestrator, TransferPage, TransferStatus,
    UuidKeyGenerator,
};
