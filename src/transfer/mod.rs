//! Two-party point transfer core
//!
//! - [`record`]: the Transfer record and its lifecycle transitions
//! - [`status`]: the status enum backing the state machine
//! - [`error`]: typed failure taxonomy
//! - [`keygen`]: idempotency key generation
//! - [`orchestrator`]: drives one attempt end to end

pub mod error;
pub mod keygen;
pub mod orchestrator;
pub mod record;
pub mod status;

pub use error::{ErrorKind, TransferError};
pub use keygen::{KeyGenerator, UuidKeyGenerator};
pub use orchestrator::{MAX_PAGE_SIZE, TransferOrchestrator, TransferPage};
pub use record::{MAX_NOTE_LEN, Transfer};
pub use status::TransferStatus;
