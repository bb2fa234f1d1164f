//! Persistence boundary for server records.
//!
//! The store talks to an abstract [`ServerGateway`]; any backend with
//! CRUD plus batch-upsert semantics plugs in. Failures come back as one
//! of three [`GatewayError`] kinds (validation, not-found, transport)
//! and never corrupt the caller's in-memory state.

mod error;
mod gateway;
mod memory;
mod validate;

pub use error::{GatewayError, Result};
pub use gateway::ServerGateway;
pub use memory::MemoryGateway;
pub use validate::{validate_draft, validate_patch};
