//! Runtime configuration re-exports and utilities.
//!
//! The shared config types are defined in `aurora-core::config`.
//! This module re-exports them next to the server-only admin account.

pub use aurora_core::config::{MediaConfig, PaymentConfig, ServerConfig, SessionConfig, SharedConfig};

/// Bootstrap administrator, upserted at startup.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password_hash: String,
}
