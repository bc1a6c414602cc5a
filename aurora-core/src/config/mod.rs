//! Validated runtime configuration of the storefront.
//!
//! The server crate reads and checks the TOML file; the sections here are
//! what handlers and gateway clients see afterwards.

mod media;
mod payment;
mod server;
mod session;

pub use media::MediaConfig;
pub use payment::PaymentConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Live configuration, one lock per section so a reload of one section
/// does not stall readers of another.
#[derive(Clone)]
pub struct SharedConfig {
    /// Listen address, CORS origins and frontend URL.
    pub server: Arc<RwLock<ServerConfig>>,
    /// Session token signing.
    pub session: Arc<RwLock<SessionConfig>>,
    /// Hosted checkout provider.
    pub payment: Arc<RwLock<PaymentConfig>>,
    /// Media host; `None` disables image deletion.
    pub media: Arc<RwLock<Option<MediaConfig>>>,
}

impl SharedConfig {
    pub fn new(
        server: ServerConfig,
        session: SessionConfig,
        payment: PaymentConfig,
        media: Option<MediaConfig>,
    ) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            session: Arc::new(RwLock::new(session)),
            payment: Arc::new(RwLock::new(payment)),
            media: Arc::new(RwLock::new(media)),
        }
    }
}
