//! State handed to every handler.

use aurora_core::config::SharedConfig;
use aurora_core::framework::DatabaseProcessor;
use aurora_core::media::MediaClient;
use aurora_core::payment::StripeClient;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::LoadedConfig;

/// Database access, live configuration and the gateway clients built from
/// it. Clones share everything.
#[derive(Clone)]
pub struct AppState {
    /// Database access for all processors.
    pub db: DatabaseProcessor,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Hosted checkout client, rebuilt when the payment section changes.
    pub stripe: Arc<RwLock<StripeClient>>,
    /// Media host client; `None` when no media section is configured.
    pub media: Arc<RwLock<Option<MediaClient>>>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, loaded: LoadedConfig) -> Self {
        let stripe = loaded.payment.client();
        let media = loaded.media.as_ref().map(|m| m.client());
        Self {
            db: DatabaseProcessor::new(db),
            config: loaded.into_shared(),
            stripe: Arc::new(RwLock::new(stripe)),
            media: Arc::new(RwLock::new(media)),
        }
    }

    /// Swap every config section and the clients built from them.
    pub async fn apply_config(&self, loaded: LoadedConfig) {
        *self.stripe.write().await = loaded.payment.client();
        *self.media.write().await = loaded.media.as_ref().map(|m| m.client());
        *self.config.server.write().await = loaded.server;
        *self.config.session.write().await = loaded.session;
        *self.config.payment.write().await = loaded.payment;
        *self.config.media.write().await = loaded.media;
    }
}
