//! Application state wiring the session to its concrete collaborators.
//!
//! The core session is generic over transport and store; AppState pins it
//! to the infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use gatechat_core::chat::ConversationSession;
use gatechat_core::feedback::FeedbackSignaler;
use gatechat_infra::config::load_effective_config;
use gatechat_infra::filesystem::resolve_data_dir;
use gatechat_infra::gateway::GatewayClient;
use gatechat_infra::store::JsonFileStore;
use gatechat_types::config::GatewayConfig;

/// Session pinned to the HTTP gateway and the JSON-file store.
pub type ConcreteSession = ConversationSession<GatewayClient, JsonFileStore>;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GatewayConfig,
}

impl AppState {
    /// Resolve the data directory and load the effective configuration.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_effective_config(&data_dir).await?;
        tracing::debug!(data_dir = %data_dir.display(), "state initialized");

        Ok(Self { data_dir, config })
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_dir)
    }

    /// Open the conversation session, loading the stored log.
    pub async fn open_session(
        &self,
        feedback: Arc<dyn FeedbackSignaler>,
    ) -> anyhow::Result<ConcreteSession> {
        let client = GatewayClient::new(&self.config)?;
        tracing::debug!(
            base_url = client.base_url(),
            model = client.model(),
            "gateway client ready"
        );
        Ok(ConversationSession::open(client, self.store(), feedback).await)
    }
}
