//! ConversationStore trait definition.
//!
//! Follows the same RPITIT pattern as `ChatTransport`.

use gatechat_types::error::StoreError;
use gatechat_types::message::Message;

/// Persistence for the conversation log.
///
/// Implementations live in gatechat-infra (e.g., `JsonFileStore`). The
/// session calls `load` once when it opens and `save` after every finished
/// turn and consumed notification.
pub trait ConversationStore: Send + Sync {
    /// Load the stored conversation, oldest first.
    ///
    /// Returns at most the store's capacity of most recent messages and an
    /// empty list when nothing was stored.
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Replace the stored conversation.
    fn save(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove the stored conversation.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
