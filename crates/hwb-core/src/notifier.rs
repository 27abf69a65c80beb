use std::sync::Arc;

use crate::{domain::ChatId, messaging::port::MessagingPort};

/// Best-effort sender bound to the one configured chat.
///
/// Delivery failures are logged and dropped; callers never see them.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
    chat_id: ChatId,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>, chat_id: ChatId) -> Self {
        Self { messenger, chat_id }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub async fn notify(&self, text: &str) {
        match self.messenger.send_text(self.chat_id, text).await {
            Ok(_) => tracing::debug!(chat_id = self.chat_id.0, "message sent"),
            Err(e) => tracing::error!(chat_id = self.chat_id.0, error = %e, "message not sent"),
        }
    }
}
