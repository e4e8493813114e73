use async_trait::async_trait;

use crate::{
    content::{MediaKind, MediaRef, SendOperation, TextFormat},
    domain::{ChatId, MessageRef},
    messaging::types::MessagingCapabilities,
    Result,
};

/// Cross-messenger port.
///
/// Every call is a single best-effort attempt; failures surface as
/// [`crate::Error::Transport`] and are never retried here.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: Option<TextFormat>,
    ) -> Result<MessageRef>;

    async fn send_media(
        &self,
        chat_id: ChatId,
        kind: MediaKind,
        media: &MediaRef,
        caption: &str,
        format: Option<TextFormat>,
    ) -> Result<MessageRef>;

    async fn send_voice(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef>;
}

/// Run one send operation against a messenger.
pub async fn execute(messenger: &dyn MessagingPort, op: &SendOperation) -> Result<MessageRef> {
    match op {
        SendOperation::Text { dest, text, format } => {
            messenger.send_text(*dest, text, *format).await
        }
        SendOperation::Media {
            dest,
            kind,
            media,
            caption,
            format,
        } => {
            messenger
                .send_media(*dest, *kind, media, caption, *format)
                .await
        }
        SendOperation::Voice { dest, media } => messenger.send_voice(*dest, media).await,
    }
}
