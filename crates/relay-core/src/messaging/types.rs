use crate::{
    content::ContentPayload,
    domain::{ChatId, MessageId, UserId},
};

/// Cross-messenger inbound message. Telegram-specific fields stay in the adapter.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub sender: UserId,
    pub username: Option<String>,
    pub reply_to: Option<RepliedMessage>,
    pub payload: ContentPayload,
}

/// The message an inbound message replies to.
#[derive(Clone, Debug)]
pub struct RepliedMessage {
    pub message_id: MessageId,
    pub payload: ContentPayload,
}

/// Parsed bot command (`/name args`).
#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub name: String,
    pub args: String,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_html: bool,
}
