//! teloxide `Message` → relay-core inbound model.

use teloxide::types::Message;

use relay_core::{
    content::{ContentPayload, MediaRef},
    domain::{ChatId, MessageId, UserId},
    messaging::types::{InboundMessage, RepliedMessage},
};

/// Classify the content of a Telegram message.
///
/// Photos use the largest size Telegram offers. Anything that is not text, photo,
/// video, document, audio or voice (stickers, locations, polls...) is `Unsupported`.
pub fn payload_from_message(msg: &Message) -> ContentPayload {
    let caption = msg.caption().map(|s| s.to_string());

    if let Some(text) = msg.text() {
        return ContentPayload::Text(text.to_string());
    }
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return ContentPayload::Photo {
            media: MediaRef(photo.file.id.clone()),
            caption,
        };
    }
    if let Some(video) = msg.video() {
        return ContentPayload::Video {
            media: MediaRef(video.file.id.clone()),
            caption,
        };
    }
    if let Some(doc) = msg.document() {
        return ContentPayload::Document {
            media: MediaRef(doc.file.id.clone()),
            caption,
        };
    }
    if let Some(audio) = msg.audio() {
        return ContentPayload::Audio {
            media: MediaRef(audio.file.id.clone()),
            caption,
        };
    }
    if let Some(voice) = msg.voice() {
        return ContentPayload::Voice {
            media: MediaRef(voice.file.id.clone()),
        };
    }
    ContentPayload::Unsupported
}

/// Build the relay view of a message. `None` for messages without a sender
/// (channel posts).
pub fn inbound_from_message(msg: &Message) -> Option<InboundMessage> {
    let user = msg.from()?;
    let reply_to = msg.reply_to_message().map(|r| RepliedMessage {
        message_id: MessageId(r.id.0),
        payload: payload_from_message(r),
    });

    Some(InboundMessage {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        sender: UserId(user.id.0 as i64),
        username: user.username.clone(),
        reply_to,
        payload: payload_from_message(msg),
    })
}
