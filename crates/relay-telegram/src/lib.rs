//! Telegram adapter (teloxide).
//!
//! This crate implements the `relay-core` MessagingPort over the Telegram Bot API.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
};

pub mod convert;
pub mod handlers;
pub mod router;

use relay_core::{
    content::{MediaKind, MediaRef, TextFormat},
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_parse_mode(format: TextFormat) -> ParseMode {
        match format {
            TextFormat::Html => ParseMode::Html,
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Transport(e.to_string())
    }

    fn sent(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_html: true,
        }
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        format: Option<TextFormat>,
    ) -> Result<MessageRef> {
        let mut req = self.bot.send_message(Self::tg_chat(chat_id), text.to_string());
        if let Some(f) = format {
            req = req.parse_mode(Self::tg_parse_mode(f));
        }
        let msg = req.await.map_err(Self::map_err)?;
        Ok(Self::sent(chat_id, &msg))
    }

    async fn send_media(
        &self,
        chat_id: ChatId,
        kind: MediaKind,
        media: &MediaRef,
        caption: &str,
        format: Option<TextFormat>,
    ) -> Result<MessageRef> {
        let chat = Self::tg_chat(chat_id);
        let file = InputFile::file_id(media.0.clone());
        let caption = caption.to_string();
        let parse_mode = format.map(Self::tg_parse_mode);

        // Each payload type has its own builder, so the shared setters are applied per arm.
        let res = match kind {
            MediaKind::Photo => {
                let mut req = self.bot.send_photo(chat, file).caption(caption);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await
            }
            MediaKind::Video => {
                let mut req = self.bot.send_video(chat, file).caption(caption);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await
            }
            MediaKind::Document => {
                let mut req = self.bot.send_document(chat, file).caption(caption);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await
            }
            MediaKind::Audio => {
                let mut req = self.bot.send_audio(chat, file).caption(caption);
                if let Some(pm) = parse_mode {
                    req = req.parse_mode(pm);
                }
                req.await
            }
        };
        let msg = res.map_err(Self::map_err)?;
        Ok(Self::sent(chat_id, &msg))
    }

    async fn send_voice(&self, chat_id: ChatId, media: &MediaRef) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_voice(Self::tg_chat(chat_id), InputFile::file_id(media.0.clone()))
            .await
            .map_err(Self::map_err)?;
        Ok(Self::sent(chat_id, &msg))
    }
}
