//! Telegram update handlers.
//!
//! Known commands are answered directly; every other message, including unknown
//! slash-prefixed text, goes through the relay router.
//! Handlers never return an error to the dispatcher: relay failures are already turned
//! into notices by the router.

use std::sync::Arc;

use relay_core::commands::is_command;
use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod commands;
mod relay;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if msg.text().is_some_and(is_command) {
        return commands::handle_command(bot, msg, state).await;
    }
    relay::handle_relay(msg, state).await
}
