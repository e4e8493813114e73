use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, warn};

use relay_core::{
    commands::{parse_command, run_command},
    domain::{ChatId, UserId},
    messaging::types::Command,
};

use crate::router::AppState;

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let (name, args) = parse_command(text);
    let cmd = Command {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        name,
        args,
    };
    info!(
        user_id = cmd.user_id.0,
        command = %cmd.name,
        "command received"
    );

    let reply = run_command(&state.relay, &cmd).await;
    if let Err(e) = bot.send_message(msg.chat.id, reply).await {
        warn!(chat_id = cmd.chat_id.0, error = %e, "failed to answer command");
    }
    Ok(())
}
