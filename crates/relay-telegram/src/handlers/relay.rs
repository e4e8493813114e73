use std::sync::Arc;

use teloxide::prelude::*;
use tracing::debug;

use crate::convert::inbound_from_message;
use crate::router::AppState;

pub async fn handle_relay(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(inbound) = inbound_from_message(&msg) else {
        debug!(chat_id = msg.chat.id.0, "ignoring message without sender");
        return Ok(());
    };

    let outcome = state.relay.handle(&inbound).await;
    debug!(chat_id = inbound.chat_id.0, ?outcome, "message handled");
    Ok(())
}
