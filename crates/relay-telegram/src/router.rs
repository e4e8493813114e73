use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use relay_core::{
    audit::AuditLogger, ban::BanRegistry, config::Config, messaging::port::MessagingPort,
    pacing::FixedIntervalPacer, relay::RelayRouter,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayRouter>,
}

pub async fn run_polling(cfg: Arc<Config>, bans: BanRegistry) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "relay bot started"),
        Err(e) => warn!(error = %e, "getMe failed; the token may be invalid"),
    }
    info!(
        admin_configured = cfg.admin_id.is_some(),
        targets = cfg.target_ids.len(),
        ban_list = bans.is_enabled(),
        send_interval_ms = cfg.send_interval.as_millis() as u64,
        "relay configuration"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let pacer = Arc::new(FixedIntervalPacer::new(cfg.send_interval));
    let mut relay = RelayRouter::new(cfg.clone(), messenger, bans, pacer);
    if let Some(path) = &cfg.audit_log_path {
        relay = relay.with_audit(AuditLogger::new(path.clone(), cfg.audit_log_json));
    }

    let state = Arc::new(AppState {
        relay: Arc::new(relay),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
