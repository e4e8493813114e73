use std::sync::Arc;

use relay_core::{ban::BanRegistry, config::Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), relay_core::Error> {
    relay_core::logging::init("relay")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!(error = %e, "cannot start relay bot");
            return Err(e);
        }
    };

    let bans = BanRegistry::open(cfg.database_url.as_deref()).await;

    relay_telegram::router::run_polling(cfg, bans)
        .await
        .map_err(|e| relay_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
