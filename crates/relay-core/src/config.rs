use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use tracing::warn;

use crate::{domain::ChatId, domain::Role, domain::UserId, errors::Error, Result};

/// Typed, read-only configuration built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,

    // Routing
    pub admin_id: Option<ChatId>,
    pub target_ids: Vec<ChatId>,

    // Ban list persistence (disabled when absent)
    pub database_url: Option<String>,

    // Broadcast pacing
    pub send_interval: Duration,

    // Include raw transport errors in notices shown to users.
    pub expose_transport_errors: bool,

    // Audit
    pub audit_log_path: Option<PathBuf>,
    pub audit_log_json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("TOKEN")
            .or_else(|| lookup("TELEGRAM_BOT_TOKEN"))
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TOKEN environment variable is required".to_string())
            })?;

        let admin_id = match lookup("ADMIN_ID").and_then(non_empty) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(id) => Some(ChatId(id)),
                Err(_) => {
                    warn!(value = %raw, "ADMIN_ID is not a valid integer; admin routing disabled");
                    None
                }
            },
            None => {
                warn!("ADMIN_ID is not set; user messages cannot be forwarded");
                None
            }
        };

        let (targets, rejected) = parse_target_list(lookup("TARGET_IDS").as_deref());
        for entry in &rejected {
            warn!(entry = %entry, "skipping malformed TARGET_IDS entry");
        }
        let target_ids = targets.into_iter().map(ChatId).collect();

        let database_url = lookup("DATABASE_URL").and_then(non_empty);

        let send_interval = Duration::from_millis(
            lookup("RELAY_SEND_INTERVAL_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(100),
        );
        let expose_transport_errors = lookup("RELAY_EXPOSE_ERRORS")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        let audit_log_path = lookup("AUDIT_LOG_PATH")
            .and_then(non_empty)
            .map(PathBuf::from);
        let audit_log_json = lookup("AUDIT_LOG_JSON")
            .map(|s| parse_bool(&s))
            .unwrap_or(false);

        Ok(Self {
            bot_token,
            admin_id,
            target_ids,
            database_url,
            send_interval,
            expose_transport_errors,
            audit_log_path,
            audit_log_json,
        })
    }

    pub fn role_of(&self, user_id: UserId) -> Role {
        let chat = ChatId::from(user_id);
        if self.admin_id == Some(chat) {
            Role::Admin
        } else if self.target_ids.contains(&chat) {
            Role::Target
        } else {
            Role::User
        }
    }
}

/// Parse a comma-separated identity list.
///
/// Returns the parsed ids and the raw entries that could not be parsed.
pub fn parse_target_list(raw: Option<&str>) -> (Vec<i64>, Vec<String>) {
    let mut ids = Vec::new();
    let mut rejected = Vec::new();
    for part in raw.unwrap_or_default().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse::<i64>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => rejected.push(part.to_string()),
        }
    }
    (ids, rejected)
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
