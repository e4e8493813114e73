use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
};

use chrono::Utc;
use serde::Serialize;

use crate::{
    delivery::BroadcastResult,
    domain::{ChatId, UserId},
    errors::Error,
    formatting::truncate_text,
    Result,
};

const AUDIT_MAX_TEXT: usize = 500;

/// RFC3339 timestamp in UTC (for logs/telemetry).
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub succeeded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_destinations: Vec<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    fn base(event: &str, user_id: UserId, username: Option<&str>) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            user_id: Some(user_id.0),
            username: username.map(|s| s.to_string()),
            destination: None,
            content_kind: None,
            content: None,
            succeeded: None,
            failed: None,
            failed_destinations: Vec::new(),
            error: None,
        }
    }

    /// A single-destination relay (`forward` or `reply`).
    pub fn relay(
        event: &str,
        user_id: UserId,
        username: Option<&str>,
        destination: ChatId,
        content_kind: &str,
        content: Option<&str>,
        error: Option<&str>,
    ) -> Self {
        Self {
            destination: Some(destination.0),
            content_kind: Some(content_kind.to_string()),
            content: content.map(|s| s.to_string()),
            error: error.map(|s| s.to_string()),
            ..Self::base(event, user_id, username)
        }
    }

    pub fn broadcast(
        user_id: UserId,
        content_kind: &str,
        content: Option<&str>,
        result: &BroadcastResult,
    ) -> Self {
        Self {
            content_kind: Some(content_kind.to_string()),
            content: content.map(|s| s.to_string()),
            succeeded: Some(result.succeeded),
            failed: Some(result.failed),
            failed_destinations: result.failed_destinations.iter().map(|c| c.0).collect(),
            ..Self::base("broadcast", user_id, None)
        }
    }

    pub fn rejected(user_id: UserId, username: Option<&str>, content_kind: &str) -> Self {
        Self {
            content_kind: Some(content_kind.to_string()),
            ..Self::base("rejected", user_id, username)
        }
    }

    /// `ban` / `unban` issued by `admin` against `target`.
    pub fn moderation(event: &str, admin: UserId, target: UserId, error: Option<&str>) -> Self {
        Self {
            destination: Some(target.0),
            error: error.map(|s| s.to_string()),
            ..Self::base(event, admin, None)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        if let Some(s) = &event.content {
            event.content = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        // Plain text format for readability.
        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            out.push_str(&json_value_to_display(v));
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }
}

fn json_value_to_display(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}
