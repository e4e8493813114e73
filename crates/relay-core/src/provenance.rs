//! Provenance tags: the visible marker that names the original sender of a
//! message forwarded to the admin, and its parser for admin replies.
//!
//! The tag survives Telegram's entity stripping: a forwarded message rendered with
//! `<code>42</code>` comes back in `reply_to_message.text` as a bare `42`, so the
//! decoder accepts the backtick, `<code>` and bare forms.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::ChatId;

/// Header of every forwarded user message.
pub const SENDER_TAG_HEADER: &str = "【新用户消息】来自 ID:";

/// Prefix of admin replies delivered to a user.
pub const REPLY_MARKER: &str = "【管理员回复】";

/// Prefix of admin broadcasts delivered to targets.
pub const BROADCAST_MARKER: &str = "【管理员广播】";

/// Plain-text sender tag, e.g. ``【新用户消息】来自 ID: `42`:``.
pub fn encode_sender_tag(id: ChatId) -> String {
    format!("{SENDER_TAG_HEADER} `{}`:", id.0)
}

/// Sender tag for HTML parse mode. Renders the same visible text as
/// [`encode_sender_tag`] minus the backticks.
pub fn encode_sender_tag_html(id: ChatId) -> String {
    format!("{SENDER_TAG_HEADER} <code>{}</code>:", id.0)
}

/// Extract the sender identity from the text or caption of a forwarded message.
pub fn decode_sender_tag(text: &str) -> Option<ChatId> {
    let caps = tag_regex().captures(text)?;
    caps.get(1)?.as_str().parse::<i64>().ok().map(ChatId)
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"【新用户消息】来自 ID:\s*(?:`|<code>)?(-?\d{1,19})(?:`|</code>)?:")
            .expect("valid regex")
    })
}
