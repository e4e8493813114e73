//! Relay router.
//!
//! Every inbound message is classified on its own, first match wins:
//! 1. admin reply to a provenance-tagged message → back to the tagged user
//! 2. any other admin message → broadcast to the target list
//! 3. everything else → forwarded to the admin (unless the sender is banned)
//!
//! Failures never escape [`RelayRouter::handle`]; they become a notice to the sender.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    audit::{AuditEvent, AuditLogger},
    ban::BanRegistry,
    config::Config,
    content::{build_send, SendOperation, TextFormat},
    delivery::{BroadcastResult, DeliveryError, DeliveryReporter},
    domain::{ChatId, Role},
    messaging::{
        port::{execute, MessagingPort},
        types::InboundMessage,
    },
    pacing::Pacer,
    provenance::{
        decode_sender_tag, encode_sender_tag, encode_sender_tag_html, BROADCAST_MARKER,
        REPLY_MARKER,
    },
};

/// Where an inbound message goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    AdminReply(ChatId),
    Broadcast,
    UserForward,
}

/// What happened to an inbound message. The sender has already been notified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    Replied { to: ChatId },
    ReplyFailed { to: ChatId },
    Broadcast(BroadcastResult),
    NoTargets,
    Forwarded { to: ChatId },
    ForwardFailed,
    Rejected,
    AdminUnavailable,
}

pub struct RelayRouter {
    cfg: Arc<Config>,
    messenger: Arc<dyn MessagingPort>,
    bans: BanRegistry,
    pacer: Arc<dyn Pacer>,
    audit: Option<AuditLogger>,
}

impl RelayRouter {
    pub fn new(
        cfg: Arc<Config>,
        messenger: Arc<dyn MessagingPort>,
        bans: BanRegistry,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            cfg,
            messenger,
            bans,
            pacer,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn bans(&self) -> &BanRegistry {
        &self.bans
    }

    pub fn classify(&self, msg: &InboundMessage) -> Route {
        if self.cfg.role_of(msg.sender) != Role::Admin {
            return Route::UserForward;
        }
        msg.reply_to
            .as_ref()
            .and_then(|r| r.payload.text())
            .and_then(decode_sender_tag)
            .map(Route::AdminReply)
            .unwrap_or(Route::Broadcast)
    }

    pub async fn handle(&self, msg: &InboundMessage) -> RelayOutcome {
        let route = self.classify(msg);
        debug!(
            chat_id = msg.chat_id.0,
            sender = msg.sender.0,
            kind = msg.payload.kind_name(),
            ?route,
            "relaying message"
        );
        match route {
            Route::AdminReply(to) => self.reply_to_user(msg, to).await,
            Route::Broadcast => self.broadcast(msg).await,
            Route::UserForward => self.forward_to_admin(msg).await,
        }
    }

    async fn reply_to_user(&self, msg: &InboundMessage, to: ChatId) -> RelayOutcome {
        let ops = build_send(&msg.payload, to, REPLY_MARKER, None);
        let outcome = self.deliver(&ops).await;
        self.audit_relay("reply", msg, to, outcome.as_ref().err());

        match outcome {
            Ok(()) => {
                info!(to = to.0, "admin reply delivered");
                self.notify(msg.chat_id, &format!("✅ 回复已发送给用户 {to}。"))
                    .await;
                RelayOutcome::Replied { to }
            }
            Err(DeliveryError::Unsupported) => {
                self.notify(msg.chat_id, "⚠️ 无法转发此回复：不支持的消息类型。")
                    .await;
                RelayOutcome::ReplyFailed { to }
            }
            Err(e) => {
                warn!(to = to.0, error = %e, "admin reply failed");
                self.notify(msg.chat_id, &format!("❌ 回复发送给用户 {to} 失败：{e}"))
                    .await;
                RelayOutcome::ReplyFailed { to }
            }
        }
    }

    async fn broadcast(&self, msg: &InboundMessage) -> RelayOutcome {
        if self.cfg.target_ids.is_empty() {
            warn!("broadcast requested but no targets are configured");
            self.notify(msg.chat_id, "⚠️ 未配置广播目标（TARGET_IDS），消息未发送。")
                .await;
            return RelayOutcome::NoTargets;
        }

        let mut reporter = DeliveryReporter::new(self.pacer.clone());
        for &dest in &self.cfg.target_ids {
            reporter.pace().await;
            let ops = build_send(&msg.payload, dest, BROADCAST_MARKER, None);
            let outcome = self.deliver(&ops).await;
            if let Err(e) = &outcome {
                warn!(dest = dest.0, error = %e, "broadcast delivery failed");
            }
            reporter.record(dest, &outcome);
        }
        let result = reporter.finish();

        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            "broadcast finished"
        );
        self.audit(AuditEvent::broadcast(
            msg.sender,
            msg.payload.kind_name(),
            msg.payload.text(),
            &result,
        ));
        self.notify(msg.chat_id, &broadcast_summary(&result)).await;
        RelayOutcome::Broadcast(result)
    }

    async fn forward_to_admin(&self, msg: &InboundMessage) -> RelayOutcome {
        if self.bans.is_banned(msg.sender).await {
            info!(user_id = msg.sender.0, "dropping message from banned user");
            self.audit(AuditEvent::rejected(
                msg.sender,
                msg.username.as_deref(),
                msg.payload.kind_name(),
            ));
            self.notify(msg.chat_id, "🚫 你已被禁止使用此机器人。").await;
            return RelayOutcome::Rejected;
        }

        let Some(admin) = self.cfg.admin_id else {
            warn!(user_id = msg.sender.0, "cannot forward: admin is not configured");
            self.notify(msg.chat_id, "⚠️ 机器人配置错误：未设置管理员，消息无法转发。")
                .await;
            return RelayOutcome::AdminUnavailable;
        };

        let (prefix, format) = if self.messenger.capabilities().supports_html {
            (encode_sender_tag_html(msg.chat_id), Some(TextFormat::Html))
        } else {
            (encode_sender_tag(msg.chat_id), None)
        };
        let ops = build_send(&msg.payload, admin, &prefix, format);
        let outcome = self.deliver(&ops).await;
        self.audit_relay("forward", msg, admin, outcome.as_ref().err());

        match outcome {
            Ok(()) => {
                info!(user_id = msg.sender.0, "user message forwarded to admin");
                self.notify(msg.chat_id, "✅ 消息已转发给管理员。").await;
                RelayOutcome::Forwarded { to: admin }
            }
            Err(DeliveryError::Unsupported) => {
                info!(
                    user_id = msg.sender.0,
                    kind = msg.payload.kind_name(),
                    "unsupported content not forwarded"
                );
                self.notify(msg.chat_id, "⚠️ 暂不支持此类型的消息，未能转发。")
                    .await;
                RelayOutcome::ForwardFailed
            }
            Err(e) => {
                warn!(user_id = msg.sender.0, error = %e, "forward to admin failed");
                let mut notice = "❌ 消息转发失败，请稍后再试。".to_string();
                if self.cfg.expose_transport_errors {
                    notice.push_str(&format!("\n错误：{e}"));
                }
                self.notify(msg.chat_id, &notice).await;
                RelayOutcome::ForwardFailed
            }
        }
    }

    /// Run every operation for one destination, stopping at the first failure.
    async fn deliver(&self, ops: &[SendOperation]) -> Result<(), DeliveryError> {
        if ops.is_empty() {
            return Err(DeliveryError::Unsupported);
        }
        for op in ops {
            execute(self.messenger.as_ref(), op)
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        }
        Ok(())
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text, None).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to send acknowledgment");
        }
    }

    fn audit_relay(
        &self,
        event: &str,
        msg: &InboundMessage,
        dest: ChatId,
        error: Option<&DeliveryError>,
    ) {
        let error = error.map(|e| e.to_string());
        self.audit(AuditEvent::relay(
            event,
            msg.sender,
            msg.username.as_deref(),
            dest,
            msg.payload.kind_name(),
            msg.payload.text(),
            error.as_deref(),
        ));
    }

    pub(crate) fn audit(&self, event: AuditEvent) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.write(event) {
                warn!(error = %e, "failed to write audit log");
            }
        }
    }
}

pub fn broadcast_summary(result: &BroadcastResult) -> String {
    let mut out = format!(
        "📢 广播完成：成功 {} 个，失败 {} 个。",
        result.succeeded, result.failed
    );
    if !result.failed_destinations.is_empty() {
        let ids = result
            .failed_destinations
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\n失败目标：{ids}"));
    }
    out
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::{FailRule, RecordingMessenger};
    use super::*;
    use crate::{
        content::{ContentPayload, MediaRef},
        domain::{MessageId, UserId},
        messaging::types::RepliedMessage,
        pacing::FixedIntervalPacer,
    };

    const ADMIN: i64 = 7;

    fn config(admin: Option<i64>, targets: &[i64], expose: bool) -> Arc<Config> {
        Arc::new(Config {
            bot_token: "t".to_string(),
            admin_id: admin.map(ChatId),
            target_ids: targets.iter().copied().map(ChatId).collect(),
            database_url: None,
            send_interval: Duration::ZERO,
            expose_transport_errors: expose,
            audit_log_path: None,
            audit_log_json: false,
        })
    }

    fn router(
        cfg: Arc<Config>,
        messenger: Arc<RecordingMessenger>,
        bans: BanRegistry,
    ) -> RelayRouter {
        RelayRouter::new(
            cfg,
            messenger,
            bans,
            Arc::new(FixedIntervalPacer::new(Duration::ZERO)),
        )
    }

    fn message(from: i64, payload: ContentPayload) -> InboundMessage {
        InboundMessage {
            chat_id: ChatId(from),
            message_id: MessageId(10),
            sender: UserId(from),
            username: None,
            reply_to: None,
            payload,
        }
    }

    fn text(s: &str) -> ContentPayload {
        ContentPayload::Text(s.to_string())
    }

    fn replying_to(mut msg: InboundMessage, replied: ContentPayload) -> InboundMessage {
        msg.reply_to = Some(RepliedMessage {
            message_id: MessageId(3),
            payload: replied,
        });
        msg
    }

    #[tokio::test]
    async fn user_text_is_forwarded_with_sender_tag() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let out = r.handle(&message(42, text("hi <there>"))).await;
        assert_eq!(out, RelayOutcome::Forwarded { to: ChatId(ADMIN) });

        let to_admin = m.sent_to(ChatId(ADMIN));
        assert_eq!(
            to_admin,
            vec![SendOperation::Text {
                dest: ChatId(ADMIN),
                text: "【新用户消息】来自 ID: <code>42</code>: hi &lt;there&gt;".to_string(),
                format: Some(TextFormat::Html),
            }]
        );
        assert_eq!(m.texts_to(ChatId(42)), vec!["✅ 消息已转发给管理员。"]);
    }

    #[tokio::test]
    async fn plain_transport_gets_backtick_tag() {
        let mut inner = RecordingMessenger::new(vec![]);
        inner.html = false;
        let m = Arc::new(inner);
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        r.handle(&message(42, text("hi"))).await;
        let texts = m.texts_to(ChatId(ADMIN));
        assert_eq!(texts, vec!["【新用户消息】来自 ID: `42`: hi"]);
        assert_eq!(decode_sender_tag(&texts[0]), Some(ChatId(42)));
    }

    #[tokio::test]
    async fn admin_reply_routes_to_tagged_user() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[1, 2], false), m.clone(), BanRegistry::disabled());

        let msg = replying_to(
            message(ADMIN, text("got it")),
            text("【新用户消息】来自 ID: `42`:\n\nhello"),
        );
        assert_eq!(r.classify(&msg), Route::AdminReply(ChatId(42)));

        let out = r.handle(&msg).await;
        assert_eq!(out, RelayOutcome::Replied { to: ChatId(42) });
        assert_eq!(m.texts_to(ChatId(42)), vec!["【管理员回复】 got it"]);
        assert!(m.sent_to(ChatId(1)).is_empty());
        assert!(m.sent_to(ChatId(2)).is_empty());
        assert_eq!(m.texts_to(ChatId(ADMIN)), vec!["✅ 回复已发送给用户 42。"]);
    }

    #[tokio::test]
    async fn admin_reply_reads_tag_from_caption() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let msg = replying_to(
            message(ADMIN, text("nice photo")),
            ContentPayload::Photo {
                media: MediaRef("p".to_string()),
                caption: Some("【新用户消息】来自 ID: 55: look".to_string()),
            },
        );
        assert_eq!(r.handle(&msg).await, RelayOutcome::Replied { to: ChatId(55) });
    }

    #[tokio::test]
    async fn admin_reply_to_untagged_message_broadcasts() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[1, 2], false), m.clone(), BanRegistry::disabled());

        let msg = replying_to(message(ADMIN, text("all")), text("some earlier note"));
        assert_eq!(r.classify(&msg), Route::Broadcast);

        let out = r.handle(&msg).await;
        let RelayOutcome::Broadcast(res) = out else {
            panic!("expected broadcast, got {out:?}");
        };
        assert_eq!(res.succeeded, 2);
        assert_eq!(m.texts_to(ChatId(1)), vec!["【管理员广播】 all"]);
    }

    #[tokio::test]
    async fn admin_reply_transport_failure_reports_detail() {
        let m = Arc::new(RecordingMessenger::new(vec![FailRule::Dest(ChatId(42))]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let msg = replying_to(message(ADMIN, text("x")), text("【新用户消息】来自 ID: `42`: y"));
        assert_eq!(r.handle(&msg).await, RelayOutcome::ReplyFailed { to: ChatId(42) });

        let acks = m.texts_to(ChatId(ADMIN));
        assert_eq!(acks.len(), 1);
        assert!(acks[0].starts_with("❌ 回复发送给用户 42 失败："));
        assert!(acks[0].contains("chat 42 not found"));
    }

    #[tokio::test]
    async fn admin_reply_with_unsupported_content() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let msg = replying_to(
            message(ADMIN, ContentPayload::Unsupported),
            text("【新用户消息】来自 ID: `42`: y"),
        );
        assert_eq!(r.handle(&msg).await, RelayOutcome::ReplyFailed { to: ChatId(42) });
        assert!(m.sent_to(ChatId(42)).is_empty());
        assert_eq!(
            m.texts_to(ChatId(ADMIN)),
            vec!["⚠️ 无法转发此回复：不支持的消息类型。"]
        );
    }

    #[tokio::test]
    async fn broadcast_aggregates_partial_failure() {
        let m = Arc::new(RecordingMessenger::new(vec![FailRule::Dest(ChatId(2))]));
        let r = router(config(Some(ADMIN), &[1, 2, 3], false), m.clone(), BanRegistry::disabled());

        let out = r.handle(&message(ADMIN, text("news"))).await;
        let expected = BroadcastResult {
            succeeded: 2,
            failed: 1,
            failed_destinations: vec![ChatId(2)],
        };
        assert_eq!(out, RelayOutcome::Broadcast(expected));

        // Failure at 2 does not stop delivery to 3.
        assert_eq!(m.texts_to(ChatId(3)), vec!["【管理员广播】 news"]);

        let acks = m.texts_to(ChatId(ADMIN));
        assert_eq!(acks.len(), 1);
        assert!(acks[0].contains("成功 2 个"));
        assert!(acks[0].contains("失败 1 个"));
        assert!(acks[0].contains("失败目标：2"));
    }

    #[tokio::test]
    async fn broadcast_spaces_every_destination_after_idle() {
        let interval = Duration::from_millis(150);
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = RelayRouter::new(
            config(Some(ADMIN), &[1, 2, 3], false),
            m.clone(),
            BanRegistry::disabled(),
            Arc::new(FixedIntervalPacer::new(interval)),
        );

        // Let the pacer's first slot lapse, as after a quiet period.
        tokio::time::sleep(interval * 2).await;

        let start = tokio::time::Instant::now();
        let out = r.handle(&message(ADMIN, text("news"))).await;
        let elapsed = start.elapsed();

        let RelayOutcome::Broadcast(res) = out else {
            panic!("expected broadcast, got {out:?}");
        };
        assert_eq!(res.succeeded, 3);
        assert!(elapsed >= interval * 2, "{elapsed:?}");
    }

    #[tokio::test]
    async fn broadcast_without_targets_stops() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        assert_eq!(
            r.handle(&message(ADMIN, text("news"))).await,
            RelayOutcome::NoTargets
        );
        let sent = m.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].dest(), ChatId(ADMIN));
    }

    #[tokio::test]
    async fn broadcast_ignores_ban_list() {
        let bans = BanRegistry::open(Some("sqlite::memory:")).await;
        bans.ban(UserId(1)).await.unwrap();
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[1], false), m.clone(), bans);

        let out = r.handle(&message(ADMIN, text("news"))).await;
        assert!(matches!(out, RelayOutcome::Broadcast(ref res) if res.succeeded == 1));
    }

    #[tokio::test]
    async fn voice_counts_as_failure_when_prefix_send_fails() {
        let m = Arc::new(RecordingMessenger::new(vec![FailRule::TextTo(ChatId(2))]));
        let r = router(config(Some(ADMIN), &[1, 2], false), m.clone(), BanRegistry::disabled());

        let voice = ContentPayload::Voice {
            media: MediaRef("ogg".to_string()),
        };
        let out = r.handle(&message(ADMIN, voice)).await;
        let RelayOutcome::Broadcast(res) = out else {
            panic!("expected broadcast, got {out:?}");
        };
        assert_eq!(res.succeeded, 1);
        assert_eq!(res.failed, 1);
        assert_eq!(res.failed_destinations, vec![ChatId(2)]);
        // Voice itself went out to 2 before the prefix failed.
        assert!(matches!(
            m.sent_to(ChatId(2)).as_slice(),
            [SendOperation::Voice { .. }, SendOperation::Text { .. }]
        ));
    }

    #[tokio::test]
    async fn unsupported_broadcast_counts_as_failure() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[1, 2], false), m.clone(), BanRegistry::disabled());

        let out = r.handle(&message(ADMIN, ContentPayload::Unsupported)).await;
        let RelayOutcome::Broadcast(res) = out else {
            panic!("expected broadcast, got {out:?}");
        };
        assert_eq!((res.succeeded, res.failed), (0, 2));
    }

    #[tokio::test]
    async fn banned_user_gets_rejection_only() {
        let bans = BanRegistry::open(Some("sqlite::memory:")).await;
        bans.ban(UserId(42)).await.unwrap();
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), bans);

        assert_eq!(r.handle(&message(42, text("hi"))).await, RelayOutcome::Rejected);
        assert!(m.sent_to(ChatId(ADMIN)).is_empty());
        assert_eq!(m.texts_to(ChatId(42)), vec!["🚫 你已被禁止使用此机器人。"]);
    }

    #[tokio::test]
    async fn missing_admin_is_reported_to_user() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(None, &[1], false), m.clone(), BanRegistry::disabled());

        assert_eq!(
            r.handle(&message(42, text("hi"))).await,
            RelayOutcome::AdminUnavailable
        );
        let sent = m.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].dest(), ChatId(42));
    }

    #[tokio::test]
    async fn sticker_is_not_forwarded() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let out = r.handle(&message(42, ContentPayload::Unsupported)).await;
        assert_eq!(out, RelayOutcome::ForwardFailed);
        assert!(m.sent_to(ChatId(ADMIN)).is_empty());
        assert_eq!(m.texts_to(ChatId(42)), vec!["⚠️ 暂不支持此类型的消息，未能转发。"]);
    }

    #[tokio::test]
    async fn transport_error_detail_is_hidden_by_default() {
        let m = Arc::new(RecordingMessenger::new(vec![FailRule::Dest(ChatId(ADMIN))]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        assert_eq!(r.handle(&message(42, text("hi"))).await, RelayOutcome::ForwardFailed);
        assert_eq!(m.texts_to(ChatId(42)), vec!["❌ 消息转发失败，请稍后再试。"]);
    }

    #[tokio::test]
    async fn transport_error_detail_shown_when_enabled() {
        let m = Arc::new(RecordingMessenger::new(vec![FailRule::Dest(ChatId(ADMIN))]));
        let r = router(config(Some(ADMIN), &[], true), m.clone(), BanRegistry::disabled());

        r.handle(&message(42, text("hi"))).await;
        let acks = m.texts_to(ChatId(42));
        assert_eq!(acks.len(), 1);
        assert!(acks[0].contains("chat 7 not found"));
    }

    #[tokio::test]
    async fn user_photo_keeps_caption_under_tag() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled());

        let photo = ContentPayload::Photo {
            media: MediaRef("file-1".to_string()),
            caption: Some("sunset".to_string()),
        };
        r.handle(&message(42, photo)).await;
        let to_admin = m.sent_to(ChatId(ADMIN));
        let [SendOperation::Media { caption, media, .. }] = to_admin.as_slice() else {
            panic!("expected a single media send");
        };
        assert_eq!(media, &MediaRef("file-1".to_string()));
        assert_eq!(decode_sender_tag(caption), Some(ChatId(42)));
        assert!(caption.ends_with(" sunset"));
    }

    #[tokio::test]
    async fn target_users_are_forwarded_like_anyone_else() {
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[5], false), m.clone(), BanRegistry::disabled());

        let msg = message(5, text("from target"));
        assert_eq!(r.classify(&msg), Route::UserForward);
        assert_eq!(r.handle(&msg).await, RelayOutcome::Forwarded { to: ChatId(ADMIN) });
    }

    #[tokio::test]
    async fn audit_log_records_forward() {
        let path = std::env::temp_dir().join(format!("relay-router-audit-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let m = Arc::new(RecordingMessenger::new(vec![]));
        let r = router(config(Some(ADMIN), &[], false), m.clone(), BanRegistry::disabled())
            .with_audit(AuditLogger::new(&path, true));

        r.handle(&message(42, text("hi"))).await;
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#""event":"forward""#));
        assert!(written.contains(r#""destination":7"#));
        let _ = std::fs::remove_file(&path);
    }
}
