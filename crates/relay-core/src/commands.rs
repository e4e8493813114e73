//! Bot commands: `/start`, `/help`, and the admin-only ban list commands.

use crate::{
    audit::AuditEvent,
    ban::BanError,
    domain::{Role, UserId},
    messaging::types::Command,
    relay::RelayRouter,
};

/// Commands the bot answers. Any other slash-prefixed text is relayed like plain text.
pub const COMMANDS: &[&str] = &["start", "help", "ban", "unban", "banlist"];

/// Whether `text` invokes one of [`COMMANDS`].
pub fn is_command(text: &str) -> bool {
    text.starts_with('/') && COMMANDS.contains(&parse_command(text).0.as_str())
}

/// Split `/cmd@botname args` into a lowercase command name and the trimmed rest.
pub fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Execute a command and return the reply text for the caller.
pub async fn run_command(router: &RelayRouter, cmd: &Command) -> String {
    let role = router.config().role_of(cmd.user_id);
    match cmd.name.as_str() {
        "start" => start_text(cmd.user_id, role),
        "help" => help_text(role),
        "ban" | "unban" | "banlist" if role != Role::Admin => {
            "⛔ 只有管理员可以使用此命令。".to_string()
        }
        "ban" => {
            let Some(target) = parse_user_id(&cmd.args) else {
                return "用法：/ban <用户ID>".to_string();
            };
            let res = router.bans().ban(target).await;
            record_moderation(router, "ban", cmd.user_id, target, res.as_ref().err());
            match res {
                Ok(()) => format!("✅ 已封禁用户 {target}。"),
                Err(BanError::AlreadyBanned(_)) => format!("ℹ️ 用户 {target} 已在封禁列表中。"),
                Err(e) => format!("❌ 封禁失败：{e}"),
            }
        }
        "unban" => {
            let Some(target) = parse_user_id(&cmd.args) else {
                return "用法：/unban <用户ID>".to_string();
            };
            let res = router.bans().unban(target).await;
            record_moderation(router, "unban", cmd.user_id, target, res.as_ref().err());
            match res {
                Ok(()) => format!("✅ 已解除封禁用户 {target}。"),
                Err(BanError::NotBanned(_)) => format!("ℹ️ 用户 {target} 不在封禁列表中。"),
                Err(e) => format!("❌ 解除封禁失败：{e}"),
            }
        }
        "banlist" => match router.bans().list().await {
            Ok(rows) if rows.is_empty() => "封禁列表为空。".to_string(),
            Ok(rows) => {
                let mut out = format!("🚫 已封禁用户（{}）：", rows.len());
                for row in rows {
                    out.push_str(&format!(
                        "\n{} （{}）",
                        row.user_id,
                        row.banned_at.format("%Y-%m-%d %H:%M UTC")
                    ));
                }
                out
            }
            Err(e) => format!("❌ 无法读取封禁列表：{e}"),
        },
        _ => "未知命令，发送 /help 查看可用命令。".to_string(),
    }
}

fn start_text(user_id: UserId, role: Role) -> String {
    let mut out = format!("你好！机器人已启动。\n你的 ID 是：{user_id}");
    match role {
        Role::Admin => out.push_str("\n你是管理员：直接发送的消息会广播给所有目标，回复转发消息可回复对应用户。"),
        Role::Target => out.push_str("\n你在广播目标列表中。"),
        Role::User => out.push_str("\n直接发送消息即可转达给管理员。"),
    }
    out
}

fn help_text(role: Role) -> String {
    let mut out = "可用命令：\n/start - 查看你的 ID\n/help - 显示帮助".to_string();
    if role == Role::Admin {
        out.push_str("\n/ban <用户ID> - 封禁用户\n/unban <用户ID> - 解除封禁\n/banlist - 查看封禁列表");
    }
    out
}

fn parse_user_id(args: &str) -> Option<UserId> {
    args.split_whitespace()
        .next()?
        .parse::<i64>()
        .ok()
        .map(UserId)
}

fn record_moderation(
    router: &RelayRouter,
    event: &str,
    admin: UserId,
    target: UserId,
    error: Option<&BanError>,
) {
    let error = error.map(|e| e.to_string());
    router.audit(AuditEvent::moderation(event, admin, target, error.as_deref()));
}
