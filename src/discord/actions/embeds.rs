// Embed colours and builders shared across commands.

use super::action_executor::ActionExecutor;
use crate::core::moderation::RetryPolicy;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

pub const RED: u32 = 0xE74C3C;
pub const DARK_RED: u32 = 0x992D22;
pub const ORANGE: u32 = 0xE67E22;
pub const YELLOW: u32 = 0xF1C40F;
pub const GREEN: u32 = 0x2ECC71;
pub const BLUE: u32 = 0x3498DB;
pub const PURPLE: u32 = 0x9B59B6;
pub const GREY: u32 = 0x95A5A6;
pub const BLURPLE: u32 = 0x5865F2;

pub const NO_REASON: &str = "No reason provided";

pub fn embed(title: &str, description: impl Into<String>, colour: u32) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(colour)
}

/// The DM sent to a member before an action is applied to them.
pub fn dm_embed(
    title: &str,
    description: impl Into<String>,
    colour: u32,
    reason: Option<&str>,
    moderator: &serenity::User,
) -> serenity::CreateEmbed {
    let mut dm = embed(title, description, colour);
    if let Some(reason) = reason {
        dm = dm.field("Reason", reason, false);
    }
    dm.field("Moderator", moderator.name.clone(), true)
}

pub fn mention(user_id: impl Into<u64>) -> String {
    format!("<@{}>", user_id.into())
}

/// Cut `text` to `max` characters, adding "..." when something was dropped.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

/// Post an embed and delete it after `lifetime`. Send failures are logged.
pub async fn send_temporary(
    http: &Arc<serenity::Http>,
    policy: &RetryPolicy,
    channel_id: serenity::ChannelId,
    embed: serenity::CreateEmbed,
    lifetime: Duration,
) {
    let message = match ActionExecutor::new(http, policy)
        .send_embed(channel_id, embed)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to send notice: {}", e);
            return;
        }
    };

    let http = Arc::clone(http);
    let policy = policy.clone();
    tokio::spawn(async move {
        tokio::time::sleep(lifetime).await;
        let exec = ActionExecutor::new(&http, &policy);
        if let Err(e) = exec.delete_message(message.channel_id, message.id).await {
            tracing::debug!("Failed to delete notice: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_mention() {
        assert_eq!(mention(42u64), "<@42>");
    }
}
