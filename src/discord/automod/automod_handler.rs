// Discord-specific auto-moderation - turns a core `Violation` into deletes
// and a short-lived notice in the channel.

use crate::core::automod::{MessageSnapshot, RecentMessage, Violation};
use crate::core::moderation::ActionError;
use crate::discord::actions::embeds::{self, mention};
use crate::discord::actions::ActionExecutor;
use crate::discord::{Data, Error};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::time::Duration;

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

/// Run the evaluators over a guild message and act on the first violation.
///
/// Returns `true` if the message was removed.
pub async fn handle_message_for_automod(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<bool, Error> {
    if msg.author.bot {
        return Ok(false);
    }

    let guild_id = match msg.guild_id {
        Some(id) => id,
        None => return Ok(false),
    };

    let role_ids: Vec<u64> = msg
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| r.get()).collect())
        .unwrap_or_default();

    // Immune messages never reach the evaluators, so they do not feed the spam window.
    if data
        .whitelist
        .is_immune(msg.author.id.get(), &role_ids, msg.channel_id.get())
        .await
    {
        return Ok(false);
    }

    let now = Utc::now();
    let snapshot = MessageSnapshot {
        author_id: msg.author.id.get(),
        channel_id: msg.channel_id.get(),
        content: msg.content.clone(),
        mention_count: msg.mentions.len(),
        sent_at: now,
    };

    let violation = match data.automod.evaluate(&snapshot).await {
        Some(v) => v,
        None => return Ok(false),
    };

    tracing::info!(
        user_id = snapshot.author_id,
        guild_id = guild_id.get(),
        channel_id = snapshot.channel_id,
        "Auto-moderation: {}",
        violation
    );

    let exec = ActionExecutor::new(&ctx.http, &data.retry);
    let removed = match violation {
        Violation::Spam => clean_up_spam(&exec, msg, data, now).await,
        _ => exec.delete_message(msg.channel_id, msg.id).await,
    };
    if let Err(e) = removed {
        tracing::error!("Failed to remove message flagged for {}: {}", violation, e);
    }

    embeds::send_temporary(
        &ctx.http,
        &data.retry,
        msg.channel_id,
        notice_for(&violation, snapshot.author_id),
        NOTICE_LIFETIME,
    )
    .await;

    Ok(true)
}

/// Delete the author's recent messages that still fall inside the spam window.
async fn clean_up_spam(
    exec: &ActionExecutor<'_>,
    msg: &serenity::Message,
    data: &Data,
    now: DateTime<Utc>,
) -> Result<(), ActionError> {
    let scan = data.automod.config().spam_history_scan;
    let recent: Vec<RecentMessage> = exec
        .recent_messages(msg.channel_id, scan)
        .await?
        .iter()
        .filter_map(|m| {
            Some(RecentMessage {
                author_id: m.author.id.get(),
                message_id: m.id.get(),
                sent_at: snowflake_time(m.id.get())?,
            })
        })
        .collect();

    let ids: Vec<serenity::MessageId> = data
        .automod
        .spam_cleanup_ids(msg.author.id.get(), msg.id.get(), &recent, now)
        .into_iter()
        .map(serenity::MessageId::new)
        .collect();

    exec.delete_messages(msg.channel_id, &ids).await
}

/// Milliseconds since the Discord epoch (2015-01-01).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time encoded in a snowflake, to the millisecond.
pub fn snowflake_time(id: u64) -> Option<DateTime<Utc>> {
    let millis = i64::try_from((id >> 22) + DISCORD_EPOCH_MS).ok()?;
    DateTime::from_timestamp_millis(millis)
}

pub fn notice_for(violation: &Violation, user_id: u64) -> serenity::CreateEmbed {
    let who = mention(user_id);
    match violation {
        Violation::BadWord(_) => embeds::embed(
            "Message Removed",
            format!(
                "{}, your message contained inappropriate content and has been removed.",
                who
            ),
            embeds::RED,
        ),
        Violation::Spam => embeds::embed(
            "Spam Detected",
            format!("{}, please slow down your messages.", who),
            embeds::ORANGE,
        ),
        Violation::ExcessiveCaps => embeds::embed(
            "Excessive Caps",
            format!("{}, please don't use excessive capital letters.", who),
            embeds::ORANGE,
        ),
        Violation::MassMention(_) => embeds::embed(
            "Mass Mention Detected",
            format!("{}, please don't mention too many users at once.", who),
            embeds::RED,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_time_keeps_milliseconds() {
        // 2015-01-01T00:00:01.500Z
        let id = 1_500u64 << 22;
        let sent = snowflake_time(id).unwrap();
        assert_eq!(sent.timestamp_millis(), 1_420_070_401_500);

        // Low bits (worker, process, increment) do not change the time.
        assert_eq!(snowflake_time(id | 0x3F_FFFF), Some(sent));
    }
}
