// AFK notices: welcome back the author and report mentioned AFK users.

use crate::core::afk::{format_elapsed, AfkMention};
use crate::discord::actions::embeds::{self, mention};
use crate::discord::{Data, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use std::time::Duration;

const WELCOME_BACK_LIFETIME: Duration = Duration::from_secs(5);
const MENTION_NOTICE_LIFETIME: Duration = Duration::from_secs(10);

pub async fn handle_message_for_afk(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if msg.author.bot || msg.guild_id.is_none() {
        return Ok(());
    }

    let author_id = msg.author.id.get();
    let mentioned: Vec<u64> = msg.mentions.iter().map(|u| u.id.get()).collect();
    let now = Utc::now();

    // Setting AFK must not immediately clear the entry it just created.
    let outcome = if is_afk_command(&msg.content, &data.config.prefix) {
        data.afk.on_mentions(author_id, &mentioned, now)
    } else {
        data.afk.on_message(author_id, &mentioned, now)
    };

    if outcome.returned.is_some() {
        tracing::info!(user_id = author_id, "User returned from AFK");
        embeds::send_temporary(
            &ctx.http,
            &data.retry,
            msg.channel_id,
            embeds::embed(
                "Welcome Back!",
                format!("{} is no longer AFK.", mention(author_id)),
                embeds::GREEN,
            ),
            WELCOME_BACK_LIFETIME,
        )
        .await;
    }

    for afk in &outcome.mentioned {
        embeds::send_temporary(
            &ctx.http,
            &data.retry,
            msg.channel_id,
            mention_notice(afk),
            MENTION_NOTICE_LIFETIME,
        )
        .await;
    }

    Ok(())
}

fn mention_notice(afk: &AfkMention) -> serenity::CreateEmbed {
    embeds::embed(
        "User is AFK",
        format!(
            "{} is currently AFK: {}",
            mention(afk.entry.user_id),
            afk.entry.reason
        ),
        embeds::ORANGE,
    )
    .field("AFK for", format_elapsed(afk.elapsed), false)
}

/// Whether `content` invokes the prefix form of the afk command.
pub fn is_afk_command(content: &str, prefix: &str) -> bool {
    let Some(rest) = content
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &content[prefix.len()..])
    else {
        return false;
    };
    let command = rest.split_whitespace().next().unwrap_or("");
    command.eq_ignore_ascii_case("afk")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_afk_command() {
        assert!(is_afk_command("V!afk lunch", "V!"));
        assert!(is_afk_command("v!AFK", "V!"));
        assert!(!is_afk_command("V!afklist", "V!"));
        assert!(!is_afk_command("afk", "V!"));
        assert!(!is_afk_command("V!", "V!"));
    }
}
