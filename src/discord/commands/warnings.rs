// Warning commands and automatic escalation.

use crate::core::warnings::Escalation;
use crate::discord::actions::embeds::{self, mention, NO_REASON};
use crate::discord::actions::permissions::{ensure_can_target, retain_guild_members};
use crate::discord::actions::restriction_roles::ensure_restriction_role;
use crate::discord::actions::{ActionExecutor, RestrictionRole};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const WARN_LIST_LIMIT: usize = 15;

/// Warn a member. Repeated warnings mute and then ban.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] member: serenity::Member,
    #[description = "Reason for the warning"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "warn",
        &member,
        serenity::Permissions::MANAGE_MESSAGES,
        false,
    )
    .await?;

    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());
    let outcome = ctx.data().warnings.warn(member.user.id.get());
    let policy = ctx.data().warnings.policy();

    exec.dm_best_effort(
        member.user.id,
        embeds::embed(
            "⚠️ Warning Received",
            format!("You have been warned in **{}**", actors.guild.name),
            embeds::YELLOW,
        )
        .field("Reason", reason.as_str(), false)
        .field("Total Warnings", outcome.count.to_string(), true)
        .field("Moderator", mention(ctx.author().id), true),
    )
    .await;

    let embed = embeds::embed(
        "Warning Issued",
        format!("{} has been warned.", mention(member.user.id)),
        embeds::ORANGE,
    )
    .field("Reason", reason.as_str(), false)
    .field(
        "Total Warnings",
        format!("{}/{}", outcome.count, policy.ban_at),
        true,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        count = outcome.count,
        "Member warned: {}",
        reason
    );

    match outcome.escalation {
        Escalation::Notice => {}
        Escalation::Mute => {
            let role_id =
                ensure_restriction_role(&exec, actors.guild.id, RestrictionRole::Muted).await?;
            exec.add_role(
                actors.guild.id,
                member.user.id,
                role_id,
                &format!("Auto-mute for {} warnings", policy.mute_at),
            )
            .await?;
            tracing::info!(user_id = member.user.id.get(), "Member auto-muted");

            let embed = embeds::embed(
                "Auto-Mute",
                format!(
                    "{} has been automatically muted for receiving {} warnings.",
                    mention(member.user.id),
                    policy.mute_at
                ),
                embeds::RED,
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Escalation::Ban => {
            exec.ban(
                actors.guild.id,
                member.user.id,
                0,
                &format!("Reached maximum warnings ({})", policy.ban_at),
            )
            .await?;
            tracing::info!(user_id = member.user.id.get(), "Member auto-banned");

            let embed = embeds::embed(
                "Auto-Ban",
                format!(
                    "{} has been automatically banned for reaching {} warnings.",
                    mention(member.user.id),
                    policy.ban_at
                ),
                embeds::RED,
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Show a member's warning count.
#[poise::command(prefix_command, slash_command, guild_only, aliases("warns"))]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "Member to check (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
    let user_id = member
        .as_ref()
        .map(|m| m.user.id)
        .unwrap_or(ctx.author().id);
    let count = ctx.data().warnings.count(user_id.get());
    let policy = ctx.data().warnings.policy();

    let colour = if policy.is_near_limit(count) {
        embeds::RED
    } else if count > 0 {
        embeds::YELLOW
    } else {
        embeds::BLUE
    };

    let mut embed = embeds::embed(
        "Warning Information",
        format!(
            "**User:** {}\n**Warnings:** {}/{}",
            mention(user_id),
            count,
            policy.ban_at
        ),
        colour,
    );
    if policy.is_near_limit(count) {
        embed = embed.field("⚠️ Warning", "User is close to maximum warnings!", false);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Clear every warning a member has.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn clearwarns(
    ctx: Context<'_>,
    #[description = "Member to clear"] member: serenity::Member,
) -> Result<(), Error> {
    let old = ctx.data().warnings.clear(member.user.id.get());
    if old == 0 {
        ctx.say(format!(
            "❌ {} has no warnings to clear.",
            mention(member.user.id)
        ))
        .await?;
        return Ok(());
    }

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        cleared = old,
        "Warnings cleared"
    );
    let embed = embeds::embed(
        "Warnings Cleared",
        format!("Cleared {} warning(s) for {}.", old, mention(member.user.id)),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Remove some of a member's warnings.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn removewarn(
    ctx: Context<'_>,
    #[description = "Member to update"] member: serenity::Member,
    #[description = "How many warnings to remove (default 1)"] amount: Option<i64>,
) -> Result<(), Error> {
    let amount = amount.unwrap_or(1);
    if amount < 1 {
        ctx.say("❌ Amount must be at least 1.").await?;
        return Ok(());
    }
    let amount = u32::try_from(amount).unwrap_or(u32::MAX);

    let (old, new) = ctx.data().warnings.remove(member.user.id.get(), amount);
    if old == 0 {
        ctx.say(format!(
            "❌ {} has no warnings to remove.",
            mention(member.user.id)
        ))
        .await?;
        return Ok(());
    }

    tracing::info!(
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        removed = old - new,
        "Warnings removed"
    );
    let embed = embeds::embed(
        "Warnings Removed",
        format!(
            "Removed {} warning(s) from {}.",
            old - new,
            mention(member.user.id)
        ),
        embeds::GREEN,
    )
    .field("Previous Warnings", old.to_string(), true)
    .field("Current Warnings", new.to_string(), true)
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List members with warnings, highest first.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn warnlist(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let all = ctx.data().warnings.list();
    let here = retain_guild_members(ctx, guild_id, all.iter().map(|(id, _)| *id));
    let warned: Vec<(u64, u32)> = all.into_iter().filter(|(id, _)| here.contains(id)).collect();

    if warned.is_empty() {
        ctx.say("✅ No users currently have warnings in this server.")
            .await?;
        return Ok(());
    }

    let lines: Vec<String> = warned
        .iter()
        .take(WARN_LIST_LIMIT)
        .map(|(id, count)| format!("{} - {} warning(s)", mention(*id), count))
        .collect();

    let mut embed = embeds::embed("Server Warning List", lines.join("\n"), embeds::ORANGE);
    if warned.len() > WARN_LIST_LIMIT {
        embed = embed.field(
            "Note",
            format!(
                "Showing top {} users. {} more users have warnings.",
                WARN_LIST_LIMIT,
                warned.len() - WARN_LIST_LIMIT
            ),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
