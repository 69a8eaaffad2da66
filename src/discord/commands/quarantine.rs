// Quarantine: a role that strips text and voice participation everywhere.

use crate::discord::actions::embeds::{self, mention, NO_REASON};
use crate::discord::actions::permissions::ensure_can_target;
use crate::discord::actions::restriction_roles::{ensure_restriction_role, find_restriction_role};
use crate::discord::actions::{ActionExecutor, RestrictionRole};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const QUARANTINE_LIST_LIMIT: usize = 15;

/// Quarantine a member.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn quarantine(
    ctx: Context<'_>,
    #[description = "Member to quarantine"] member: serenity::Member,
    #[description = "Reason for the quarantine"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "quarantine",
        &member,
        serenity::Permissions::MANAGE_ROLES,
        false,
    )
    .await?;
    let reason = reason.unwrap_or_else(|| NO_REASON.to_string());

    let role_id =
        ensure_restriction_role(&exec, actors.guild.id, RestrictionRole::Quarantined).await?;
    if member.roles.contains(&role_id) {
        ctx.say(format!(
            "❌ {} is already quarantined.",
            mention(member.user.id)
        ))
        .await?;
        return Ok(());
    }

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "🔒 You have been quarantined",
            format!("You have been quarantined in **{}**", actors.guild.name),
            embeds::DARK_RED,
            Some(&reason),
            ctx.author(),
        ),
    )
    .await;

    exec.add_role(
        actors.guild.id,
        member.user.id,
        role_id,
        &format!("Quarantined by {}: {}", ctx.author().name, reason),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member quarantined: {}",
        reason
    );

    let embed = embeds::embed(
        "User Quarantined",
        format!("{} has been quarantined.", mention(member.user.id)),
        embeds::DARK_RED,
    )
    .field("Reason", reason.as_str(), false)
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Release a member from quarantine.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn unquarantine(
    ctx: Context<'_>,
    #[description = "Member to release"] member: serenity::Member,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ensure_can_target(
        ctx,
        &exec,
        "unquarantine",
        &member,
        serenity::Permissions::MANAGE_ROLES,
        false,
    )
    .await?;

    let Some(role_id) =
        find_restriction_role(&exec, actors.guild.id, RestrictionRole::Quarantined).await?
    else {
        ctx.say("❌ Quarantine role not found.").await?;
        return Ok(());
    };
    if !member.roles.contains(&role_id) {
        ctx.say(format!("❌ {} is not quarantined.", mention(member.user.id)))
            .await?;
        return Ok(());
    }

    exec.remove_role(
        actors.guild.id,
        member.user.id,
        role_id,
        &format!("Unquarantined by {}", ctx.author().name),
    )
    .await?;

    exec.dm_best_effort(
        member.user.id,
        embeds::dm_embed(
            "🔓 Quarantine Removed",
            format!(
                "Your quarantine has been lifted in **{}**",
                actors.guild.name
            ),
            embeds::GREEN,
            None,
            ctx.author(),
        ),
    )
    .await;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        moderator_id = ctx.author().id.get(),
        "Member released from quarantine"
    );

    let embed = embeds::embed(
        "Quarantine Removed",
        format!("{} has been unquarantined.", mention(member.user.id)),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List quarantined members.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn quarantined(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);

    let Some(role_id) = find_restriction_role(&exec, guild_id, RestrictionRole::Quarantined).await?
    else {
        ctx.say("❌ Quarantine role not found.").await?;
        return Ok(());
    };

    let members = exec.members(guild_id).await?;
    let held: Vec<&serenity::Member> = members
        .iter()
        .filter(|m| m.roles.contains(&role_id))
        .collect();

    if held.is_empty() {
        ctx.say("✅ No users are currently quarantined.").await?;
        return Ok(());
    }

    let lines: Vec<String> = held
        .iter()
        .take(QUARANTINE_LIST_LIMIT)
        .map(|m| format!("{} ({})", mention(m.user.id), m.display_name()))
        .collect();

    let mut embed = embeds::embed("Quarantined Users", lines.join("\n"), embeds::DARK_RED);
    if held.len() > QUARANTINE_LIST_LIMIT {
        embed = embed.field(
            "Note",
            format!(
                "Showing {} of {} quarantined users.",
                QUARANTINE_LIST_LIMIT,
                held.len()
            ),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
