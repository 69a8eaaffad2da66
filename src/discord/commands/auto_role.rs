// Auto-role for new members and manual role assignment.

use crate::core::moderation::role_assignable_by_bot;
use crate::discord::actions::embeds::{self, mention};
use crate::discord::actions::permissions::ActorContext;
use crate::discord::actions::ActionExecutor;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

const ROLE_TOO_HIGH: &str =
    "❌ I cannot assign this role as it's higher than or equal to my highest role.";

fn role_mention(role_id: serenity::RoleId) -> String {
    format!("<@&{}>", role_id)
}

/// Configure the role new members receive.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    subcommands("set", "remove", "info"),
    subcommand_required,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn autorole(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Give this role to every member who joins.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Role to assign on join"] role: serenity::Role,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ActorContext::load(ctx, &exec).await?;
    actors.require(serenity::Permissions::MANAGE_ROLES, "assign roles")?;
    if !role_assignable_by_bot(role.position, actors.bot_top_position()) {
        ctx.say(ROLE_TOO_HIGH).await?;
        return Ok(());
    }

    ctx.data().auto_role.set(actors.guild.id.get(), role.id.get());
    tracing::info!(
        guild_id = actors.guild.id.get(),
        role_id = role.id.get(),
        "Auto-role set to {}",
        role.name
    );

    let embed = embeds::embed(
        "Auto Role Set",
        format!(
            "New members will automatically receive the {} role.",
            role_mention(role.id)
        ),
        embeds::GREEN,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Stop assigning a role on join.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn remove(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    match ctx.data().auto_role.remove(guild_id.get()) {
        Some(_) => {
            tracing::info!(guild_id = guild_id.get(), "Auto-role removed");
            ctx.say("✅ Auto role assignment has been disabled.").await?;
        }
        None => {
            ctx.say("❌ No auto role is currently set.").await?;
        }
    }
    Ok(())
}

/// Show the current auto-role.
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    let embed = match ctx.data().auto_role.role_for(guild_id.get()) {
        None => embeds::embed(
            "Auto Role Information",
            "No auto role is currently set.",
            embeds::GREY,
        ),
        Some(role_id) => {
            let role_id = serenity::RoleId::new(role_id);
            let found = ctx.guild().and_then(|g| {
                g.roles.get(&role_id).map(|role| {
                    let holders = g
                        .members
                        .values()
                        .filter(|m| m.roles.contains(&role_id))
                        .count();
                    (role.name.clone(), holders)
                })
            });

            match found {
                Some((name, holders)) => embeds::embed(
                    "Auto Role Information",
                    format!("Current auto role: {}", role_mention(role_id)),
                    embeds::BLUE,
                )
                .field("Role Name", name, true)
                .field("Role ID", role_id.to_string(), true)
                .field("Member Count", holders.to_string(), true),
                None => embeds::embed(
                    "Auto Role Information",
                    "Auto role is set but the role no longer exists.",
                    embeds::RED,
                ),
            }
        }
    };

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Give a member a role by hand.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES"
)]
pub async fn assignrole(
    ctx: Context<'_>,
    #[description = "Member to receive the role"] member: serenity::Member,
    #[description = "Role to assign"] role: serenity::Role,
) -> Result<(), Error> {
    let exec = ActionExecutor::new(ctx.http(), &ctx.data().retry);
    let actors = ActorContext::load(ctx, &exec).await?;
    actors.require(serenity::Permissions::MANAGE_ROLES, "assign roles")?;
    if !role_assignable_by_bot(role.position, actors.bot_top_position()) {
        ctx.say(ROLE_TOO_HIGH).await?;
        return Ok(());
    }
    if member.roles.contains(&role.id) {
        ctx.say(format!(
            "❌ {} already has the {} role.",
            mention(member.user.id),
            role_mention(role.id)
        ))
        .await?;
        return Ok(());
    }

    exec.add_role(
        actors.guild.id,
        member.user.id,
        role.id,
        &format!("Manually assigned by {}", ctx.author().name),
    )
    .await?;

    tracing::info!(
        guild_id = actors.guild.id.get(),
        user_id = member.user.id.get(),
        role_id = role.id.get(),
        moderator_id = ctx.author().id.get(),
        "Role assigned"
    );

    let embed = embeds::embed(
        "Role Assigned",
        format!(
            "Successfully assigned {} to {}.",
            role_mention(role.id),
            mention(member.user.id)
        ),
        embeds::GREEN,
    )
    .field("Moderator", mention(ctx.author().id), true);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
