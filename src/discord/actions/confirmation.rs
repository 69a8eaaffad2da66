// Confirm/decline buttons for destructive commands.

use super::action_executor::ActionExecutor;
use crate::core::moderation::{retry_with_backoff, ActionError};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

pub enum ConfirmationResult {
    Confirmed(serenity::ComponentInteraction),
    Declined(serenity::ComponentInteraction),
    TimedOut(serenity::Message),
}

/// Post `embed` with Confirm/Decline buttons and wait for the invoking user.
/// Clicks from anyone else are ignored.
pub async fn prompt_confirm_decline(
    ctx: Context<'_>,
    embed: serenity::CreateEmbed,
    timeout: Duration,
) -> Result<ConfirmationResult, Error> {
    let ctx_id = ctx.id();
    let confirm_id = format!("{}_confirm", ctx_id);
    let decline_id = format!("{}_decline", ctx_id);

    let reply = poise::CreateReply::default()
        .embed(embed)
        .components(vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Confirm")
                .style(serenity::ButtonStyle::Danger),
            serenity::CreateButton::new(&decline_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Secondary),
        ])]);
    let reply = &reply;
    let policy = &ctx.data().retry;

    let handle = retry_with_backoff(policy, "confirmation_prompt", || async move {
        ctx.send(reply.clone()).await.map_err(ActionError::from)
    })
    .await?;
    let handle = &handle;
    let message = retry_with_backoff(policy, "confirmation_message", || async move {
        handle
            .message()
            .await
            .map(|m| m.into_owned())
            .map_err(ActionError::from)
    })
    .await?;

    let interaction = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await;

    let Some(interaction) = interaction else {
        return Ok(ConfirmationResult::TimedOut(message));
    };

    if interaction.data.custom_id == decline_id {
        return Ok(ConfirmationResult::Declined(interaction));
    }

    Ok(ConfirmationResult::Confirmed(interaction))
}

/// Replace the prompt with `text` and drop the buttons. Returns the
/// interaction only when the user confirmed.
pub async fn resolve_confirmation(
    ctx: Context<'_>,
    confirmation: ConfirmationResult,
    timed_out_text: &str,
    declined_text: &str,
    processing_text: &str,
) -> Result<Option<serenity::ComponentInteraction>, Error> {
    match confirmation {
        ConfirmationResult::TimedOut(message) => {
            executor(ctx)
                .edit_message(
                    message.channel_id,
                    message.id,
                    serenity::EditMessage::new()
                        .content(timed_out_text)
                        .embeds(vec![])
                        .components(vec![]),
                )
                .await?;
            Ok(None)
        }
        ConfirmationResult::Declined(interaction) => {
            update_prompt(ctx, &interaction, declined_text).await?;
            Ok(None)
        }
        ConfirmationResult::Confirmed(interaction) => {
            update_prompt(ctx, &interaction, processing_text).await?;
            Ok(Some(interaction))
        }
    }
}

fn executor(ctx: Context<'_>) -> ActionExecutor<'_> {
    ActionExecutor::new(ctx.http(), &ctx.data().retry)
}

async fn update_prompt(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
    text: &str,
) -> Result<(), Error> {
    executor(ctx)
        .respond(
            interaction,
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(text)
                    .embeds(vec![])
                    .components(vec![]),
            ),
        )
        .await?;
    Ok(())
}
