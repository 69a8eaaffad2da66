// Maps poise framework errors to notices for the invoking user.

use crate::core::moderation::{ActionError, PolicyViolation};
use crate::discord::actions::action_executor::classify_serenity_error;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

const GENERIC_FAILURE: &str = "❌ Something went wrong while running this command.";

/// Reply to the invoking user; a failed reply is only logged.
async fn notify(ctx: Context<'_>, text: impl Into<String>) {
    if let Err(e) = ctx.say(text).await {
        tracing::warn!("Failed to report command error: {}", e);
    }
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let notice = command_error_notice(&error);
            if notice.is_none() {
                tracing::error!(
                    command = %ctx.command().qualified_name,
                    "Command error: {}",
                    error
                );
            }
            let text = notice.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            notify(ctx, text).await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!(
                "Usage: `{}{}`",
                ctx.data().config.prefix,
                ctx.command().qualified_name
            );
            let description = match input {
                Some(input) => format!("❌ Invalid argument: `{}`\n{}", input, usage),
                None => format!("❌ Missing required argument.\n{}", usage),
            };
            notify(ctx, description).await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            notify(ctx, "❌ You don't have permission to use this command.").await;
        }
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            tracing::warn!(
                command = %ctx.command().qualified_name,
                "Bot is missing permissions: {}",
                missing_permissions
            );
            notify(
                ctx,
                format!(
                    "❌ I don't have the required permissions: {}",
                    missing_permissions
                ),
            )
            .await;
        }
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            notify(ctx, "❌ This command is restricted to the bot owner.").await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            notify(ctx, "❌ This command can only be used in a server.").await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            tracing::debug!("Unknown command invocation");
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling framework error: {}", e);
            }
        }
    }
}

/// Text for errors the moderator should see verbatim. `None` means the error
/// is unexpected and only a generic notice is shown.
pub fn command_error_notice(error: &Error) -> Option<String> {
    if let Some(violation) = error.downcast_ref::<PolicyViolation>() {
        return Some(violation.to_string());
    }
    if let Some(action) = error.downcast_ref::<ActionError>() {
        if !action.is_user_facing() {
            tracing::error!("Moderation action failed: {}", action);
        }
        return Some(action.user_message());
    }
    if let Some(err) = error.downcast_ref::<serenity::Error>() {
        let action = classify_serenity_error(err);
        if action.is_user_facing() {
            return Some(action.user_message());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violation_is_shown_verbatim() {
        let error: Error = PolicyViolation::TargetIsSelf("ban".into()).into();
        assert_eq!(
            command_error_notice(&error),
            Some("❌ You cannot ban yourself.".to_string())
        );
    }

    #[test]
    fn test_action_errors_use_their_notice() {
        let error: Error = ActionError::NotFound("member".into()).into();
        assert_eq!(
            command_error_notice(&error),
            Some("❌ Not found: member".to_string())
        );

        let error: Error = ActionError::Api("boom".into()).into();
        assert_eq!(
            command_error_notice(&error),
            Some("❌ An unexpected error occurred.".to_string())
        );
    }

    #[test]
    fn test_unknown_errors_get_no_notice() {
        let error: Error = "database exploded".into();
        assert_eq!(command_error_notice(&error), None);
    }
}
