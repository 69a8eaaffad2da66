// Every outbound moderation call goes through here.
//
// Each method wraps one serenity request in `retry_with_backoff` and converts
// the serenity error into an `ActionError`, so commands and event handlers
// only ever see the core taxonomy.

use crate::core::moderation::{retry_with_backoff, ActionError, RetryPolicy};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

impl From<serenity::Error> for ActionError {
    fn from(err: serenity::Error) -> Self {
        classify_serenity_error(&err)
    }
}

pub fn classify_serenity_error(err: &serenity::Error) -> ActionError {
    match err {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) => {
            // 50013 is "Missing Permissions" even when the status is odd.
            if response.error.code == 50013 {
                return ActionError::Forbidden(response.error.message.clone());
            }
            ActionError::from_status(
                response.status_code.as_u16(),
                response.error.message.clone(),
            )
        }
        serenity::Error::Model(::serenity::model::ModelError::InvalidPermissions { .. }) => {
            ActionError::Forbidden("missing permissions".to_string())
        }
        serenity::Error::Model(::serenity::model::ModelError::Hierarchy) => {
            ActionError::Forbidden("role hierarchy".to_string())
        }
        other => ActionError::Api(other.to_string()),
    }
}

pub struct ActionExecutor<'a> {
    http: &'a serenity::Http,
    policy: &'a RetryPolicy,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(http: &'a serenity::Http, policy: &'a RetryPolicy) -> Self {
        Self { http, policy }
    }

    pub async fn ban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        delete_days: u8,
        reason: &str,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "ban", || async move {
            guild_id
                .ban_with_reason(self.http, user_id, delete_days, reason)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn unban(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "unban", || async move {
            self.http
                .remove_ban(guild_id, user_id, Some(reason))
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn kick(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "kick", || async move {
            guild_id
                .kick_with_reason(self.http, user_id, reason)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn timeout(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        until: serenity::Timestamp,
        reason: &str,
    ) -> Result<serenity::Member, ActionError> {
        retry_with_backoff(self.policy, "timeout", || async move {
            guild_id
                .edit_member(
                    self.http,
                    user_id,
                    serenity::EditMember::new()
                        .disable_communication_until_datetime(until)
                        .audit_log_reason(reason),
                )
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn remove_timeout(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        reason: &str,
    ) -> Result<serenity::Member, ActionError> {
        retry_with_backoff(self.policy, "remove_timeout", || async move {
            guild_id
                .edit_member(
                    self.http,
                    user_id,
                    serenity::EditMember::new()
                        .enable_communication()
                        .audit_log_reason(reason),
                )
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn add_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "add_role", || async move {
            self.http
                .add_member_role(guild_id, user_id, role_id, Some(reason))
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn remove_role(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
        role_id: serenity::RoleId,
        reason: &str,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "remove_role", || async move {
            self.http
                .remove_member_role(guild_id, user_id, role_id, Some(reason))
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn create_role(
        &self,
        guild_id: serenity::GuildId,
        name: &str,
        colour: u32,
        reason: &str,
    ) -> Result<serenity::Role, ActionError> {
        retry_with_backoff(self.policy, "create_role", || async move {
            guild_id
                .create_role(
                    self.http,
                    serenity::EditRole::new()
                        .name(name)
                        .colour(colour)
                        .permissions(serenity::Permissions::empty())
                        .audit_log_reason(reason),
                )
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn set_role_overwrite(
        &self,
        channel_id: serenity::ChannelId,
        role_id: serenity::RoleId,
        deny: serenity::Permissions,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "set_overwrite", || async move {
            channel_id
                .create_permission(
                    self.http,
                    serenity::PermissionOverwrite {
                        allow: serenity::Permissions::empty(),
                        deny,
                        kind: serenity::PermissionOverwriteType::Role(role_id),
                    },
                )
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn guild(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<serenity::PartialGuild, ActionError> {
        retry_with_backoff(self.policy, "get_guild", || async move {
            guild_id
                .to_partial_guild(self.http)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn roles(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<HashMap<serenity::RoleId, serenity::Role>, ActionError> {
        retry_with_backoff(self.policy, "get_roles", || async move {
            guild_id.roles(self.http).await.map_err(ActionError::from)
        })
        .await
    }

    pub async fn channels(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<HashMap<serenity::ChannelId, serenity::GuildChannel>, ActionError> {
        retry_with_backoff(self.policy, "get_channels", || async move {
            guild_id.channels(self.http).await.map_err(ActionError::from)
        })
        .await
    }

    pub async fn member(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<serenity::Member, ActionError> {
        retry_with_backoff(self.policy, "get_member", || async move {
            guild_id
                .member(self.http, user_id)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    /// First page of members (up to 1000); enough for the list commands.
    pub async fn members(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<Vec<serenity::Member>, ActionError> {
        retry_with_backoff(self.policy, "get_members", || async move {
            guild_id
                .members(self.http, Some(1000), None)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn user(&self, user_id: serenity::UserId) -> Result<serenity::User, ActionError> {
        retry_with_backoff(self.policy, "get_user", || async move {
            user_id.to_user(self.http).await.map_err(ActionError::from)
        })
        .await
    }

    pub async fn bans(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<Vec<serenity::Ban>, ActionError> {
        retry_with_backoff(self.policy, "get_bans", || async move {
            guild_id
                .bans(self.http, None, None)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn recent_messages(
        &self,
        channel_id: serenity::ChannelId,
        limit: u8,
    ) -> Result<Vec<serenity::Message>, ActionError> {
        retry_with_backoff(self.policy, "get_messages", || async move {
            channel_id
                .messages(self.http, serenity::GetMessages::new().limit(limit))
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn delete_message(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
    ) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "delete_message", || async move {
            channel_id
                .delete_message(self.http, message_id)
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    /// Bulk delete needs at least two ids; a single id falls back to a plain delete.
    pub async fn delete_messages(
        &self,
        channel_id: serenity::ChannelId,
        message_ids: &[serenity::MessageId],
    ) -> Result<(), ActionError> {
        match message_ids {
            [] => Ok(()),
            [single] => self.delete_message(channel_id, *single).await,
            many => {
                retry_with_backoff(self.policy, "bulk_delete", || async move {
                    channel_id
                        .delete_messages(self.http, many)
                        .await
                        .map_err(ActionError::from)
                })
                .await
            }
        }
    }

    pub async fn send(
        &self,
        channel_id: serenity::ChannelId,
        message: serenity::CreateMessage,
    ) -> Result<serenity::Message, ActionError> {
        let message = &message;
        retry_with_backoff(self.policy, "send_message", || async move {
            channel_id
                .send_message(self.http, message.clone())
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn send_embed(
        &self,
        channel_id: serenity::ChannelId,
        embed: serenity::CreateEmbed,
    ) -> Result<serenity::Message, ActionError> {
        self.send(channel_id, serenity::CreateMessage::new().embed(embed))
            .await
    }

    /// Direct messages are a courtesy; closed DMs are not an error.
    pub async fn dm_best_effort(&self, user_id: serenity::UserId, embed: serenity::CreateEmbed) {
        let message = serenity::CreateMessage::new().embed(embed);
        let message = &message;
        let result = retry_with_backoff(self.policy, "direct_message", || async move {
            user_id
                .direct_message(self.http, message.clone())
                .await
                .map_err(ActionError::from)
        })
        .await;

        if let Err(e) = result {
            tracing::debug!(user_id = user_id.get(), "Could not DM user: {}", e);
        }
    }

    pub async fn edit_message(
        &self,
        channel_id: serenity::ChannelId,
        message_id: serenity::MessageId,
        edit: serenity::EditMessage,
    ) -> Result<serenity::Message, ActionError> {
        let edit = &edit;
        retry_with_backoff(self.policy, "edit_message", || async move {
            channel_id
                .edit_message(self.http, message_id, edit.clone())
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn respond(
        &self,
        interaction: &serenity::ComponentInteraction,
        response: serenity::CreateInteractionResponse,
    ) -> Result<(), ActionError> {
        let response = &response;
        retry_with_backoff(self.policy, "interaction_response", || async move {
            interaction
                .create_response(self.http, response.clone())
                .await
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn delete_channel(&self, channel_id: serenity::ChannelId) -> Result<(), ActionError> {
        retry_with_backoff(self.policy, "delete_channel", || async move {
            channel_id
                .delete(self.http)
                .await
                .map(|_| ())
                .map_err(ActionError::from)
        })
        .await
    }

    pub async fn create_channel(
        &self,
        guild_id: serenity::GuildId,
        builder: serenity::CreateChannel<'_>,
    ) -> Result<serenity::GuildChannel, ActionError> {
        let builder = &builder;
        retry_with_backoff(self.policy, "create_channel", || async move {
            guild_id
                .create_channel(self.http, builder.clone())
                .await
                .map_err(ActionError::from)
        })
        .await
    }
}
