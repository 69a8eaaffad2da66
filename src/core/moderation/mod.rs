// Core moderation module - shared state, rate windows and the permission policy.
// Feature services (automod, anti-nuke, warnings, afk) build on top of this.

pub mod action_error;
pub mod duration;
pub mod moderation_models;
pub mod policy;
pub mod rate_window;
pub mod retry;
pub mod state_store;

pub use action_error::ActionError;
pub use moderation_models::*;
pub use policy::{check_target, role_assignable_by_bot, MemberFacts, PolicyViolation, TargetCheck};
pub use rate_window::{RateWindow, RateWindows};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use state_store::ModerationState;
