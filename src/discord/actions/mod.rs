// Outbound Discord calls and the helpers commands share around them.

pub mod action_executor;
pub mod confirmation;
pub mod embeds;
pub mod permissions;
pub mod restriction_roles;

pub use action_executor::ActionExecutor;
pub use restriction_roles::RestrictionRole;
