// Gateway events outside of message handling, plus the framework error hook.

pub mod framework_errors;
pub mod guild_events;

pub use framework_errors::on_error;
