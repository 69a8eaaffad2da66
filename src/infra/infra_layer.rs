// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "whitelist/mod.rs"]
pub mod whitelist;

#[path = "server_logs/mod.rs"]
pub mod server_logs;
