// Discord commands module.
// Each feature gets its own command file.

use crate::discord::{Data, Error};

pub mod afk;
pub mod anti_nuke;
pub mod auto_role;
pub mod automod;
pub mod banning;
pub mod channel;
pub mod moderation;
pub mod owner;
pub mod quarantine;
pub mod timeout;
pub mod warnings;
pub mod whitelist;

/// Every command the framework registers, prefix and slash alike.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        afk::afk(),
        afk::afklist(),
        afk::afkremove(),
        warnings::warn(),
        warnings::warnings(),
        warnings::clearwarns(),
        warnings::removewarn(),
        warnings::warnlist(),
        banning::ban(),
        banning::softban(),
        banning::unban(),
        banning::banlist(),
        banning::baninfo(),
        moderation::kick(),
        moderation::mute(),
        moderation::unmute(),
        moderation::checkperms(),
        timeout::timeout(),
        timeout::untimeout(),
        timeout::timeouts(),
        timeout::timeoutinfo(),
        quarantine::quarantine(),
        quarantine::unquarantine(),
        quarantine::quarantined(),
        auto_role::autorole(),
        auto_role::assignrole(),
        anti_nuke::antinuke(),
        anti_nuke::nukestatus(),
        automod::automod(),
        automod::addbadword(),
        automod::removebadword(),
        whitelist::whitelist(),
        whitelist::whitelist_status(),
        channel::purge(),
        channel::nuke(),
        owner::sync(),
        owner::server_logs(),
    ]
}

/// `on`/`enable`/`true` and `off`/`disable`/`false`, case-insensitive.
pub fn parse_toggle(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "enable" | "true" => Some(true),
        "off" | "disable" | "false" => Some(false),
        _ => None,
    }
}

pub const INVALID_TOGGLE: &str = "❌ Invalid status. Use `on` or `off`.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle() {
        assert_eq!(parse_toggle("ON"), Some(true));
        assert_eq!(parse_toggle(" enable "), Some(true));
        assert_eq!(parse_toggle("false"), Some(false));
        assert_eq!(parse_toggle("disable"), Some(false));
        assert_eq!(parse_toggle("maybe"), None);
    }
}
