/// A guild the bot joined or left, as posted to the owner's log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildLogEntry {
    pub guild_id: u64,
    pub name: String,
    pub member_count: u64,
    pub owner_id: Option<u64>,
    /// Guilds the bot is in after this event.
    pub total_guilds: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildLogEvent {
    Joined,
    Left,
}

impl GuildLogEvent {
    pub fn title(self) -> &'static str {
        match self {
            GuildLogEvent::Joined => "📥 Joined a new server",
            GuildLogEvent::Left => "📤 Removed from a server",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            GuildLogEvent::Joined => 0x2ECC71,
            GuildLogEvent::Left => 0xE74C3C,
        }
    }
}
