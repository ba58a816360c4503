use super::{Member, User};
use chrono::{DateTime, Utc};

/// Kind of channel a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Guild,
    Direct,
    Group,
}

impl ChannelKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::Guild => "guild",
            ChannelKind::Direct => "dm",
            ChannelKind::Group => "group",
        }
    }

    /// Direct and group conversations both count as private
    pub fn is_private(&self) -> bool {
        matches!(self, ChannelKind::Direct | ChannelKind::Group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(id: impl Into<String>, kind: ChannelKind) -> Self {
        Self { id: id.into(), kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

impl Guild {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub author: User,
    pub channel: Channel,
    pub guild: Option<Guild>,
    pub member: Option<Member>,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub raw: Option<serde_json::Value>,
}

impl Message {
    pub fn new(author: User, channel: Channel, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            author,
            channel,
            guild: None,
            member: None,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
            raw: None,
        }
    }

    /// Message in a direct conversation with the bot
    pub fn direct(author: User, content: impl Into<String>) -> Self {
        let channel = Channel::new(format!("dm-{}", author.id), ChannelKind::Direct);
        Self::new(author, channel, content)
    }

    /// Message in a guild text channel
    pub fn in_guild(member: Member, guild: Guild, channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::new(member.user.clone(), Channel::new(channel_id, ChannelKind::Guild), content);
        msg.guild = Some(guild);
        msg.member = Some(member);
        msg
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}
