use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{channels::ChannelRegistry, sessions::SessionRegistry, settings::Settings};

/// Identity value every field holds until the client registers it.
pub const ANONYMOUS: &str = "ANONYMOUS";

/// Slot index of a connection. Stable for the lifetime of the connection,
/// reused once the connection is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub usize);

#[derive(Debug)]
pub struct UserContext {
    pub connection_id: ConnectionId,
    pub session: Uuid,
    pub nickname: String,
    pub username: String,
    pub hostname: String,
    pub realname: String,
    pub channel: Option<ChannelId>,
}

impl UserContext {
    pub fn new(connection_id: ConnectionId, session: Uuid) -> Self {
        UserContext {
            connection_id,
            session,
            nickname: ANONYMOUS.to_string(),
            username: ANONYMOUS.to_string(),
            hostname: ANONYMOUS.to_string(),
            realname: ANONYMOUS.to_string(),
            channel: None,
        }
    }

    pub fn has_nickname(&self) -> bool {
        self.nickname != ANONYMOUS
    }

    pub fn has_username(&self) -> bool {
        self.username != ANONYMOUS
    }
}

#[derive(Debug)]
pub struct ChannelContext {
    pub channel_id: ChannelId,
    pub name: String,
    pub members: BTreeSet<ConnectionId>,
}

/// Everything the command handlers read and mutate. Owned by the event loop
/// and lent to one handler at a time.
pub struct ServerContext {
    pub max_name_len: usize,
    pub sessions: SessionRegistry,
    pub channels: ChannelRegistry,
}

impl ServerContext {
    pub fn new(settings: &Settings) -> Self {
        ServerContext {
            max_name_len: settings.max_name_len,
            sessions: SessionRegistry::new(settings.max_connections),
            channels: ChannelRegistry::new(settings.max_channels, settings.max_channel_members),
        }
    }

    /// Adds the user to the channel's membership and points the user at the
    /// channel. Returns false when the channel has no free membership slot.
    pub fn enter_channel(&mut self, connection_id: ConnectionId, channel_id: ChannelId) -> bool {
        if !self.channels.add_member(channel_id, connection_id) {
            return false;
        }

        if let Some(user) = self.sessions.get_mut(connection_id) {
            user.channel = Some(channel_id);
        }

        true
    }

    /// Clears both sides of the user's membership, returning the channel left.
    pub fn leave_channel(&mut self, connection_id: ConnectionId) -> Option<ChannelId> {
        let channel_id = self.sessions.get_mut(connection_id)?.channel.take()?;
        self.channels.remove_member(channel_id, connection_id);
        Some(channel_id)
    }
}
