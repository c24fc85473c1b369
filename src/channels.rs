use std::collections::BTreeSet;

use crate::context::{ChannelContext, ChannelId, ConnectionId};

/// Channels in creation order. A channel keeps its slot for the life of the
/// server, even once its last member has left.
pub struct ChannelRegistry {
    channels: Vec<ChannelContext>,
    max_channels: usize,
    max_members: usize,
}

impl ChannelRegistry {
    pub fn new(max_channels: usize, max_members: usize) -> Self {
        ChannelRegistry {
            channels: vec![],
            max_channels,
            max_members,
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.channel_id)
    }

    /// Looks the channel up, creating it on first use. `None` means every
    /// channel slot is taken.
    pub fn get_or_create(&mut self, name: &str) -> Option<ChannelId> {
        if let Some(existing) = self.find_by_name(name) {
            return Some(existing);
        }

        if self.channels.len() >= self.max_channels {
            return None;
        }

        let channel_id = ChannelId(self.channels.len());
        self.channels.push(ChannelContext {
            channel_id,
            name: name.to_string(),
            members: BTreeSet::new(),
        });

        Some(channel_id)
    }

    pub fn get(&self, channel_id: ChannelId) -> Option<&ChannelContext> {
        self.channels.get(channel_id.0)
    }

    /// False when the channel is unknown or already at full membership.
    pub fn add_member(&mut self, channel_id: ChannelId, member: ConnectionId) -> bool {
        let max_members = self.max_members;

        match self.channels.get_mut(channel_id.0) {
            Some(c) if c.members.contains(&member) => true,
            Some(c) if c.members.len() < max_members => c.members.insert(member),
            _ => false,
        }
    }

    pub fn remove_member(&mut self, channel_id: ChannelId, member: ConnectionId) -> bool {
        match self.channels.get_mut(channel_id.0) {
            Some(c) => c.members.remove(&member),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelContext> {
        self.channels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent_by_name() {
        let mut channels = ChannelRegistry::new(4, 4);

        let first = channels.get_or_create("#rust").unwrap();
        let again = channels.get_or_create("#rust").unwrap();
        let other = channels.get_or_create("#Rust").unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(2, channels.iter().count());
    }

    #[test]
    fn get_or_create_past_capacity_is_none() {
        let mut channels = ChannelRegistry::new(1, 4);
        channels.get_or_create("#a").unwrap();

        assert_eq!(None, channels.get_or_create("#b"));
        assert!(channels.find_by_name("#a").is_some());
    }

    #[test]
    fn add_member_full_channel_is_refused() {
        let mut channels = ChannelRegistry::new(4, 2);
        let chan = channels.get_or_create("#a").unwrap();

        assert!(channels.add_member(chan, ConnectionId(0)));
        assert!(channels.add_member(chan, ConnectionId(1)));
        assert!(!channels.add_member(chan, ConnectionId(2)));
        assert!(channels.add_member(chan, ConnectionId(1)));
        assert_eq!(2, channels.get(chan).unwrap().members.len());
    }

    #[test]
    fn emptied_channel_persists() {
        let mut channels = ChannelRegistry::new(4, 4);
        let chan = channels.get_or_create("#a").unwrap();
        channels.add_member(chan, ConnectionId(0));

        assert!(channels.remove_member(chan, ConnectionId(0)));
        assert!(!channels.remove_member(chan, ConnectionId(0)));
        assert_eq!(Some(chan), channels.find_by_name("#a"));
    }
}
