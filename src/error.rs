use thiserror::Error;
use uuid::Uuid;

use crate::context::{ChannelId, ConnectionId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid NodeID {node_id}")]
    InvalidNodeId { node_id: u64 },
    #[error("Error loading settings, {0}")]
    Settings(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Too many clients, all {capacity} connection slots are in use")]
    TooManyClients { capacity: usize },
    #[error("No user registered for connection {connection_id:?}")]
    NoSuchUser { connection_id: ConnectionId },
    #[error("No channel in slot {channel_id:?}")]
    NoSuchChannel { channel_id: ChannelId },
    #[error("Connection {session} announced twice")]
    DuplicateConnection { session: Uuid },
}
