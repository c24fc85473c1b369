use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::Decoder;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    commands::process_line,
    context::{ConnectionId, ServerContext},
    error::Error,
    framing::LineCodec,
    handlers::quit::handle_quit,
    receiver::ReceiverWrapper,
    replies::{Outbox, Reply},
    result::Result,
};

#[derive(Debug)]
pub struct ReplySender(pub mpsc::Sender<Reply>);

/// The loop's grip on a socket: where its replies go, and how to hang up.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub sender: ReplySender,
    pub closer: oneshot::Sender<()>,
}

#[derive(Debug)]
pub enum Event {
    Connected {
        session: Uuid,
        handle: ConnectionHandle,
        peer: Option<SocketAddr>,
    },
    Received {
        session: Uuid,
        bytes: Vec<u8>,
    },
    Closed {
        session: Uuid,
    },
}

struct Connection {
    session: Uuid,
    buffer: BytesMut,
    codec: LineCodec,
    handle: ConnectionHandle,
}

/// Single owner of every connection and of the registries. One event is
/// handled to completion before the next one is looked at.
pub struct Multiplexer {
    ctx: ServerContext,
    connections: BTreeMap<ConnectionId, Connection>,
    by_session: HashMap<Uuid, ConnectionId>,
}

pub async fn run<T>(
    ctx: ServerContext,
    receiver_channel: &mut T,
    mut shutdown_receiver: mpsc::Receiver<()>,
) -> Result<()>
where
    T: ReceiverWrapper<Event>,
{
    let mut multiplexer = Multiplexer::new(ctx);

    loop {
        let received = tokio::select! {
            received = receiver_channel.receive() => match received {
                Some(r) => r,
                None => {
                    return Ok(());
                }
            },
            Some(_) = shutdown_receiver.recv() => {
                info!("Shutdown requested");
                return Ok(());
            }
        };

        multiplexer.handle_event(received).await?;
    }
}

impl Multiplexer {
    pub fn new(ctx: ServerContext) -> Self {
        Multiplexer {
            ctx,
            connections: BTreeMap::new(),
            by_session: HashMap::new(),
        }
    }

    pub async fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Connected {
                session,
                handle,
                peer,
            } => self.register(session, handle, peer),
            Event::Received { session, bytes } => self.receive(session, &bytes).await,
            Event::Closed { session } => {
                let connection_id = match self.by_session.get(&session) {
                    Some(c) => *c,
                    None => return Ok(()),
                };

                info!(connection = connection_id.0, session = %session, "Connection closed by peer");

                let mut outbox = Outbox::default();
                handle_quit(&mut self.ctx, connection_id, &mut outbox)?;
                self.deliver(outbox).await;

                Ok(())
            }
        }
    }

    fn register(
        &mut self,
        session: Uuid,
        handle: ConnectionHandle,
        peer: Option<SocketAddr>,
    ) -> Result<()> {
        if self.by_session.contains_key(&session) {
            return Err(Error::DuplicateConnection { session });
        }

        // running out of slots takes the whole server down
        let connection_id = self.ctx.sessions.register(session)?;

        info!(
            connection = connection_id.0,
            session = %session,
            peer = ?peer,
            connected = self.ctx.sessions.len(),
            "Accepted connection"
        );

        self.by_session.insert(session, connection_id);
        self.connections.insert(
            connection_id,
            Connection {
                session,
                buffer: BytesMut::new(),
                codec: LineCodec::default(),
                handle,
            },
        );

        Ok(())
    }

    async fn receive(&mut self, session: Uuid, bytes: &[u8]) -> Result<()> {
        let connection_id = match self.by_session.get(&session) {
            Some(c) => *c,
            None => {
                debug!(session = %session, "Dropping bytes for a connection that is already gone");
                return Ok(());
            }
        };

        let mut frames = vec![];

        if let Some(conn) = self.connections.get_mut(&connection_id) {
            conn.buffer.extend_from_slice(bytes);

            while let Some(frame) = conn.codec.decode(&mut conn.buffer)? {
                frames.push(frame);
            }
        }

        for frame in frames {
            // a QUIT earlier in the batch discards whatever followed it
            if !self.connections.contains_key(&connection_id) {
                break;
            }

            let outbox = process_line(&mut self.ctx, connection_id, &frame)?;
            self.deliver(outbox).await;
        }

        Ok(())
    }

    async fn deliver(&mut self, outbox: Outbox) {
        for (to, reply) in outbox.replies {
            let conn = match self.connections.get(&to) {
                Some(c) => c,
                None => {
                    warn!(connection = to.0, "No connection to deliver reply to");
                    continue;
                }
            };

            if let Err(e) = conn.handle.sender.0.send(reply).await {
                warn!(connection = to.0, error = %e, "Reply dropped, writer has stopped");
            }
        }

        for connection_id in outbox.closed {
            if let Some(conn) = self.connections.remove(&connection_id) {
                self.by_session.remove(&conn.session);
                // the reader may already have stopped on its own
                let _ = conn.handle.closer.send(());
            }
        }
    }
}
