use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::TcpListener,
    sync::{mpsc, oneshot},
};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    client_sender::run_sender,
    framing::MAX_LINE_LEN,
    message_handler::{ConnectionHandle, Event, ReplySender},
};

/// Accepts clients forever. The loop learns about a connection before its
/// reader is spawned, so a `Received` never arrives for an unknown session.
pub async fn accept_connections(
    listener: TcpListener,
    events: mpsc::Sender<Event>,
    reply_queue_len: usize,
) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        let session = Uuid::new_v4();
        let (read_half, write_half) = stream.into_split();
        let (reply_sender, reply_receiver) = mpsc::channel(reply_queue_len);
        let (closer, close_receiver) = oneshot::channel();

        let connected = Event::Connected {
            session,
            handle: ConnectionHandle {
                sender: ReplySender(reply_sender),
                closer,
            },
            peer: Some(peer),
        };

        if events.send(connected).await.is_err() {
            info!("Event loop has stopped, no longer accepting connections");
            return;
        }

        tokio::spawn(async move {
            if let Err(e) = run_sender(session, write_half, reply_receiver).await {
                debug!(session = %session, error = %e, "Writer stopped");
            }
        });

        tokio::spawn(run_listener(session, read_half, events.clone(), close_receiver));
    }
}

/// Forwards raw bytes from the client until EOF, a read error, or the loop
/// telling us to stop. Framing happens on the loop side.
pub async fn run_listener<R>(
    session: Uuid,
    mut reader: R,
    events: mpsc::Sender<Event>,
    mut close: oneshot::Receiver<()>,
) where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; MAX_LINE_LEN];

    loop {
        let read = tokio::select! {
            read = reader.read(&mut buffer) => read,
            _ = &mut close => {
                debug!(session = %session, "Listener closed by server");
                return;
            }
        };

        let event = match read {
            Ok(0) => Event::Closed { session },
            Ok(n) => Event::Received {
                session,
                bytes: buffer[..n].to_vec(),
            },
            Err(e) => {
                debug!(session = %session, error = %e, "Read failed, treating as disconnect");
                Event::Closed { session }
            }
        };

        let closed = matches!(event, Event::Closed { .. });

        if events.send(event).await.is_err() || closed {
            return;
        }
    }
}
