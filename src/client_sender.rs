use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc::Receiver,
};
use tracing::debug;
use uuid::Uuid;

use crate::{replies::Reply, result::Result};

/// Writes replies to the client in the order the loop queued them. Ends once
/// the loop drops its side of the queue, which also half-closes the socket.
pub async fn run_sender<W>(session: Uuid, mut writer: W, mut receiver: Receiver<Reply>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = receiver.recv().await {
        writer.write_all(reply.to_wire().as_bytes()).await?;
        writer.flush().await?;
    }

    debug!(session = %session, "Reply queue closed, shutting down writer");
    writer.shutdown().await?;

    Ok(())
}
