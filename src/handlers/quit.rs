use tracing::info;

use crate::{
    context::{ConnectionId, ServerContext},
    error::Error,
    handlers::part::announce_departure,
    replies::Outbox,
    result::Result,
};

/// Used both for an explicit QUIT and for end of stream.
pub fn handle_quit(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    outbox: &mut Outbox,
) -> Result<()> {
    announce_departure(ctx, connection_id, outbox)?;

    let user = ctx
        .sessions
        .remove(connection_id)
        .ok_or(Error::NoSuchUser { connection_id })?;

    info!(
        connection = connection_id.0,
        session = %user.session,
        nick = %user.nickname,
        "User quit"
    );
    outbox.close(connection_id);

    Ok(())
}
