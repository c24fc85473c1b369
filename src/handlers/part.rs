use crate::{
    context::{ConnectionId, ServerContext},
    error::Error,
    replies::{Outbox, Reply},
    result::Result,
};

pub fn handle_part(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    outbox: &mut Outbox,
) -> Result<()> {
    if ctx.sessions.user(connection_id)?.channel.is_none() {
        outbox.reply(connection_id, Reply::ErrNotOnChannel);
        return Ok(());
    }

    announce_departure(ctx, connection_id, outbox)
}

/// Notifies every member of the user's channel, the user included, then
/// drops the user from it. A user in no channel is left untouched.
pub fn announce_departure(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    outbox: &mut Outbox,
) -> Result<()> {
    let user = ctx.sessions.user(connection_id)?;
    let channel_id = match user.channel {
        Some(c) => c,
        None => return Ok(()),
    };
    let channel = ctx
        .channels
        .get(channel_id)
        .ok_or(Error::NoSuchChannel { channel_id })?;

    for member in &channel.members {
        let recipient = ctx.sessions.user(*member)?;

        outbox.reply(
            *member,
            Reply::Quit {
                nick: user.nickname.clone(),
                recipient: recipient.nickname.clone(),
                channel: channel.name.clone(),
            },
        );
    }

    tracing::debug!(nick = %user.nickname, channel = %channel.name, "left channel");
    ctx.leave_channel(connection_id);

    Ok(())
}
