use tracing::warn;

use crate::{
    context::{ConnectionId, ServerContext},
    error::Error,
    handlers::part::announce_departure,
    replies::{Outbox, Reply},
    result::Result,
};

pub fn handle_join(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    channel_name: &str,
    outbox: &mut Outbox,
) -> Result<()> {
    if channel_name.len() > ctx.max_name_len {
        outbox.reply(
            connection_id,
            Reply::ErrNameTooLong {
                command: "JOIN",
                name: channel_name.to_string(),
                kind: "channelname",
            },
        );
        return Ok(());
    }

    let channel_id = match ctx.channels.get_or_create(channel_name) {
        Some(c) => c,
        None => {
            warn!(channel = %channel_name, "No free channel slot, refusing to create channel");
            outbox.reply(
                connection_id,
                Reply::ErrNoRoomForChannel {
                    channel: channel_name.to_string(),
                },
            );
            return Ok(());
        }
    };

    // a user follows at most one channel; any JOIN leaves the current one first,
    // even when it names that same channel
    announce_departure(ctx, connection_id, outbox)?;

    let joined = ctx.enter_channel(connection_id, channel_id);

    let nick = ctx.sessions.user(connection_id)?.nickname.clone();
    let channel = ctx
        .channels
        .get(channel_id)
        .ok_or(Error::NoSuchChannel { channel_id })?;

    if joined {
        outbox.reply(
            connection_id,
            Reply::Join {
                nick: nick.clone(),
                channel: channel.name.clone(),
            },
        );
    } else {
        warn!(nick = %nick, channel = %channel.name, "Channel is full, join ignored");
    }

    let mut channel_users = vec![];

    for member in &channel.members {
        channel_users.push(ctx.sessions.user(*member)?.nickname.clone());

        if joined && *member != connection_id {
            outbox.reply(
                *member,
                Reply::Join {
                    nick: nick.clone(),
                    channel: channel.name.clone(),
                },
            );
        }
    }

    outbox.reply(
        connection_id,
        Reply::Nam {
            nick: nick.clone(),
            channel: channel.name.clone(),
            channel_users,
        },
    );
    outbox.reply(
        connection_id,
        Reply::EndOfNames {
            nick,
            channel: channel.name.clone(),
        },
    );

    Ok(())
}
