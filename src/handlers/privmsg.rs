use crate::{
    context::{ConnectionId, ServerContext},
    replies::{Outbox, Reply},
    result::Result,
    tokenizer::tokenize,
};

/// Delivers `message` to each comma separated target. A target is a channel
/// if one by that name exists, otherwise a nickname.
pub fn handle_privmsg(
    ctx: &ServerContext,
    connection_id: ConnectionId,
    targets: &str,
    message: &str,
    outbox: &mut Outbox,
) -> Result<()> {
    let from = ctx.sessions.user(connection_id)?;
    let message = message.trim_end_matches(&['\r', '\n'][..]);

    for target in tokenize(targets, ',') {
        let channel = ctx
            .channels
            .find_by_name(&target)
            .and_then(|id| ctx.channels.get(id));

        if let Some(channel) = channel {
            // the sender hears its own channel messages too
            for member in &channel.members {
                outbox.reply(
                    *member,
                    Reply::PrivMsg {
                        nick: from.nickname.clone(),
                        target: channel.name.clone(),
                        message: message.to_string(),
                    },
                );
            }
        } else if let Some(to) = ctx.sessions.find_by_nick(&target) {
            let reply = Reply::PrivMsg {
                nick: from.nickname.clone(),
                target: to.nickname.clone(),
                message: message.to_string(),
            };
            outbox.reply(connection_id, reply.clone());
            outbox.reply(to.connection_id, reply);
        } else {
            outbox.reply(connection_id, Reply::ErrNoSuchTarget { target });
        }
    }

    Ok(())
}
