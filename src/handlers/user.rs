use crate::{
    context::{ConnectionId, ServerContext},
    handlers::nick::send_greeting,
    replies::{Outbox, Reply},
    result::Result,
};

pub fn handle_user(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    username: &str,
    hostname: &str,
    realname: &str,
    outbox: &mut Outbox,
) -> Result<()> {
    let fields = [
        (username, "username"),
        (hostname, "hostname"),
        (realname, "realname"),
    ];

    let oversize = fields
        .iter()
        .find(|(value, _)| value.len() > ctx.max_name_len);

    if let Some(&(name, kind)) = oversize {
        outbox.reply(
            connection_id,
            Reply::ErrNameTooLong {
                command: "USER",
                name: name.to_string(),
                kind,
            },
        );
        return Ok(());
    }

    let user = ctx.sessions.user_mut(connection_id)?;
    user.username = username.to_string();
    user.hostname = hostname.to_string();
    user.realname = realname.to_string();

    if user.has_nickname() {
        send_greeting(user, outbox);
    }

    Ok(())
}
