use crate::{
    context::{ConnectionId, ServerContext},
    replies::{Outbox, Reply, WhoEntry},
    result::Result,
};

/// Exact match on the channel name, listing every member's identity.
pub fn handle_who(
    ctx: &ServerContext,
    connection_id: ConnectionId,
    channel_name: &str,
    outbox: &mut Outbox,
) -> Result<()> {
    let nick = ctx.sessions.user(connection_id)?.nickname.clone();

    let channel = match ctx
        .channels
        .find_by_name(channel_name)
        .and_then(|id| ctx.channels.get(id))
    {
        Some(c) => c,
        None => {
            outbox.reply(connection_id, Reply::ErrNoSuchChannel);
            return Ok(());
        }
    };

    let mut members = vec![];

    for member in &channel.members {
        let mate = ctx.sessions.user(*member)?;
        members.push(WhoEntry {
            username: mate.username.clone(),
            realname: mate.realname.clone(),
            hostname: mate.hostname.clone(),
            nickname: mate.nickname.clone(),
        });
    }

    outbox.reply(
        connection_id,
        Reply::Who {
            nick: nick.clone(),
            channel: channel.name.clone(),
            members,
        },
    );
    outbox.reply(
        connection_id,
        Reply::EndOfWho {
            nick,
            channel: channel.name.clone(),
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;

    #[test]
    fn who_unknown_channel_errors() {
        let mut ctx = context();
        let a = connect(&mut ctx, "alice");
        let mut outbox = Outbox::default();

        handle_who(&ctx, a, "#nowhere", &mut outbox).unwrap();

        assert_eq!(vec!["WHO: No such channel"], outbox.lines_for(a));
    }

    #[test]
    fn who_lists_member_identities() {
        let mut ctx = context();
        let a = connect(&mut ctx, "alice");
        let b = connect(&mut ctx, "bob");
        {
            let user = ctx.sessions.get_mut(b).unwrap();
            user.username = "bobby".to_string();
            user.realname = "Robert".to_string();
            user.hostname = "box".to_string();
        }
        let chan = ctx.channels.get_or_create("#x").unwrap();
        ctx.enter_channel(b, chan);
        let mut outbox = Outbox::default();

        handle_who(&ctx, a, "#x", &mut outbox).unwrap();

        assert_eq!(
            vec![
                ":WHO 352 alice #x bobby Robert box bob H :0 The MOTD",
                ":WHO 315 alice #x :End of /WHO list",
            ],
            outbox.lines_for(a)
        );
    }

    #[test]
    fn who_empty_channel_lists_nobody() {
        let mut ctx = context();
        let a = connect(&mut ctx, "alice");
        ctx.channels.get_or_create("#x").unwrap();
        let mut outbox = Outbox::default();

        handle_who(&ctx, a, "#x", &mut outbox).unwrap();

        assert_eq!(":WHO 352 alice #x H :0 The MOTD", outbox.lines_for(a)[0]);
    }
}
