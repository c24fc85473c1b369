use crate::{
    context::{ConnectionId, ServerContext},
    replies::{Outbox, Reply},
    result::Result,
};

pub fn handle_list(
    ctx: &ServerContext,
    connection_id: ConnectionId,
    outbox: &mut Outbox,
) -> Result<()> {
    let nick = ctx.sessions.user(connection_id)?.nickname.clone();

    outbox.reply(connection_id, Reply::ListStart { nick: nick.clone() });

    for channel in ctx.channels.iter() {
        outbox.reply(
            connection_id,
            Reply::List {
                nick: nick.clone(),
                channel: channel.name.clone(),
                members: channel.members.len(),
            },
        );
    }

    outbox.reply(connection_id, Reply::ListEnd { nick });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;

    #[test]
    fn list_empty_registry_has_only_header_and_end() {
        let mut ctx = context();
        let a = connect(&mut ctx, "alice");
        let mut outbox = Outbox::default();

        handle_list(&ctx, a, &mut outbox).unwrap();

        assert_eq!(
            vec![
                ":LIST 321 alice Channel :Users Name",
                ":LIST 323 alice :End of /LIST",
            ],
            outbox.lines_for(a)
        );
    }

    #[test]
    fn list_counts_live_members_including_empty_channels() {
        let mut ctx = context();
        let a = connect(&mut ctx, "alice");
        let b = connect(&mut ctx, "bob");
        let x = ctx.channels.get_or_create("#x").unwrap();
        ctx.channels.get_or_create("#empty").unwrap();
        ctx.enter_channel(a, x);
        ctx.enter_channel(b, x);
        let mut outbox = Outbox::default();

        handle_list(&ctx, a, &mut outbox).unwrap();

        assert_eq!(
            vec![
                ":LIST 321 alice Channel :Users Name",
                ":LIST 322 alice #x 2",
                ":LIST 322 alice #empty 0",
                ":LIST 323 alice :End of /LIST",
            ],
            outbox.lines_for(a)
        );
    }
}
