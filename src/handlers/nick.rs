use crate::{
    context::{ConnectionId, ServerContext, UserContext},
    replies::{Outbox, Reply},
    result::Result,
};

pub fn handle_nick(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    nick: &str,
    outbox: &mut Outbox,
) -> Result<()> {
    if nick.len() > ctx.max_name_len {
        outbox.reply(
            connection_id,
            Reply::ErrNameTooLong {
                command: "NICK",
                name: nick.to_string(),
                kind: "nickname",
            },
        );
        return Ok(());
    }

    let taken = ctx
        .sessions
        .find_by_nick(nick)
        .map_or(false, |holder| holder.connection_id != connection_id);

    if taken {
        outbox.reply(connection_id, Reply::ErrNicknameInUse);
        return Ok(());
    }

    let user = ctx.sessions.user_mut(connection_id)?;
    user.nickname = nick.to_string();

    if user.has_username() {
        send_greeting(user, outbox);
    }

    Ok(())
}

/// The three line MOTD sent once both NICK and USER have been given.
pub fn send_greeting(user: &UserContext, outbox: &mut Outbox) {
    let host = &user.hostname;
    let nick = &user.nickname;

    outbox.reply(
        user.connection_id,
        Reply::MotdStart {
            host: host.clone(),
            nick: nick.clone(),
        },
    );
    outbox.reply(
        user.connection_id,
        Reply::Motd {
            host: host.clone(),
            nick: nick.clone(),
            line: "Register".to_string(),
        },
    );
    outbox.reply(
        user.connection_id,
        Reply::EndOfMotd {
            host: host.clone(),
            nick: nick.clone(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ANONYMOUS;
    use crate::handlers::test_support::*;

    #[test]
    fn nick_sets_nickname_silently_before_user() {
        let mut ctx = context();
        let alice = connect(&mut ctx, ANONYMOUS);
        let mut outbox = Outbox::default();

        handle_nick(&mut ctx, alice, "alice", &mut outbox).unwrap();

        assert_eq!("alice", ctx.sessions.get(alice).unwrap().nickname);
        assert!(outbox.replies.is_empty());
    }

    #[test]
    fn nick_after_user_sends_greeting() {
        let mut ctx = context();
        let alice = connect(&mut ctx, ANONYMOUS);
        {
            let user = ctx.sessions.get_mut(alice).unwrap();
            user.username = "al".to_string();
            user.hostname = "home".to_string();
        }
        let mut outbox = Outbox::default();

        handle_nick(&mut ctx, alice, "alice", &mut outbox).unwrap();

        assert_eq!(
            vec![
                ":home 375 alice :- home Message of the day - ",
                ":home 372 alice :- Register",
                ":home 376 alice :End of /MOTD command",
            ],
            outbox.lines_for(alice)
        );
    }

    #[test]
    fn nick_in_use_is_refused_and_unchanged() {
        let mut ctx = context();
        let _a = connect(&mut ctx, "bob");
        let b = connect(&mut ctx, "robert");
        let mut outbox = Outbox::default();

        handle_nick(&mut ctx, b, "bob", &mut outbox).unwrap();

        assert_eq!(vec!["NICKNAMEINUSE"], outbox.lines_for(b));
        assert_eq!("robert", ctx.sessions.get(b).unwrap().nickname);
    }

    #[test]
    fn nick_reclaiming_own_nickname_is_allowed() {
        let mut ctx = context();
        let a = connect(&mut ctx, "bob");
        let mut outbox = Outbox::default();

        handle_nick(&mut ctx, a, "bob", &mut outbox).unwrap();

        assert!(outbox.replies.is_empty());
    }

    #[test]
    fn nick_too_long_is_refused() {
        let mut ctx = context();
        let a = connect(&mut ctx, "bob");
        let long = "x".repeat(ctx.max_name_len + 1);
        let mut outbox = Outbox::default();

        handle_nick(&mut ctx, a, &long, &mut outbox).unwrap();

        assert_eq!(
            vec![format!("NICK: {} is too long to be a nickname", long)],
            outbox.lines_for(a)
        );
        assert_eq!("bob", ctx.sessions.get(a).unwrap().nickname);
    }
}
