use tracing::debug;

use crate::{
    context::{ConnectionId, ServerContext},
    framing::Frame,
    handlers::{
        join::handle_join, list::handle_list, nick::handle_nick, part::handle_part,
        privmsg::handle_privmsg, quit::handle_quit, user::handle_user, who::handle_who,
    },
    replies::{Outbox, Reply},
    result::Result,
    tokenizer::tokenize,
};

/// Runs one framed line from `connection_id` to completion and returns what
/// it produced. Anything that is not a known command is relayed verbatim to
/// every connected client.
pub fn process_line(
    ctx: &mut ServerContext,
    connection_id: ConnectionId,
    frame: &Frame,
) -> Result<Outbox> {
    let mut outbox = Outbox::default();
    let args = tokenize(&frame.line, ' ');

    debug!(connection = connection_id.0, raw = ?frame.raw(), "Processing line");

    let usage = |command: &'static str, params: &'static str| Reply::Usage { command, params };

    match args[0].as_str() {
        "NICK" if args.len() < 2 => outbox.reply(connection_id, usage("NICK", "<nickname>")),
        "NICK" => handle_nick(ctx, connection_id, &args[1], &mut outbox)?,
        "USER" if args.len() < 4 => outbox.reply(
            connection_id,
            usage("USER", "<username> <hostname> <realname>"),
        ),
        "USER" => handle_user(
            ctx,
            connection_id,
            &args[1],
            &args[2],
            &args[3],
            &mut outbox,
        )?,
        "JOIN" if args.len() < 2 => outbox.reply(connection_id, usage("JOIN", "<channel>")),
        "JOIN" => handle_join(ctx, connection_id, &args[1], &mut outbox)?,
        "WHO" if args.len() < 2 => outbox.reply(connection_id, usage("WHO", "<channel>")),
        "WHO" => handle_who(ctx, connection_id, &args[1], &mut outbox)?,
        "LIST" => handle_list(ctx, connection_id, &mut outbox)?,
        "PRIVMSG" if args.len() < 3 => {
            outbox.reply(connection_id, usage("PRIVMSG", "<to> <message>"))
        }
        "PRIVMSG" => handle_privmsg(ctx, connection_id, &args[1], &args[2], &mut outbox)?,
        "PART" => handle_part(ctx, connection_id, &mut outbox)?,
        "QUIT" => handle_quit(ctx, connection_id, &mut outbox)?,
        _ => {
            for other in ctx.sessions.ids() {
                outbox.reply(
                    other,
                    Reply::Raw {
                        line: frame.line.clone(),
                        terminator: frame.terminator,
                    },
                );
            }
        }
    }

    Ok(outbox)
}
