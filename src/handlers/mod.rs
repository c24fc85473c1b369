pub mod join;
pub mod list;
pub mod nick;
pub mod part;
pub mod privmsg;
pub mod quit;
pub mod user;
pub mod who;

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::{context::ConnectionId, context::ServerContext, settings::Settings};

    pub fn context() -> ServerContext {
        ServerContext::new(&Settings::default())
    }

    /// Registers a connection whose user already carries `nick`.
    pub fn connect(ctx: &mut ServerContext, nick: &str) -> ConnectionId {
        let id = ctx.sessions.register(Uuid::new_v4()).unwrap();
        ctx.sessions.get_mut(id).unwrap().nickname = nick.to_string();
        id
    }
}
