use std::fmt::Display;

use crate::context::ConnectionId;

#[derive(Debug, Clone, PartialEq)]
pub struct WhoEntry {
    pub username: String,
    pub realname: String,
    pub hostname: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Usage {
        command: &'static str,
        params: &'static str,
    },
    ErrNameTooLong {
        command: &'static str,
        name: String,
        kind: &'static str,
    },
    ErrNicknameInUse,
    MotdStart {
        host: String,
        nick: String,
    },
    Motd {
        host: String,
        nick: String,
        line: String,
    },
    EndOfMotd {
        host: String,
        nick: String,
    },
    Join {
        nick: String,
        channel: String,
    },
    Nam {
        nick: String,
        channel: String,
        channel_users: Vec<String>,
    },
    EndOfNames {
        nick: String,
        channel: String,
    },
    ErrNoRoomForChannel {
        channel: String,
    },
    Who {
        nick: String,
        channel: String,
        members: Vec<WhoEntry>,
    },
    EndOfWho {
        nick: String,
        channel: String,
    },
    ErrNoSuchChannel,
    ListStart {
        nick: String,
    },
    List {
        nick: String,
        channel: String,
        members: usize,
    },
    ListEnd {
        nick: String,
    },
    PrivMsg {
        nick: String,
        target: String,
        message: String,
    },
    ErrNoSuchTarget {
        target: String,
    },
    ErrNotOnChannel,
    // sent to every member when someone leaves, the leaver included
    Quit {
        nick: String,
        recipient: String,
        channel: String,
    },
    // relayed verbatim with whatever terminator the client used
    Raw {
        line: String,
        terminator: &'static str,
    },
}

impl Reply {
    /// The reply as written to the socket, terminator included.
    pub fn to_wire(&self) -> String {
        match self {
            Reply::Raw { line, terminator } if !terminator.is_empty() => {
                format!("{}{}", line, terminator)
            }
            _ => format!("{}\r\n", self),
        }
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Usage { command, params } => write!(f, "Usage: {} {}", command, params),
            Reply::ErrNameTooLong {
                command,
                name,
                kind,
            } => write!(f, "{}: {} is too long to be a {}", command, name, kind),
            Reply::ErrNicknameInUse => write!(f, "NICKNAMEINUSE"),
            Reply::MotdStart { host, nick } => {
                write!(f, ":{} 375 {} :- {} Message of the day - ", host, nick, host)
            }
            Reply::Motd { host, nick, line } => write!(f, ":{} 372 {} :- {}", host, nick, line),
            Reply::EndOfMotd { host, nick } => {
                write!(f, ":{} 376 {} :End of /MOTD command", host, nick)
            }
            Reply::Join { nick, channel } => write!(f, ":{} JOIN {}", nick, channel),
            Reply::Nam {
                nick,
                channel,
                channel_users,
            } => {
                write!(f, ":JOIN 353 {} = {} : ", nick, channel)?;

                for user in channel_users {
                    write!(f, "{} ", user)?;
                }

                Ok(())
            }
            Reply::EndOfNames { nick, channel } => {
                write!(f, ":JOIN 366 {} {} :End of /NAMES list", nick, channel)
            }
            Reply::ErrNoRoomForChannel { channel } => {
                write!(f, "JOIN: no room for channel {}", channel)
            }
            Reply::Who {
                nick,
                channel,
                members,
            } => {
                write!(f, ":WHO 352 {} {}", nick, channel)?;

                for m in members {
                    write!(
                        f,
                        " {} {} {} {}",
                        m.username, m.realname, m.hostname, m.nickname
                    )?;
                }

                write!(f, " H :0 The MOTD")
            }
            Reply::EndOfWho { nick, channel } => {
                write!(f, ":WHO 315 {} {} :End of /WHO list", nick, channel)
            }
            Reply::ErrNoSuchChannel => write!(f, "WHO: No such channel"),
            Reply::ListStart { nick } => write!(f, ":LIST 321 {} Channel :Users Name", nick),
            Reply::List {
                nick,
                channel,
                members,
            } => write!(f, ":LIST 322 {} {} {}", nick, channel, members),
            Reply::ListEnd { nick } => write!(f, ":LIST 323 {} :End of /LIST", nick),
            Reply::PrivMsg {
                nick,
                target,
                message,
            } => write!(f, ":{} PRIVMSG {} :{}", nick, target, message),
            Reply::ErrNoSuchTarget { target } => write!(f, "PRIVMSG: {} not found", target),
            Reply::ErrNotOnChannel => write!(f, "PART: You have not followed a channel"),
            Reply::Quit {
                nick,
                recipient,
                channel,
            } => write!(f, ":{}!{}@{} QUIT :", nick, recipient, channel),
            Reply::Raw { line, .. } => write!(f, "{}", line),
        }
    }
}

/// Replies produced while handling one line, in emission order, plus the
/// connections the handler asked to close.
#[derive(Debug, Default)]
pub struct Outbox {
    pub replies: Vec<(ConnectionId, Reply)>,
    pub closed: Vec<ConnectionId>,
}

impl Outbox {
    pub fn reply(&mut self, to: ConnectionId, reply: Reply) {
        self.replies.push((to, reply));
    }

    pub fn close(&mut self, connection_id: ConnectionId) {
        self.closed.push(connection_id);
    }

    #[cfg(test)]
    pub fn lines_for(&self, connection_id: ConnectionId) -> Vec<String> {
        self.replies
            .iter()
            .filter(|(to, _)| *to == connection_id)
            .map(|(_, r)| r.to_string())
            .collect()
    }
}

#[test]
fn usage_prints_correctly() {
    let reply = Reply::Usage {
        command: "NICK",
        params: "<nickname>",
    };
    let actual = reply.to_string();
    let expected = "Usage: NICK <nickname>";
    assert_eq!(expected, actual);
}

#[test]
fn nametoolong_prints_correctly() {
    let reply = Reply::ErrNameTooLong {
        command: "USER",
        name: "JIMJIMJIM".to_string(),
        kind: "hostname",
    };
    let actual = reply.to_string();
    let expected = "USER: JIMJIMJIM is too long to be a hostname";
    assert_eq!(expected, actual);
}

#[test]
fn motdstart_prints_correctly() {
    let reply = Reply::MotdStart {
        host: "localhost".to_string(),
        nick: "JIM".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":localhost 375 JIM :- localhost Message of the day - ";
    assert_eq!(expected, actual);
}

#[test]
fn motd_prints_correctly() {
    let reply = Reply::Motd {
        host: "localhost".to_string(),
        nick: "JIM".to_string(),
        line: "Register".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":localhost 372 JIM :- Register";
    assert_eq!(expected, actual);
}

#[test]
fn endofmotd_prints_correctly() {
    let reply = Reply::EndOfMotd {
        host: "localhost".to_string(),
        nick: "JIM".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":localhost 376 JIM :End of /MOTD command";
    assert_eq!(expected, actual);
}

#[test]
fn nam_prints_correctly() {
    let reply = Reply::Nam {
        nick: "JIM".to_string(),
        channel: "#foobar".to_string(),
        channel_users: vec!["JIM".to_string(), "BOB".to_string()],
    };
    let actual = reply.to_string();
    let expected = ":JOIN 353 JIM = #foobar : JIM BOB ";
    assert_eq!(expected, actual);
}

#[test]
fn endofnames_prints_correctly() {
    let reply = Reply::EndOfNames {
        nick: "JIM".to_string(),
        channel: "#foobar".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":JOIN 366 JIM #foobar :End of /NAMES list";
    assert_eq!(expected, actual);
}

#[test]
fn who_prints_correctly() {
    let reply = Reply::Who {
        nick: "JIM".to_string(),
        channel: "#foobar".to_string(),
        members: vec![WhoEntry {
            username: "jim".to_string(),
            realname: "Jim Jones".to_string(),
            hostname: "localhost".to_string(),
            nickname: "JIM".to_string(),
        }],
    };
    let actual = reply.to_string();
    let expected = ":WHO 352 JIM #foobar jim Jim Jones localhost JIM H :0 The MOTD";
    assert_eq!(expected, actual);
}

#[test]
fn endofwho_prints_correctly() {
    let reply = Reply::EndOfWho {
        nick: "JIM".to_string(),
        channel: "#foobar".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":WHO 315 JIM #foobar :End of /WHO list";
    assert_eq!(expected, actual);
}

#[test]
fn list_prints_correctly() {
    let reply = Reply::List {
        nick: "JIM".to_string(),
        channel: "#foobar".to_string(),
        members: 3,
    };
    let actual = reply.to_string();
    let expected = ":LIST 322 JIM #foobar 3";
    assert_eq!(expected, actual);
}

#[test]
fn listend_prints_correctly() {
    let reply = Reply::ListEnd {
        nick: "JIM".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":LIST 323 JIM :End of /LIST";
    assert_eq!(expected, actual);
}

#[test]
fn privmsg_prints_correctly() {
    let reply = Reply::PrivMsg {
        nick: "JIM".to_string(),
        target: "#foobar".to_string(),
        message: "hello there".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":JIM PRIVMSG #foobar :hello there";
    assert_eq!(expected, actual);
}

#[test]
fn quit_prints_correctly() {
    let reply = Reply::Quit {
        nick: "JIM".to_string(),
        recipient: "BOB".to_string(),
        channel: "#foobar".to_string(),
    };
    let actual = reply.to_string();
    let expected = ":JIM!BOB@#foobar QUIT :";
    assert_eq!(expected, actual);
}

#[test]
fn to_wire_appends_crlf() {
    let reply = Reply::ErrNicknameInUse;
    assert_eq!("NICKNAMEINUSE\r\n", reply.to_wire());
}

#[test]
fn raw_to_wire_keeps_original_terminator() {
    let lf = Reply::Raw {
        line: "hello all".to_string(),
        terminator: "\n",
    };
    let unterminated = Reply::Raw {
        line: "hello all".to_string(),
        terminator: "",
    };
    assert_eq!("hello all\n", lf.to_wire());
    assert_eq!("hello all\r\n", unterminated.to_wire());
}
