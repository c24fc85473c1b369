use uuid::Uuid;

use crate::{
    context::{ConnectionId, UserContext},
    error::Error,
    result::Result,
};

/// User records indexed by connection slot. Freed slots are reused lowest
/// first, and the table never grows past `capacity`.
pub struct SessionRegistry {
    slots: Vec<Option<UserContext>>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        SessionRegistry {
            slots: vec![],
            capacity,
        }
    }

    /// Creates an anonymous user in the lowest free slot.
    pub fn register(&mut self, session: Uuid) -> Result<ConnectionId> {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if self.slots.len() < self.capacity => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => {
                return Err(Error::TooManyClients {
                    capacity: self.capacity,
                })
            }
        };

        let connection_id = ConnectionId(index);
        self.slots[index] = Some(UserContext::new(connection_id, session));

        Ok(connection_id)
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&UserContext> {
        self.slots.get(connection_id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, connection_id: ConnectionId) -> Option<&mut UserContext> {
        self.slots.get_mut(connection_id.0)?.as_mut()
    }

    /// Like `get`, but a missing record is a bookkeeping bug, not a miss.
    pub fn user(&self, connection_id: ConnectionId) -> Result<&UserContext> {
        self.get(connection_id)
            .ok_or(Error::NoSuchUser { connection_id })
    }

    pub fn user_mut(&mut self, connection_id: ConnectionId) -> Result<&mut UserContext> {
        self.get_mut(connection_id)
            .ok_or(Error::NoSuchUser { connection_id })
    }

    pub fn find_by_nick(&self, nickname: &str) -> Option<&UserContext> {
        self.iter().find(|u| u.nickname == nickname)
    }

    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<UserContext> {
        let removed = self.slots.get_mut(connection_id.0)?.take();

        // trim free slots above the highwater mark
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }

        removed
    }

    /// Live users in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = &UserContext> {
        self.slots.iter().flatten()
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.iter().map(|u| u.connection_id).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_ascending_slots() {
        let mut sessions = SessionRegistry::new(8);

        let a = sessions.register(Uuid::new_v4()).unwrap();
        let b = sessions.register(Uuid::new_v4()).unwrap();

        assert_eq!(ConnectionId(0), a);
        assert_eq!(ConnectionId(1), b);
        assert_eq!(vec![a, b], sessions.ids());
    }

    #[test]
    fn register_reuses_lowest_free_slot() {
        let mut sessions = SessionRegistry::new(8);
        let a = sessions.register(Uuid::new_v4()).unwrap();
        let _b = sessions.register(Uuid::new_v4()).unwrap();

        sessions.remove(a).unwrap();
        let c = sessions.register(Uuid::new_v4()).unwrap();

        assert_eq!(a, c);
        assert_eq!(2, sessions.len());
    }

    #[test]
    fn register_past_capacity_errors() {
        let mut sessions = SessionRegistry::new(1);
        sessions.register(Uuid::new_v4()).unwrap();

        let err = sessions.register(Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, Error::TooManyClients { capacity: 1 }));
    }

    #[test]
    fn find_by_nick_matches_exactly() {
        let mut sessions = SessionRegistry::new(8);
        let a = sessions.register(Uuid::new_v4()).unwrap();
        sessions.get_mut(a).unwrap().nickname = "alice".to_string();

        assert_eq!(a, sessions.find_by_nick("alice").unwrap().connection_id);
        assert!(sessions.find_by_nick("Alice").is_none());
    }

    #[test]
    fn user_missing_is_an_error() {
        let sessions = SessionRegistry::new(8);

        let err = sessions.user(ConnectionId(3)).unwrap_err();

        assert!(matches!(
            err,
            Error::NoSuchUser {
                connection_id: ConnectionId(3)
            }
        ));
    }

    #[test]
    fn remove_keeps_other_handles_stable() {
        let mut sessions = SessionRegistry::new(8);
        let a = sessions.register(Uuid::new_v4()).unwrap();
        let b = sessions.register(Uuid::new_v4()).unwrap();
        let c = sessions.register(Uuid::new_v4()).unwrap();

        sessions.remove(b).unwrap();

        assert_eq!(vec![a, c], sessions.ids());
        assert_eq!(c, sessions.get(c).unwrap().connection_id);
        assert!(sessions.remove(b).is_none());
    }
}
