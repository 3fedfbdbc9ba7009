use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lift_core::model::SessionId;

use crate::accounts::SharedUser;

/// Maps session identifiers to the users they were bound to.
///
/// The directory holds shared handles only; users live in the
/// [`UserDirectory`](crate::UserDirectory). Sessions never expire.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    sessions: RwLock<HashMap<SessionId, SharedUser>>,
}

impl SessionDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user bound to `id`, if any.
    #[must_use]
    pub fn resolve(&self, id: &SessionId) -> Option<SharedUser> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(id).cloned()
    }

    /// Binds `id` to `user`, silently replacing any earlier binding.
    pub fn bind(&self, id: SessionId, user: SharedUser) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id, user);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::UserDirectory;
    use std::sync::Arc;

    #[test]
    fn unknown_session_resolves_to_none() {
        let sessions = SessionDirectory::new();
        assert!(sessions.resolve(&SessionId::new("nobody")).is_none());
        assert!(sessions.is_empty());
    }

    #[test]
    fn rebinding_keeps_only_the_latest_user() {
        let users = UserDirectory::seeded();
        let sessions = SessionDirectory::new();
        let id = SessionId::new("cookie");

        sessions.bind(id.clone(), users.get("jake").unwrap());
        sessions.bind(id.clone(), users.get("alice").unwrap());

        let bound = sessions.resolve(&id).unwrap();
        assert!(Arc::ptr_eq(&bound, &users.get("alice").unwrap()));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn two_sessions_can_share_a_user() {
        let users = UserDirectory::seeded();
        let sessions = SessionDirectory::new();
        sessions.bind(SessionId::new("laptop"), users.get("bob").unwrap());
        sessions.bind(SessionId::new("phone"), users.get("bob").unwrap());

        let laptop = sessions.resolve(&SessionId::new("laptop")).unwrap();
        let phone = sessions.resolve(&SessionId::new("phone")).unwrap();
        assert!(Arc::ptr_eq(&laptop, &phone));
    }
}
