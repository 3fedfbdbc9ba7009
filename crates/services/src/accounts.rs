use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lift_core::model::{Credential, User, Username};

use crate::error::AuthFailure;

/// A user shared between the account registry and any sessions bound to it.
///
/// The mutex serialises requests that touch the same user.
pub type SharedUser = Arc<Mutex<User>>;

/// Accounts installed at start-up when no other list is supplied.
///
/// Credentials are plaintext placeholders.
pub const SEED_USERS: [(&str, &str); 4] = [
    ("jake", "j"),
    ("alice", "a"),
    ("bob", "b"),
    ("charlie", "c"),
];

/// Owns every known user, keyed by username.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<Username, SharedUser>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding [`SEED_USERS`].
    #[must_use]
    pub fn seeded() -> Self {
        let mut directory = Self::new();
        for (name, password) in SEED_USERS {
            directory.insert(User::new(
                Username::new(name),
                Credential::plaintext(password),
            ));
        }
        directory
    }

    /// Adds or replaces a user and returns the shared handle.
    pub fn insert(&mut self, user: User) -> SharedUser {
        let username = user.username().clone();
        let shared = Arc::new(Mutex::new(user));
        self.users.insert(username, Arc::clone(&shared));
        shared
    }

    #[must_use]
    pub fn get(&self, username: &str) -> Option<SharedUser> {
        self.users.get(&Username::new(username)).map(Arc::clone)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Checks credentials against a [`UserDirectory`].
///
/// Authentication never touches sessions; binding is the caller's job.
#[derive(Debug, Clone)]
pub struct AuthGate {
    users: Arc<UserDirectory>,
}

impl AuthGate {
    #[must_use]
    pub fn new(users: Arc<UserDirectory>) -> Self {
        Self { users }
    }

    /// Returns the user whose stored credential equals `password`.
    ///
    /// # Errors
    ///
    /// Returns `AuthFailure::UnknownUser` or `AuthFailure::BadCredentials`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<SharedUser, AuthFailure> {
        let user = self.users.get(username).ok_or(AuthFailure::UnknownUser)?;
        let matches = crate::lock(&user).credential().matches(password);
        if matches {
            Ok(user)
        } else {
            Err(AuthFailure::BadCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AuthGate {
        AuthGate::new(Arc::new(UserDirectory::seeded()))
    }

    #[test]
    fn seeded_directory_has_the_four_accounts() {
        let users = UserDirectory::seeded();
        assert_eq!(users.len(), 4);
        for (name, _) in SEED_USERS {
            assert!(users.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn authenticate_accepts_matching_password() {
        let user = gate().authenticate("jake", "j").unwrap();
        assert_eq!(crate::lock(&user).username().as_str(), "jake");
    }

    #[test]
    fn authenticate_rejects_unknown_user_and_bad_password() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("mallory", "m").unwrap_err(),
            AuthFailure::UnknownUser
        );
        assert_eq!(
            gate.authenticate("jake", "a").unwrap_err(),
            AuthFailure::BadCredentials
        );
    }

    #[test]
    fn handles_share_the_same_user() {
        let users = UserDirectory::seeded();
        let a = users.get("bob").unwrap();
        let b = users.get("bob").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
