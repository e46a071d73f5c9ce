// ============================================================================
// User Directory
// ============================================================================
//
// Immutable id -> user table, built once at startup and shared by every
// request through an Arc. No locking: nothing mutates it after `new`.
//
// ============================================================================

use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: HashMap<i64, User>,
}

impl UserDirectory {
    /// Build a directory, rejecting duplicate ids.
    pub fn new(users: Vec<User>) -> AppResult<Self> {
        let mut map = HashMap::with_capacity(users.len());
        for user in users {
            let id = user.id;
            if map.insert(id, user).is_some() {
                return Err(AppError::config(format!(
                    "duplicate user id {} in directory",
                    id
                )));
            }
        }
        Ok(Self { users: map })
    }

    /// Default users served when no directory is configured
    pub fn seed_users() -> Vec<User> {
        vec![
            User::new(1, "Emma"),
            User::new(2, "Bruno"),
            User::new(3, "Rick"),
            User::new(4, "Lena"),
        ]
    }

    pub fn lookup(&self, id: i64) -> AppResult<&User> {
        self.users.get(&id).ok_or(AppError::UserNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
