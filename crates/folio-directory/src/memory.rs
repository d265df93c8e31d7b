//! A directory that lives in process memory.
//!
//! Behaves like the remote service (exact-match filtering, the directory
//! assigns ids) without a network. Tests use it to script remote records;
//! the demo uses it for offline runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::{
    Credentials, DirectoryError, DirectoryService, NewUser, User, UserId,
};

/// How many times each operation has been called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCalls {
    pub email_exists: usize,
    pub find_by_credentials: usize,
    pub create: usize,
}

#[derive(Debug, Default)]
struct Counters {
    email_exists: AtomicUsize,
    find_by_credentials: AtomicUsize,
    create: AtomicUsize,
}

/// An in-memory [`DirectoryService`].
///
/// Cheap to clone; clones share records, counters, and the offline flag.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<Vec<User>>>,
    counters: Arc<Counters>,
    offline: Arc<AtomicBool>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `users`, in order.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail with [`DirectoryError::Unavailable`]
    /// (or succeed again, with `false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns a copy of every stored record.
    pub async fn users(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Returns the per-operation call counts so far.
    pub fn calls(&self) -> DirectoryCalls {
        DirectoryCalls {
            email_exists: self.counters.email_exists.load(Ordering::SeqCst),
            find_by_credentials: self
                .counters
                .find_by_credentials
                .load(Ordering::SeqCst),
            create: self.counters.create.load(Ordering::SeqCst),
        }
    }

    fn check_online(&self) -> Result<(), DirectoryError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(DirectoryError::Unavailable("directory is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl DirectoryService for InMemoryDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, DirectoryError> {
        self.counters.email_exists.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.users.read().await.iter().any(|u| u.email == email))
    }

    async fn find_by_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<User>, DirectoryError> {
        self.counters
            .find_by_credentials
            .fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| {
                u.email == credentials.email
                    && u.password.as_deref() == Some(credentials.password.as_str())
            })
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DirectoryError> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let mut users = self.users.write().await;

        // Next id is one past the largest numeric id seen so far.
        let next_id = users
            .iter()
            .filter_map(|u| match &u.id {
                UserId::Number(n) => Some(*n),
                UserId::Text(s) => s.parse().ok(),
            })
            .max()
            .unwrap_or(0)
            + 1;

        let user = User {
            id: UserId::Number(next_id),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            dob: new_user.dob,
            password: Some(new_user.password.clone()),
        };
        users.push(user.clone());
        tracing::debug!(id = %user.id, "in-memory user created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> User {
        User::new(UserId::Number(1), "a@x.com")
            .with_name("Ann")
            .with_password("pw")
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Bob".into(),
            email: email.into(),
            dob: None,
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_email_exists_matches_exactly() {
        let dir = InMemoryDirectory::with_users(vec![ann()]);

        assert!(dir.email_exists("a@x.com").await.unwrap());
        assert!(!dir.email_exists("A@x.com").await.unwrap());
        assert!(!dir.email_exists("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_credentials_requires_both_fields() {
        let dir = InMemoryDirectory::with_users(vec![ann()]);

        let hit = dir
            .find_by_credentials(&Credentials::new("a@x.com", "pw"))
            .await
            .unwrap();
        let miss = dir
            .find_by_credentials(&Credentials::new("a@x.com", "bad"))
            .await
            .unwrap();

        assert_eq!(hit, Some(ann()));
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn test_find_by_credentials_returns_first_match() {
        let first = ann();
        let second = User::new(UserId::Number(9), "a@x.com")
            .with_name("Duplicate")
            .with_password("pw");
        let dir = InMemoryDirectory::with_users(vec![first.clone(), second]);

        let found = dir
            .find_by_credentials(&Credentials::new("a@x.com", "pw"))
            .await
            .unwrap();

        assert_eq!(found, Some(first));
    }

    #[tokio::test]
    async fn test_create_assigns_next_numeric_id() {
        let dir = InMemoryDirectory::with_users(vec![ann()]);

        let created = dir.create(&new_user("b@x.com")).await.unwrap();

        assert_eq!(created.id, UserId::Number(2));
        assert_eq!(created.password.as_deref(), Some("secret"));
        assert_eq!(dir.users().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_in_empty_directory_starts_at_one() {
        let dir = InMemoryDirectory::new();

        let created = dir.create(&new_user("b@x.com")).await.unwrap();

        assert_eq!(created.id, UserId::Number(1));
    }

    #[tokio::test]
    async fn test_offline_fails_every_operation() {
        let dir = InMemoryDirectory::with_users(vec![ann()]);
        dir.set_offline(true);

        assert!(matches!(
            dir.email_exists("a@x.com").await,
            Err(DirectoryError::Unavailable(_))
        ));
        assert!(matches!(
            dir.create(&new_user("b@x.com")).await,
            Err(DirectoryError::Unavailable(_))
        ));

        dir.set_offline(false);
        assert!(dir.email_exists("a@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_calls_are_counted() {
        let dir = InMemoryDirectory::new();
        let _ = dir.email_exists("a@x.com").await;
        let _ = dir.email_exists("b@x.com").await;
        let _ = dir.create(&new_user("c@x.com")).await;

        assert_eq!(
            dir.calls(),
            DirectoryCalls {
                email_exists: 2,
                find_by_credentials: 0,
                create: 1,
            }
        );
    }
}
