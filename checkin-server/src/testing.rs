//! In-memory [`UserStore`] for handler and health tests

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::db::repos::{RepoError, UserStore, UNKNOWN_COUNT};
use crate::models::{NewUser, User};

/// Vec-backed store with switches to fail individual operations
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
    fail_ping: AtomicBool,
    fail_count: AtomicBool,
    fail_queries: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn fail_ping(&self, fail: bool) {
        self.fail_ping.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    /// Make insert/list/get fail with a driver error
    pub(crate) fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check_queries(&self) -> Result<(), RepoError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(RepoError::Store(sqlx::Error::Protocol(
                "relation \"users\" does not exist".into(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;
        self.check_queries()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = user.into_user(id, Utc::now());
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        self.check_queries()?;
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepoError> {
        self.check_queries()?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepoError::NotFound { id })
    }

    async fn count_all(&self) -> i64 {
        if self.fail_count.load(Ordering::SeqCst) {
            return UNKNOWN_COUNT;
        }
        self.len() as i64
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}
