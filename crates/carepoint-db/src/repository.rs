//! The credential store seam.
//!
//! Services talk to [`UserRepository`] only, so the PostgreSQL store and the
//! in-memory store used by tests are interchangeable behind an
//! `Arc<dyn UserRepository>`.

use std::future::Future;
use std::pin::Pin;

use carepoint_core::AppError;
use carepoint_models::{NewUser, User, UserCredentials, UserRole};
use uuid::Uuid;

pub type RepoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Principal storage keyed by a unique, case-insensitive email.
///
/// Implementations normalize emails with
/// [`normalize_email`](carepoint_models::normalize_email) on every call.
pub trait UserRepository: Send + Sync {
    fn find_by_email<'a>(&'a self, email: &'a str) -> RepoFuture<'a, Option<User>>;

    /// Like [`find_by_email`](Self::find_by_email) but includes the password
    /// hash. Only login should call this.
    fn find_credentials_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> RepoFuture<'a, Option<UserCredentials>>;

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<User>>;

    /// Inserts a principal. Fails with
    /// [`ErrorCode::DuplicateEmail`](carepoint_core::ErrorCode::DuplicateEmail)
    /// when the email is taken, including when a concurrent insert won the race.
    fn insert(&self, user: NewUser) -> RepoFuture<'_, User>;

    fn list_by_role(&self, role: UserRole) -> RepoFuture<'_, Vec<User>>;
}
