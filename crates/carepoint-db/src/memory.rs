//! In-memory [`UserRepository`] for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use carepoint_core::AppError;
use carepoint_models::{NewUser, User, UserCredentials, UserRole, normalize_email};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{RepoFuture, UserRepository};

/// Stores principals in a vector with the same unique-email rule as the
/// `users` table.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<UserCredentials>>,
    fail_inserts: AtomicBool,
    duplicate_on_insert: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `insert` fail with an internal error, the way a
    /// dropped database connection would.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every following `insert` report a taken email, as when another
    /// request claims the address between the lookup and the write.
    pub fn duplicate_on_insert(&self, duplicate: bool) {
        self.duplicate_on_insert.store(duplicate, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// The stored hash for `email`, for asserting that passwords are never
    /// kept in plaintext.
    pub async fn password_hash(&self, email: &str) -> Option<String> {
        let email = normalize_email(email);
        self.users
            .read()
            .await
            .iter()
            .find(|c| c.user.email == email)
            .map(|c| c.password_hash.clone())
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_email<'a>(&'a self, email: &'a str) -> RepoFuture<'a, Option<User>> {
        Box::pin(async move {
            Ok(self
                .find_credentials_by_email(email)
                .await?
                .map(|credentials| credentials.user))
        })
    }

    fn find_credentials_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> RepoFuture<'a, Option<UserCredentials>> {
        Box::pin(async move {
            let email = normalize_email(email);
            let users = self.users.read().await;
            Ok(users.iter().find(|c| c.user.email == email).cloned())
        })
    }

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<User>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users
                .iter()
                .find(|c| c.user.id == id)
                .map(|c| c.user.clone()))
        })
    }

    fn insert(&self, new_user: NewUser) -> RepoFuture<'_, User> {
        Box::pin(async move {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(AppError::internal_error("insert failed: connection reset"));
            }

            let email = normalize_email(&new_user.email);
            let mut users = self.users.write().await;

            if self.duplicate_on_insert.load(Ordering::SeqCst)
                || users.iter().any(|c| c.user.email == email)
            {
                return Err(AppError::duplicate_email("User already Registered!"));
            }

            let user = User {
                id: Uuid::new_v4(),
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                email,
                phone: new_user.phone,
                nic: new_user.nic,
                dob: new_user.dob,
                gender: new_user.gender,
                role: new_user.role,
                doctor_department: new_user.doctor_department,
                doc_avatar: new_user.doc_avatar,
                created_at: Utc::now(),
            };

            users.push(UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash,
            });

            Ok(user)
        })
    }

    fn list_by_role(&self, role: UserRole) -> RepoFuture<'_, Vec<User>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users
                .iter()
                .filter(|c| c.user.role == role)
                .map(|c| c.user.clone())
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepoint_core::ErrorCode;
    use carepoint_models::Gender;
    use chrono::NaiveDate;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "03001234567".to_string(),
            nic: "3520212345671".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            gender: Gender::Female,
            role,
            password_hash: "$2b$04$hash".to_string(),
            doctor_department: None,
            doc_avatar: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(new_user("A@X.com", UserRole::Patient))
            .await
            .unwrap();

        assert_eq!(user.email, "a@x.com");
        assert_eq!(repo.find_by_id(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(repo.find_by_email(" a@X.COM").await.unwrap(), Some(user));

        let credentials = repo.find_credentials_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(credentials.password_hash, "$2b$04$hash");
    }

    #[tokio::test]
    async fn test_email_is_unique_across_roles() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("a@x.com", UserRole::Patient))
            .await
            .unwrap();

        let err = repo
            .insert(new_user("A@x.com", UserRole::Doctor))
            .await
            .unwrap_err();

        assert!(err.is(ErrorCode::DuplicateEmail));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("p@x.com", UserRole::Patient))
            .await
            .unwrap();
        repo.insert(new_user("d1@x.com", UserRole::Doctor))
            .await
            .unwrap();
        repo.insert(new_user("d2@x.com", UserRole::Doctor))
            .await
            .unwrap();

        let doctors = repo.list_by_role(UserRole::Doctor).await.unwrap();
        assert_eq!(doctors.len(), 2);
        assert!(doctors.iter().all(|u| u.role == UserRole::Doctor));
        assert!(repo.list_by_role(UserRole::Admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forced_insert_failure() {
        let repo = InMemoryUserRepository::new();
        repo.fail_inserts(true);

        let err = repo
            .insert(new_user("a@x.com", UserRole::Patient))
            .await
            .unwrap_err();

        assert!(err.is(ErrorCode::Internal));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_forced_duplicate_on_insert() {
        let repo = InMemoryUserRepository::new();
        repo.duplicate_on_insert(true);

        let err = repo
            .insert(new_user("a@x.com", UserRole::Patient))
            .await
            .unwrap_err();

        assert!(err.is(ErrorCode::DuplicateEmail));
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
    }
}
