use std::future::Future;
use std::time::Duration;

use carepoint_core::AppError;
use carepoint_models::{
    DoctorAvatar, Gender, NewUser, User, UserCredentials, UserRole, normalize_email,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::{RepoFuture, UserRepository};

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, nic, dob, gender, role, \
     doctor_department, doc_avatar_public_id, doc_avatar_url, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    nic: String,
    dob: NaiveDate,
    gender: Gender,
    role: UserRole,
    doctor_department: Option<String>,
    doc_avatar_public_id: Option<String>,
    doc_avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let doc_avatar = match (row.doc_avatar_public_id, row.doc_avatar_url) {
            (Some(public_id), Some(url)) => Some(DoctorAvatar { public_id, url }),
            _ => None,
        };

        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            nic: row.nic,
            dob: row.dob,
            gender: row.gender,
            role: row.role,
            doctor_department: row.doctor_department,
            doc_avatar,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

fn map_sqlx_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::duplicate_email("User already Registered!");
        }
    }
    AppError::internal(err)
}

/// PostgreSQL-backed [`UserRepository`]. Every query is bounded by `timeout`.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => Err(AppError::internal_error(format!(
                "Database {operation} timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

impl UserRepository for PgUserRepository {
    fn find_by_email<'a>(&'a self, email: &'a str) -> RepoFuture<'a, Option<User>> {
        Box::pin(async move {
            let email = normalize_email(email);
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

            let row = self
                .bounded(
                    "find_by_email",
                    sqlx::query_as::<_, UserRow>(&sql)
                        .bind(&email)
                        .fetch_optional(&self.pool),
                )
                .await?;

            Ok(row.map(User::from))
        })
    }

    fn find_credentials_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> RepoFuture<'a, Option<UserCredentials>> {
        Box::pin(async move {
            let email = normalize_email(email);
            let sql = format!("SELECT {USER_COLUMNS}, password FROM users WHERE email = $1");

            let row = self
                .bounded(
                    "find_credentials_by_email",
                    sqlx::query_as::<_, CredentialsRow>(&sql)
                        .bind(&email)
                        .fetch_optional(&self.pool),
                )
                .await?;

            Ok(row.map(|row| UserCredentials {
                user: row.user.into(),
                password_hash: row.password,
            }))
        })
    }

    fn find_by_id(&self, id: Uuid) -> RepoFuture<'_, Option<User>> {
        Box::pin(async move {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

            let row = self
                .bounded(
                    "find_by_id",
                    sqlx::query_as::<_, UserRow>(&sql)
                        .bind(id)
                        .fetch_optional(&self.pool),
                )
                .await?;

            Ok(row.map(User::from))
        })
    }

    fn insert(&self, user: NewUser) -> RepoFuture<'_, User> {
        Box::pin(async move {
            let sql = format!(
                "INSERT INTO users (id, first_name, last_name, email, phone, nic, dob, gender, \
                 role, password, doctor_department, doc_avatar_public_id, doc_avatar_url) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
                 RETURNING {USER_COLUMNS}"
            );
            let (avatar_id, avatar_url) = match user.doc_avatar {
                Some(avatar) => (Some(avatar.public_id), Some(avatar.url)),
                None => (None, None),
            };

            let row = self
                .bounded(
                    "insert",
                    sqlx::query_as::<_, UserRow>(&sql)
                        .bind(Uuid::new_v4())
                        .bind(&user.first_name)
                        .bind(&user.last_name)
                        .bind(normalize_email(&user.email))
                        .bind(&user.phone)
                        .bind(&user.nic)
                        .bind(user.dob)
                        .bind(user.gender)
                        .bind(user.role)
                        .bind(&user.password_hash)
                        .bind(&user.doctor_department)
                        .bind(&avatar_id)
                        .bind(&avatar_url)
                        .fetch_one(&self.pool),
                )
                .await?;

            Ok(row.into())
        })
    }

    fn list_by_role(&self, role: UserRole) -> RepoFuture<'_, Vec<User>> {
        Box::pin(async move {
            let sql =
                format!("SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at");

            let rows = self
                .bounded(
                    "list_by_role",
                    sqlx::query_as::<_, UserRow>(&sql)
                        .bind(role)
                        .fetch_all(&self.pool),
                )
                .await?;

            Ok(rows.into_iter().map(User::from).collect())
        })
    }
}
