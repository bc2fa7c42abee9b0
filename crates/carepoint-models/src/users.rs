//! Principal records and their response envelopes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The role a principal holds. Stored as the PostgreSQL enum `user_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Patient,
    Admin,
    Doctor,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Patient, UserRole::Admin, UserRole::Doctor];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "Patient",
            UserRole::Admin => "Admin",
            UserRole::Doctor => "Doctor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        })
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {other}")),
        }
    }
}

/// Reference to a doctor's avatar on the media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoctorAvatar {
    pub public_id: String,
    pub url: String,
}

/// A stored principal, without its password hash; see
/// [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nic: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_avatar: Option<DoctorAvatar>,
    pub created_at: DateTime<Utc>,
}

/// A principal together with its bcrypt hash, loaded only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Everything needed to insert a principal. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nic: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub role: UserRole,
    pub password_hash: String,
    pub doctor_department: Option<String>,
    pub doc_avatar: Option<DoctorAvatar>,
}

/// Lower-cases and trims an email so uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCreatedResponse {
    pub success: bool,
    pub message: String,
    pub admin: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorCreatedResponse {
    pub success: bool,
    pub message: String,
    pub doctor: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorsResponse {
    pub success: bool,
    pub doctors: Vec<User>,
}
