//! Request and response bodies for registration, login and logout.
//!
//! Every request field is an `Option` read through
//! [`deserialize_blank_as_none`] (passwords through [`deserialize_secret`],
//! which keeps them unaltered), so an absent key, `null` and `""` all land
//! on the `required` validator and surface as "Please Fill Full Form!".

use carepoint_core::AppError;
use carepoint_core::serde::{deserialize_blank_as_none, deserialize_secret};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{DoctorAvatar, Gender, NewUser, User, UserRole, normalize_email};

/// Identity fields shared by patient self-registration and admin creation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required, email(message = "Please Provide A Valid Email!"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub nic: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub dob: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    #[validate(
        required,
        length(min = 8, message = "Password Must Contain At Least 8 Characters!")
    )]
    pub password: Option<String>,
}

/// Doctor creation form, submitted as `multipart/form-data` alongside the
/// `docAvatar` file part.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorDto {
    #[serde(flatten)]
    pub details: RegisterUserDto,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub doctor_department: Option<String>,
}

/// A registration form with every field present. Built from a
/// [`RegisterUserDto`]; any missing field yields "Please Fill Full Form!".
#[derive(Debug, Clone)]
pub struct RegistrationFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nic: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub password: String,
}

impl TryFrom<RegisterUserDto> for RegistrationFields {
    type Error = AppError;

    fn try_from(dto: RegisterUserDto) -> Result<Self, Self::Error> {
        let RegisterUserDto {
            first_name: Some(first_name),
            last_name: Some(last_name),
            email: Some(email),
            phone: Some(phone),
            nic: Some(nic),
            dob: Some(dob),
            gender: Some(gender),
            password: Some(password),
        } = dto
        else {
            return Err(AppError::incomplete_form());
        };

        Ok(Self {
            first_name,
            last_name,
            email: normalize_email(&email),
            phone,
            nic,
            dob,
            gender,
            password,
        })
    }
}

impl RegistrationFields {
    /// Consumes the form, keeping `password_hash` in place of the plaintext.
    pub fn into_new_user(self, role: UserRole, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            nic: self.nic,
            dob: self.dob,
            gender: self.gender,
            role,
            password_hash,
            doctor_department: None,
            doc_avatar: None,
        }
    }
}

impl NewUser {
    pub fn with_doctor_profile(mut self, department: String, avatar: DoctorAvatar) -> Self {
        self.doctor_department = Some(department);
        self.doc_avatar = Some(avatar);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    #[validate(required)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    #[validate(required)]
    pub role: Option<UserRole>,
}

/// Returned by registration and login; the token is also set as a cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
