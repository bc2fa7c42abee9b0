//! # CarePoint Models
//!
//! Domain models and DTOs for the CarePoint API.
//!
//! - [`users`]: the principal record, roles and listing envelopes
//! - [`auth`]: registration, login and logout bodies
//!
//! # Example
//!
//! ```ignore
//! use carepoint_models::{LoginRequest, UserRole};
//!
//! let request: LoginRequest = serde_json::from_str(body)?;
//! if request.role != Some(UserRole::Admin) {
//!     // ...
//! }
//! ```

pub mod auth;
pub mod users;

pub use auth::{
    AuthResponse, LoginRequest, MessageResponse, RegisterDoctorDto, RegisterUserDto,
    RegistrationFields,
};
pub use users::{
    AdminCreatedResponse, DoctorAvatar, DoctorCreatedResponse, DoctorsResponse, Gender, NewUser,
    User, UserCredentials, UserResponse, UserRole, normalize_email,
};
