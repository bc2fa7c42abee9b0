//! # CarePoint Core
//!
//! Foundational types shared by every CarePoint crate:
//!
//! - [`errors`]: the [`AppError`] taxonomy and the JSON error envelope
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: form-friendly deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use carepoint_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("pw123456")?;
//! if !verify_password("pw123456", &hash)? {
//!     return Err(AppError::invalid_credentials());
//! }
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use password::{
    hash_password, hash_password_blocking, prepare_dummy_hash, verify_dummy_password,
    verify_password, verify_password_blocking,
};
