//! # CarePoint Auth
//!
//! Stateless session handling for the CarePoint API.
//!
//! - [`claims`]: the JWT claim set
//! - [`jwt`]: [`SessionTokens`], the token issuer and verifier
//! - [`cookies`]: per-role cookie namespaces and cookie builders
//!
//! # Flow
//!
//! ```text
//! login ──► SessionTokens::issue ──► session_cookie(namespace) ──► Set-Cookie
//! request ──► cookie(namespace) ──► SessionTokens::verify ──► principal id
//! logout ──► cleared_cookie(namespace) ──► Set-Cookie (expired)
//! ```
//!
//! Logout only instructs the browser to forget the cookie. A copy of the
//! token made earlier keeps verifying until its own `exp`.

pub mod claims;
pub mod cookies;
pub mod jwt;

pub use claims::SessionClaims;
pub use cookies::{SessionNamespace, cleared_cookie, session_cookie};
pub use jwt::{IssuedToken, SessionTokens};
