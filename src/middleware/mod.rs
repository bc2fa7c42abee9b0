//! Request gates.
//!
//! - [`session`]: per-role session gates (`require_admin`, `require_patient`,
//!   `require_doctor`) and the [`CurrentUser`](session::CurrentUser)
//!   extractor
//! - [`role`]: role-set checks layered behind a session gate
//!
//! # Authentication Flow
//!
//! 1. The gate reads the cookie of its own namespace (`adminToken`,
//!    `patientToken` or `doctorToken`)
//! 2. The token is verified and the principal loaded from the repository
//! 3. The principal's stored role must equal the gate's role
//! 4. The principal is attached to the request as `CurrentUser`
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use crate::middleware::session::{CurrentUser, require_admin};
//!
//! async fn whoami(CurrentUser { user, .. }: CurrentUser) -> String {
//!     user.email
//! }
//!
//! let routes = Router::new()
//!     .route("/admin/whoami", get(whoami))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

pub mod role;
pub mod session;
