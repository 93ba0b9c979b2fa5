//! Single-user basic authentication for the admin routes.

pub mod credential;
pub mod middleware;

pub use credential::{AdminCredential, CredentialError};
pub use middleware::basic_auth_middleware;

/// Authenticated admin, inserted into request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}
