//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuditor`] -- Requires `admin` or `manager` role.
//! - [`client::ClientInfo`] -- Caller IP and user agent for audit entries.

pub mod auth;
pub mod client;
pub mod rbac;
