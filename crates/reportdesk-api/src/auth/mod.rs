//! Tenant identity resolution
//!
//! The service has no authentication of its own. Each request's tenant is resolved by an
//! `IdentityResolver` inside the identity middleware and handed to handlers as a
//! `TenantContext`. Nothing is cached between requests.

#[cfg(feature = "identity-authinfo")]
pub mod authinfo;
pub mod header;
pub mod middleware;
pub mod models;
pub mod resolver;

#[cfg(feature = "identity-authinfo")]
pub use authinfo::AuthInfoResolver;
pub use header::HeaderResolver;
pub use middleware::{identity_middleware, IdentityState};
pub use models::TenantContext;
pub use resolver::{create_identity_resolver, IdentityResolver};
