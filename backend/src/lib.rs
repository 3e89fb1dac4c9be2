//! Volunteering coordination backend.
//!
//! Associations post missions, volunteers apply, and associations accept or
//! reject applicants. The crate is laid out as a hexagon: [`domain`] holds
//! entities, use-cases and ports, [`inbound`] the HTTP adapter, and
//! [`outbound`] the storage and hashing adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
