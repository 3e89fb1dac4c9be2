//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers gate on role, translate request bodies into domain values, and
//! delegate to the driving ports held by [`state::HttpState`].

pub mod applications;
pub mod error;
pub mod health;
pub mod missions;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
