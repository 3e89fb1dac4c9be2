//! PostgreSQL persistence adapters using Diesel and `diesel-async`.
//!
//! Repositories only translate between row structs and domain types; the
//! rules live in the domain services. Row structs (`models`) and the table
//! definitions (`schema`) never leave this module.
//!
//! # Example
//!
//! ```ignore
//! use mission_board::outbound::persistence::{DbPool, DieselMissionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/missions")).await?;
//! let missions = DieselMissionRepository::new(pool);
//! ```

mod diesel_application_repository;
mod diesel_mission_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_mission_repository::DieselMissionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
