//! Shared translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    ApplicationPersistenceError, MissionPersistenceError, UserPersistenceError,
};

use super::models::InvalidRow;
use super::pool::PoolError;

/// Port error enums sharing the connection/query/duplicate split.
pub(crate) trait PersistenceFailure: Sized {
    fn connection_failed(message: String) -> Self;
    fn query_failed(message: String) -> Self;
    fn duplicate_key(message: String) -> Self;

    /// A foreign key pointed at a row that is gone. Ports without a
    /// dedicated variant report it as a query failure.
    fn reference_missing(message: String) -> Self {
        Self::query_failed(message)
    }
}

macro_rules! persistence_failure {
    ($($error:ty $(=> $missing:ident)?),+ $(,)?) => {
        $(
            impl PersistenceFailure for $error {
                fn connection_failed(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failed(message: String) -> Self {
                    Self::query(message)
                }

                fn duplicate_key(message: String) -> Self {
                    Self::duplicate(message)
                }

                $(
                    fn reference_missing(message: String) -> Self {
                        Self::$missing(message)
                    }
                )?
            }
        )+
    };
}

persistence_failure!(
    UserPersistenceError,
    MissionPersistenceError => missing_reference,
    ApplicationPersistenceError => missing_reference,
);

pub(crate) fn map_pool_error<E: PersistenceFailure>(error: PoolError) -> E {
    E::connection_failed(error.message().to_owned())
}

/// Unique violations become `Duplicate` and foreign key violations
/// `MissingReference`, both carrying the constraint name when Postgres
/// reports one. Closed connections become `Connection`; anything else is a
/// `Query` failure.
pub(crate) fn map_diesel_error<E: PersistenceFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => E::duplicate_key(
            info.constraint_name()
                .unwrap_or("unique constraint")
                .to_owned(),
        ),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failed("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            E::reference_missing(
                info.constraint_name()
                    .unwrap_or("foreign key constraint")
                    .to_owned(),
            )
        }
        DieselError::NotFound => E::query_failed("record not found".to_owned()),
        _ => E::query_failed("database error".to_owned()),
    }
}

pub(crate) fn map_invalid_row<E: PersistenceFailure>(error: InvalidRow) -> E {
    E::query_failed(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(String::from("boom")))
    }

    #[rstest]
    fn unique_violation_is_duplicate() {
        let mapped: MissionPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation));
        assert!(matches!(mapped, MissionPersistenceError::Duplicate { .. }));
    }

    #[rstest]
    fn closed_connection_is_connection_failure() {
        let mapped: UserPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection));
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    fn foreign_key_violation_is_missing_reference() {
        let mapped: ApplicationPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::ForeignKeyViolation));
        assert!(matches!(
            mapped,
            ApplicationPersistenceError::MissingReference { .. }
        ));
    }

    #[rstest]
    fn users_report_foreign_key_violations_as_query_failures() {
        let mapped: UserPersistenceError =
            map_diesel_error(database_error(DatabaseErrorKind::ForeignKeyViolation));
        assert!(matches!(mapped, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::CheckViolation))]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_failures_are_query_failures(#[case] error: DieselError) {
        let mapped: ApplicationPersistenceError = map_diesel_error(error);
        assert!(matches!(mapped, ApplicationPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let mapped: ApplicationPersistenceError =
            map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, ApplicationPersistenceError::connection("timed out"));
    }
}
