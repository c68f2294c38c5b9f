//! Failure taxonomy of the stats engine and its mapping to domain errors.

use std::future::Future;
use std::time::Duration;

use serde_json::json;

use crate::domain::ports::{ActionCatalogError, LedgerRepositoryError, PetRepositoryError};
use crate::domain::{
    ActivityId, Error, FoodId, LedgerEntryId, PetId, PetTypeId, PetValidationError, StatKind,
};

/// Why a pet care operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetCareError {
    #[error("pet {pet_id} not found")]
    PetNotFound { pet_id: PetId },
    #[error("food {food_id} not found")]
    FoodNotFound { food_id: FoodId },
    #[error("activity {activity_id} not found")]
    ActivityNotFound { activity_id: ActivityId },
    #[error("pet type {pet_type_id} not found")]
    PetTypeNotFound { pet_type_id: PetTypeId },
    #[error("invalid request: {0}")]
    Validation(#[from] PetValidationError),
    /// Storage could not be reached or did not answer in time.
    #[error("storage unavailable during {operation}: {message}")]
    StorageUnavailable {
        operation: &'static str,
        message: String,
    },
    /// Storage answered with an error.
    #[error("storage failed during {operation}: {message}")]
    StorageFailed {
        operation: &'static str,
        message: String,
    },
    /// The ledger entry was written but the statistic was not updated.
    #[error("ledger entry {entry_id} recorded for pet {pet_id} but {stat} update failed: {message}")]
    PartialConsistency {
        pet_id: PetId,
        entry_id: LedgerEntryId,
        stat: StatKind,
        message: String,
    },
}

impl PetCareError {
    pub(crate) fn timed_out(operation: &'static str, after: Duration) -> Self {
        Self::StorageUnavailable {
            operation,
            message: format!("no response within {}ms", after.as_millis()),
        }
    }
}

fn item_not_found(message: &str, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

impl From<PetCareError> for Error {
    fn from(error: PetCareError) -> Self {
        match error {
            PetCareError::PetNotFound { .. } => Self::not_found("Pet not found"),
            PetCareError::FoodNotFound { .. } => {
                item_not_found("Food not found", "food_id", "food_not_found")
            }
            PetCareError::ActivityNotFound { .. } => {
                item_not_found("Activity not found", "activity_id", "activity_not_found")
            }
            PetCareError::PetTypeNotFound { .. } => {
                item_not_found("Pet type not found", "pet_type_id", "pet_type_not_found")
            }
            PetCareError::Validation(err) => Self::invalid_request(err.to_string()),
            PetCareError::StorageUnavailable { .. } => {
                Self::service_unavailable("Storage temporarily unavailable")
            }
            PetCareError::StorageFailed { .. } => Self::internal("Database error"),
            PetCareError::PartialConsistency { stat, .. } => {
                Self::internal(format!("Failed to update pet {stat}"))
            }
        }
    }
}

/// Classifies a driven port failure as unavailable or failed storage.
pub(crate) trait StorageFailure {
    fn into_care_error(self, operation: &'static str) -> PetCareError;
}

macro_rules! impl_storage_failure {
    ($($port_error:ident),* $(,)?) => {
        $(
            impl StorageFailure for $port_error {
                fn into_care_error(self, operation: &'static str) -> PetCareError {
                    match self {
                        $port_error::Connection { message } => {
                            PetCareError::StorageUnavailable { operation, message }
                        }
                        $port_error::Query { message } => {
                            PetCareError::StorageFailed { operation, message }
                        }
                    }
                }
            }
        )*
    };
}

impl_storage_failure!(PetRepositoryError, LedgerRepositoryError, ActionCatalogError);

/// Await a port call for at most `limit`.
///
/// An elapsed deadline surfaces as [`PetCareError::StorageUnavailable`] so
/// no operation blocks indefinitely on storage.
pub(crate) async fn within_deadline<T, E, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, PetCareError>
where
    F: Future<Output = Result<T, E>>,
    E: StorageFailure,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|err| err.into_care_error(operation)),
        Err(_) => Err(PetCareError::timed_out(operation, limit)),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn pet_id() -> PetId {
        PetId::new(1).expect("pet id")
    }

    #[rstest]
    #[case(PetCareError::PetNotFound { pet_id: pet_id() }, ErrorCode::NotFound, "Pet not found")]
    #[case(
        PetCareError::FoodNotFound { food_id: FoodId::new(9).expect("food id") },
        ErrorCode::InvalidRequest,
        "Food not found"
    )]
    #[case(
        PetCareError::ActivityNotFound { activity_id: ActivityId::new(9).expect("activity id") },
        ErrorCode::InvalidRequest,
        "Activity not found"
    )]
    #[case(
        PetCareError::StorageUnavailable { operation: "load pet", message: "refused".to_owned() },
        ErrorCode::ServiceUnavailable,
        "Storage temporarily unavailable"
    )]
    #[case(
        PetCareError::StorageFailed { operation: "load pet", message: "syntax".to_owned() },
        ErrorCode::InternalError,
        "Database error"
    )]
    #[case(
        PetCareError::PartialConsistency {
            pet_id: pet_id(),
            entry_id: LedgerEntryId::new(3).expect("entry id"),
            stat: StatKind::Happiness,
            message: "lost".to_owned(),
        },
        ErrorCode::InternalError,
        "Failed to update pet happiness"
    )]
    fn maps_to_domain_errors(
        #[case] error: PetCareError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }

    #[test]
    fn missing_food_carries_machine_readable_code() {
        let mapped = Error::from(PetCareError::FoodNotFound {
            food_id: FoodId::new(9).expect("food id"),
        });
        let details = mapped.details().expect("details present");
        assert_eq!(details["code"], "food_not_found");
    }

    #[rstest]
    #[case(PetRepositoryError::connection("down"), true)]
    #[case(PetRepositoryError::query("bad"), false)]
    fn port_errors_split_by_retryability(#[case] error: PetRepositoryError, #[case] unavailable: bool) {
        let care = error.into_care_error("adjust stat");
        assert_eq!(matches!(care, PetCareError::StorageUnavailable { .. }), unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_is_storage_unavailable() {
        let result: Result<(), PetCareError> = within_deadline(
            Duration::from_millis(50),
            "load pet",
            std::future::pending::<Result<(), PetRepositoryError>>(),
        )
        .await;
        assert!(matches!(
            result,
            Err(PetCareError::StorageUnavailable { operation: "load pet", .. })
        ));
    }
}
