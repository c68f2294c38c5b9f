//! PostgreSQL-backed `PetRepository` implementation using Diesel ORM.
//!
//! Statistic adjustments run as a single `UPDATE ... SET col =
//! GREATEST(LEAST(col + delta, 100), 0)` so concurrent writers never lose an
//! update and the stored value never leaves `0..=100`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{AtomicActionOutcome, PetRepository, PetRepositoryError};
use crate::domain::{
    LedgerAction, LedgerEntry, NewLedgerEntry, NewPet, Pet, PetId, StatAdjustment, StatKind,
    UserId, VitalStat,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    NewActivityLogRow, NewFeedingLogRow, NewPetRow, PetRow, PetTypeRow, RowConversionError,
    ledger_entry_id,
};
use super::pool::{DbPool, PoolError};
use super::schema::{pet_activity_log, pet_feeding_log, pet_types, pets};

diesel::define_sql_function! {
    /// PostgreSQL `LEAST` over two integers.
    fn least(a: Integer, b: Integer) -> Integer;
}

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two integers.
    fn greatest(a: Integer, b: Integer) -> Integer;
}

const STAT_CEILING: i32 = VitalStat::MAX as i32;
const STAT_FLOOR: i32 = VitalStat::MIN as i32;

/// Diesel-backed implementation of the `PetRepository` port.
#[derive(Clone)]
pub struct DieselPetRepository {
    pool: DbPool,
}

impl DieselPetRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use pet_backend::outbound::persistence::{DbPool, DieselPetRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/pets")).await?;
    /// let _pets = DieselPetRepository::new(pool);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PetRepositoryError {
    map_basic_pool_error(error, PetRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PetRepositoryError {
    map_basic_diesel_error(
        error,
        PetRepositoryError::query,
        PetRepositoryError::connection,
    )
}

fn map_row_error(error: RowConversionError) -> PetRepositoryError {
    PetRepositoryError::query(error.to_string())
}

type JoinedPetRow = (PetRow, PetTypeRow);

fn into_pet((pet, pet_type): JoinedPetRow) -> Result<Pet, PetRepositoryError> {
    pet.into_pet(pet_type).map_err(map_row_error)
}

async fn load_pet(
    conn: &mut AsyncPgConnection,
    pet_id: i64,
) -> QueryResult<Option<JoinedPetRow>> {
    pets::table
        .inner_join(pet_types::table)
        .filter(pets::pet_id.eq(pet_id))
        .select((PetRow::as_select(), PetTypeRow::as_select()))
        .first::<JoinedPetRow>(conn)
        .await
        .optional()
}

/// Apply the clamped delta in place. Returns the number of rows touched.
async fn apply_adjustment(
    conn: &mut AsyncPgConnection,
    pet_id: i64,
    adjustment: StatAdjustment,
) -> QueryResult<usize> {
    let delta = adjustment.delta();
    let target = pets::table.filter(pets::pet_id.eq(pet_id));
    match adjustment.kind() {
        StatKind::Hunger => {
            diesel::update(target)
                .set(pets::hunger_level.eq(greatest(
                    least(pets::hunger_level + delta, STAT_CEILING),
                    STAT_FLOOR,
                )))
                .execute(conn)
                .await
        }
        StatKind::Happiness => {
            diesel::update(target)
                .set(pets::happiness_level.eq(greatest(
                    least(pets::happiness_level + delta, STAT_CEILING),
                    STAT_FLOOR,
                )))
                .execute(conn)
                .await
        }
    }
}

async fn insert_ledger_row(
    conn: &mut AsyncPgConnection,
    entry: &NewLedgerEntry,
) -> QueryResult<i64> {
    let pet_id = entry.pet_id.get();
    match entry.action {
        LedgerAction::Fed(food_id) => {
            diesel::insert_into(pet_feeding_log::table)
                .values(&NewFeedingLogRow {
                    pet_id,
                    food_id: food_id.get(),
                    fed_at: entry.recorded_at,
                })
                .returning(pet_feeding_log::log_id)
                .get_result(conn)
                .await
        }
        LedgerAction::Played(activity_id) => {
            diesel::insert_into(pet_activity_log::table)
                .values(&NewActivityLogRow {
                    pet_id,
                    activity_id: activity_id.get(),
                    played_at: entry.recorded_at,
                })
                .returning(pet_activity_log::log_id)
                .get_result(conn)
                .await
        }
    }
}

#[async_trait]
impl PetRepository for DieselPetRepository {
    async fn find_by_id(&self, pet_id: PetId) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_pet(&mut conn, pet_id.get())
            .await
            .map_err(map_diesel_error)?
            .map(into_pet)
            .transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<JoinedPetRow> = pets::table
            .inner_join(pet_types::table)
            .filter(pets::user_id.eq(user_id.get()))
            .order(pets::pet_id.asc())
            .select((PetRow::as_select(), PetTypeRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(into_pet).collect()
    }

    async fn list_ids_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PetId>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = pets::table
            .filter(pets::user_id.eq(user_id.get()))
            .order(pets::pet_id.asc())
            .select(pets::pet_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ids.into_iter()
            .map(|raw| PetId::new(raw).map_err(|e| PetRepositoryError::query(e.to_string())))
            .collect()
    }

    async fn insert(&self, pet: &NewPet) -> Result<Option<Pet>, PetRepositoryError> {
        let row = NewPetRow::from_domain(pet).map_err(map_row_error)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let joined = conn
            .transaction(|conn| {
                async move {
                    let type_exists: Option<i64> = pet_types::table
                        .filter(pet_types::pet_type_id.eq(row.pet_type_id))
                        .select(pet_types::pet_type_id)
                        .first(conn)
                        .await
                        .optional()?;
                    if type_exists.is_none() {
                        return Ok(None);
                    }

                    let pet_id: i64 = diesel::insert_into(pets::table)
                        .values(&row)
                        .returning(pets::pet_id)
                        .get_result(conn)
                        .await?;
                    load_pet(conn, pet_id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        joined.map(into_pet).transpose()
    }

    async fn delete(&self, pet_id: PetId) -> Result<bool, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(pets::table.filter(pets::pet_id.eq(pet_id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn adjust_stat(
        &self,
        pet_id: PetId,
        adjustment: StatAdjustment,
    ) -> Result<Option<Pet>, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_id = pet_id.get();

        let joined = conn
            .transaction(|conn| {
                async move {
                    if apply_adjustment(conn, raw_id, adjustment).await? == 0 {
                        return Ok(None);
                    }
                    load_pet(conn, raw_id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        joined.map(into_pet).transpose()
    }

    async fn record_and_adjust(
        &self,
        entry: &NewLedgerEntry,
        adjustment: StatAdjustment,
    ) -> Result<AtomicActionOutcome, PetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_pet_id = entry.pet_id.get();

        // The stat update runs first so a missing pet aborts before the
        // ledger row is written.
        let committed = conn
            .transaction(|conn| {
                async move {
                    if apply_adjustment(conn, raw_pet_id, adjustment).await? == 0 {
                        return Ok(None);
                    }
                    let log_id = insert_ledger_row(conn, entry).await?;
                    let joined = load_pet(conn, raw_pet_id)
                        .await?
                        .ok_or(diesel::result::Error::NotFound)?;
                    Ok(Some((log_id, joined)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((log_id, joined)) = committed else {
            debug!(pet_id = raw_pet_id, "pet missing; atomic action skipped");
            return Ok(AtomicActionOutcome::PetMissing);
        };
        let entry = LedgerEntry::from_new(ledger_entry_id(log_id).map_err(map_row_error)?, entry);
        Ok(AtomicActionOutcome::Applied {
            pet: into_pet(joined)?,
            entry,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn clamp_bounds_match_vital_stat_range() {
        assert_eq!(STAT_FLOOR, 0);
        assert_eq!(STAT_CEILING, 100);
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(error, PetRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound, false)]
    #[case(DieselError::RollbackTransaction, false)]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ),
        true
    )]
    fn diesel_errors_map_by_kind(#[case] error: DieselError, #[case] is_connection: bool) {
        let mapped = map_diesel_error(error);
        assert_eq!(
            matches!(mapped, PetRepositoryError::Connection { .. }),
            is_connection
        );
    }

    #[rstest]
    fn corrupt_rows_become_query_errors() {
        let row = PetRow {
            pet_id: 1,
            user_id: 1,
            pet_name: "Rex".to_owned(),
            pet_type_id: 1,
            age: 2,
            happiness_level: 150,
            hunger_level: 50,
        };
        let pet_type = PetTypeRow {
            pet_type_id: 1,
            type_name: "Dog".to_owned(),
        };
        let error = into_pet((row, pet_type)).expect_err("out of range");
        assert!(matches!(error, PetRepositoryError::Query { .. }));
    }
}
