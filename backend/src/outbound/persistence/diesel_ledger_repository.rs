//! PostgreSQL-backed `LedgerRepository` implementation using Diesel ORM.
//!
//! Feeding and play events live in separate log tables. History reads join
//! the log with `pets` and the catalog table, so entries for deleted pets
//! stay stored but drop out of every history view.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};
use crate::domain::{
    HistoryKind, HistoryQuery, HistoryRecord, HistoryScope, LedgerAction, LedgerEntry,
    NewLedgerEntry,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    HistoryRow, NewActivityLogRow, NewFeedingLogRow, RowConversionError, history_pet_id,
    ledger_entry_id,
};
use super::pool::{DbPool, PoolError};
use super::schema::{activities, foods, pet_activity_log, pet_feeding_log, pets};

/// Diesel-backed implementation of the `LedgerRepository` port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    map_basic_pool_error(error, LedgerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerRepositoryError {
    map_basic_diesel_error(
        error,
        LedgerRepositoryError::query,
        LedgerRepositoryError::connection,
    )
}

fn map_row_error(error: RowConversionError) -> LedgerRepositoryError {
    LedgerRepositoryError::query(error.to_string())
}

fn sql_limit(limit: Option<usize>) -> Option<i64> {
    limit.map(|value| i64::try_from(value).unwrap_or(i64::MAX))
}

/// Build and run one history query against a log table.
///
/// Both ledgers share the same shape: `(log_id, pet_id, <item fk>, <ts>)`
/// joined to `pets` and the item's catalog table.
macro_rules! load_history {
    ($conn:expr, $query:expr, $log:ident, $ts:ident, $item:ident, $item_name:ident) => {{
        let mut statement = $log::table
            .inner_join(pets::table)
            .inner_join($item::table)
            .select((
                $log::log_id,
                pets::pet_id,
                pets::pet_name,
                $item::$item_name,
                $log::$ts,
            ))
            .order(($log::$ts.desc(), $log::log_id.desc()))
            .into_boxed::<Pg>();
        statement = match $query.scope {
            HistoryScope::Pet(pet_id) => statement.filter(pets::pet_id.eq(pet_id.get())),
            HistoryScope::User(user_id) => statement.filter(pets::user_id.eq(user_id.get())),
        };
        if let Some(limit) = sql_limit($query.limit) {
            statement = statement.limit(limit);
        }
        statement.load::<HistoryRow>($conn).await
    }};
}

async fn load_rows(
    conn: &mut AsyncPgConnection,
    query: &HistoryQuery,
) -> QueryResult<Vec<HistoryRow>> {
    match query.kind {
        HistoryKind::Food => {
            load_history!(conn, query, pet_feeding_log, fed_at, foods, food_name)
        }
        HistoryKind::Activity => load_history!(
            conn,
            query,
            pet_activity_log,
            played_at,
            activities,
            activity_name
        ),
    }
}

fn into_record(row: HistoryRow) -> Result<HistoryRecord, RowConversionError> {
    let (log_id, pet_id, pet_name, item_name, recorded_at) = row;
    Ok(HistoryRecord {
        entry_id: ledger_entry_id(log_id)?,
        pet_id: history_pet_id(pet_id)?,
        pet_name,
        item_name,
        recorded_at,
    })
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn record(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pet_id = entry.pet_id.get();

        let log_id: i64 = match entry.action {
            LedgerAction::Fed(food_id) => {
                diesel::insert_into(pet_feeding_log::table)
                    .values(&NewFeedingLogRow {
                        pet_id,
                        food_id: food_id.get(),
                        fed_at: entry.recorded_at,
                    })
                    .returning(pet_feeding_log::log_id)
                    .get_result(&mut conn)
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
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        let id = ledger_entry_id(log_id).map_err(map_row_error)?;
        Ok(LedgerEntry::from_new(id, entry))
    }

    async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryRecord>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = load_rows(&mut conn, query)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| into_record(row).map_err(map_row_error))
            .collect()
    }
}
