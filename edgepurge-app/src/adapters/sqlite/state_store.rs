//! `StateStore` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait, TransactionTrait};

use edgepurge_core::error::{CoreError, CoreResult};
use edgepurge_core::traits::StateStore;
use edgepurge_core::types::{CounterKind, RateCounter, RateWindow};

use super::entity::purge_state;
use super::SqliteStore;

fn storage_error(action: &'static str) -> impl FnOnce(sea_orm::DbErr) -> CoreError {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}

async fn read_value<C: ConnectionTrait>(conn: &C, key: &str) -> CoreResult<Option<String>> {
    let row = purge_state::Entity::find_by_id(key)
        .one(conn)
        .await
        .map_err(storage_error("read purge state"))?;
    Ok(row.map(|r| r.value))
}

/// Both rows are needed; a count without a start (or vice versa) reads as absent.
async fn read_counter<C: ConnectionTrait>(
    conn: &C,
    kind: CounterKind,
) -> CoreResult<Option<RateCounter>> {
    let count = read_value(conn, kind.count_key()).await?;
    let start = read_value(conn, kind.start_key()).await?;
    let (Some(count), Some(start)) = (count, start) else {
        return Ok(None);
    };

    let count = count.trim().parse::<u64>().map_err(|e| {
        CoreError::StorageError(format!("Invalid value for {}: {e}", kind.count_key()))
    })?;
    let window_start = DateTime::parse_from_rfc3339(start.trim())
        .map_err(|e| {
            CoreError::StorageError(format!("Invalid value for {}: {e}", kind.start_key()))
        })?
        .with_timezone(&Utc);

    Ok(Some(RateCounter {
        count,
        window_start,
    }))
}

async fn write_value<C: ConnectionTrait>(conn: &C, key: &str, value: String) -> CoreResult<()> {
    let active_model = purge_state::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value),
    };

    purge_state::Entity::insert(active_model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(purge_state::Column::Key)
                .update_columns([purge_state::Column::Value])
                .to_owned(),
        )
        .exec(conn)
        .await
        .map_err(storage_error("write purge state"))?;
    Ok(())
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get_counter(&self, kind: CounterKind) -> CoreResult<Option<RateCounter>> {
        read_counter(&self.db, kind).await
    }

    async fn increment_counter(
        &self,
        kind: CounterKind,
        window: &RateWindow,
        now: DateTime<Utc>,
    ) -> CoreResult<RateCounter> {
        let _guard = self.write_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(storage_error("begin transaction"))?;

        // Writing first takes SQLite's write lock, so no other connection
        // can change the counter between the read and the upsert below.
        txn.execute_unprepared(&format!(
            "UPDATE purge_state SET value = value WHERE key = '{}'",
            kind.count_key()
        ))
        .await
        .map_err(storage_error("lock purge state"))?;

        let next = window.advance(read_counter(&txn, kind).await?, now);
        write_value(&txn, kind.count_key(), next.count.to_string()).await?;
        write_value(&txn, kind.start_key(), next.window_start.to_rfc3339()).await?;

        txn.commit()
            .await
            .map_err(storage_error("commit transaction"))?;
        Ok(next)
    }
}
