use sqlx::{PgPool, Row};

use crate::{
    models::{TelemetryInput, TelemetryRecord},
    Error, Result,
};

/// Telemetry repository for database operations
///
/// Every operation is independently transactional; the store relies on the
/// database's isolation for mutation safety and adds no locking of its own.
#[derive(Clone, Debug)]
pub struct TelemetryRepository {
    pool: PgPool,
}

impl TelemetryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a whole batch inside one transaction.
    ///
    /// Either every element is committed and the assigned ids come back in
    /// input order, or the transaction rolls back and nothing is visible.
    pub async fn create_batch(&self, batch: &[TelemetryInput]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(batch.len());

        for input in batch {
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO processed_agent_data (road_state, x, y, z, latitude, longitude, timestamp)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(&input.road_state)
            .bind(input.agent_data.accelerometer.x)
            .bind(input.agent_data.accelerometer.y)
            .bind(input.agent_data.accelerometer.z)
            .bind(input.agent_data.gps.latitude)
            .bind(input.agent_data.gps.longitude)
            .bind(input.agent_data.timestamp)
            .fetch_one(&mut *tx)
            .await?;

            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    /// Point lookup by primary key
    pub async fn get_by_id(&self, id: i64) -> Result<Option<TelemetryRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, road_state, x, y, z, latitude, longitude, timestamp
            FROM processed_agent_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Full scan in id order. Intended for small datasets; there is no
    /// pagination.
    pub async fn list_all(&self) -> Result<Vec<TelemetryRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, road_state, x, y, z, latitude, longitude, timestamp
            FROM processed_agent_data
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Full-field replace of an existing record.
    ///
    /// A single conditional UPDATE, so a concurrent delete of the same id
    /// surfaces as NotFound instead of racing a separate existence check.
    /// Returns the post-update row image as read back from storage.
    pub async fn update(&self, id: i64, input: &TelemetryInput) -> Result<TelemetryRecord> {
        let row = sqlx::query(
            r#"
            UPDATE processed_agent_data
            SET road_state = $2, x = $3, y = $4, z = $5, latitude = $6, longitude = $7, timestamp = $8
            WHERE id = $1
            RETURNING id, road_state, x, y, z, latitude, longitude, timestamp
            "#,
        )
        .bind(id)
        .bind(&input.road_state)
        .bind(input.agent_data.accelerometer.x)
        .bind(input.agent_data.accelerometer.y)
        .bind(input.agent_data.accelerometer.z)
        .bind(input.agent_data.gps.latitude)
        .bind(input.agent_data.gps.longitude)
        .bind(input.agent_data.timestamp)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_record(&row),
            None => Err(Error::NotFound("data not exist".to_string())),
        }
    }

    /// Delete by primary key. Deleting an absent id is not an error.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM processed_agent_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id, "Delete targeted an absent record");
        }

        Ok(())
    }

    /// Helper method to convert a database row to a TelemetryRecord
    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<TelemetryRecord> {
        Ok(TelemetryRecord {
            id: row.try_get("id")?,
            road_state: row.try_get("road_state")?,
            x: row.try_get("x")?,
            y: row.try_get("y")?,
            z: row.try_get("z")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}
