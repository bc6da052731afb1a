//! Ingestion coordination: validate, commit, then fan out
//!
//! The batch is validated in full before the store is touched, committed as
//! one transaction, and only committed records reach the dispatcher.
//! Per-subscriber delivery failures never affect the caller.

use tracing::info;

use super::notify::TelemetryNotifier;
use crate::{
    models::{TelemetryInput, TelemetryRecord},
    repository::TelemetryRepository,
    validation, Error, Result,
};

/// Acknowledgement of a committed batch
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    /// Assigned ids, in input order
    pub ids: Vec<i64>,
}

impl IngestReceipt {
    #[must_use]
    pub fn committed(&self) -> usize {
        self.ids.len()
    }
}

/// CRUD and ingest operations over telemetry records
#[derive(Clone)]
pub struct TelemetryService {
    repository: TelemetryRepository,
    notifier: TelemetryNotifier,
}

impl TelemetryService {
    pub fn new(repository: TelemetryRepository, notifier: TelemetryNotifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Ingest a batch: all-or-nothing commit, then one notification per
    /// committed record.
    pub async fn ingest(&self, batch: Vec<TelemetryInput>) -> Result<IngestReceipt> {
        validation::validate_batch(&batch)?;

        let ids = self.repository.create_batch(&batch).await?;

        for (id, input) in ids.iter().zip(&batch) {
            let record = TelemetryRecord::from_input(*id, input);
            self.notifier.notify_record_created(&record);
        }

        info!(committed = ids.len(), "Telemetry batch ingested");
        Ok(IngestReceipt { ids })
    }

    /// Fetch one record by id
    pub async fn get(&self, id: i64) -> Result<TelemetryRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("data not exist".to_string()))
    }

    /// Fetch every record
    pub async fn list(&self) -> Result<Vec<TelemetryRecord>> {
        self.repository.list_all().await
    }

    /// Replace every mutable field of an existing record and notify
    /// observers of the new image.
    pub async fn update(&self, id: i64, input: TelemetryInput) -> Result<TelemetryRecord> {
        validation::validate_input(&input)?;

        let record = self.repository.update(id, &input).await?;
        self.notifier.notify_record_updated(&record);

        Ok(record)
    }

    /// Delete a record. Deleting an absent id succeeds; deletes are not
    /// broadcast.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await
    }
}
