// Reading source trait for remote data access
use crate::domain::query::{DateRange, QueryContext};
use crate::domain::reading::Reading;
use async_trait::async_trait;
use thiserror::Error;

/// Every way a fetch can fail. The dashboard renders all of them the same way.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to reading source failed: {0}")]
    Transport(String),

    #[error("reading source answered with status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("reading source reported a failed query")]
    NotOk,
}

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Fetch readings for the given filters, most recent first.
    async fn fetch_readings(
        &self,
        context: &QueryContext,
        range: &DateRange,
    ) -> Result<Vec<Reading>, SourceError>;
}
