// Provider port for retrieving series data
use crate::domain::series::{Series, SeriesId};
use async_trait::async_trait;
use thiserror::Error;

/// Why a series could not be produced. Transport and parse failures are
/// handled identically downstream; the split only drives the log level.
/// Payloads are plain strings so a result can fan out to every caller
/// waiting on the same fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Retrieve the raw remote data for one series and normalize it into an
    /// ordered label/value sequence. No shared state is touched.
    async fn fetch(&self, id: SeriesId) -> Result<Series, FetchError>;
}
