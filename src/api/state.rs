use std::sync::Arc;

use crate::data::Datasets;
use crate::error::{AppError, AppResult};
use crate::services::recommender::DEFAULT_SAMPLE_SIZE;

/// Shared application state
///
/// The datasets are loaded once at startup and never mutated, so handlers
/// read through the `Arc` without any locking.
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<Datasets>,
    pub sample_size: usize,
}

impl AppState {
    /// Creates state over loaded datasets, failing fast when the content
    /// recommender could never draw its sample.
    pub fn new(datasets: Arc<Datasets>, sample_size: usize) -> AppResult<Self> {
        if sample_size > datasets.games().len() {
            return Err(AppError::Config(format!(
                "content sample size {} exceeds catalog size {}",
                sample_size,
                datasets.games().len()
            )));
        }
        Ok(Self {
            datasets,
            sample_size,
        })
    }

    /// Convenience constructor using the default sample size.
    pub fn with_default_sample(datasets: Arc<Datasets>) -> AppResult<Self> {
        Self::new(datasets, DEFAULT_SAMPLE_SIZE)
    }
}
