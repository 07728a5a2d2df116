use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::domain::EmployeeRecord;

/// One complete upload. Readers always see a whole snapshot, never a partial one.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    /// Bumped on every replace; `0` is the empty dataset the service starts with.
    pub generation: u64,
    pub records: Arc<Vec<EmployeeRecord>>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

impl DatasetSnapshot {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            records: Arc::new(Vec::new()),
            uploaded_at: None,
            source: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DatasetSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Storage abstraction over the single shared dataset. Last write wins.
pub trait DatasetRepository: Send + Sync {
    fn replace(
        &self,
        records: Vec<EmployeeRecord>,
        source: String,
    ) -> Result<DatasetSnapshot, RepositoryError>;
    fn snapshot(&self) -> Result<DatasetSnapshot, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("dataset repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryDatasetRepository {
    current: RwLock<DatasetSnapshot>,
}

impl InMemoryDatasetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetRepository for InMemoryDatasetRepository {
    fn replace(
        &self,
        records: Vec<EmployeeRecord>,
        source: String,
    ) -> Result<DatasetSnapshot, RepositoryError> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| RepositoryError::Unavailable("dataset lock poisoned".to_string()))?;
        let next = DatasetSnapshot {
            generation: guard.generation + 1,
            records: Arc::new(records),
            uploaded_at: Some(Utc::now()),
            source: Some(source),
        };
        *guard = next.clone();
        Ok(next)
    }

    fn snapshot(&self) -> Result<DatasetSnapshot, RepositoryError> {
        let guard = self
            .current
            .read()
            .map_err(|_| RepositoryError::Unavailable("dataset lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}
