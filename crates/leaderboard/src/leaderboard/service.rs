use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::EmployeeRecord;
use super::lookup::lookup_employee;
use super::palette::DEFAULT_PALETTE_SIZE;
use super::ranking::{compute_rankings, find_first, RankingPolicy};
use super::repository::{DatasetRepository, DatasetSnapshot, RepositoryError};
use super::views::{DatasetSummary, RankingsView, StandingView};

/// Service composing the dataset repository with the ranking and lookup functions.
pub struct LeaderboardService<R> {
    repository: Arc<R>,
    policy: RankingPolicy,
    palette_size: usize,
}

impl<R> LeaderboardService<R>
where
    R: DatasetRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: RankingPolicy) -> Self {
        Self {
            repository,
            policy,
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// Replace the shared dataset wholesale.
    pub fn upload(
        &self,
        records: Vec<EmployeeRecord>,
        source: impl Into<String>,
    ) -> Result<DatasetSummary, LeaderboardServiceError> {
        let snapshot = self.repository.replace(records, source.into())?;
        info!(
            generation = snapshot.generation,
            records = snapshot.records.len(),
            source = snapshot.source.as_deref().unwrap_or_default(),
            "dataset replaced"
        );
        Ok(self.summarize(&snapshot))
    }

    pub fn dataset(&self) -> Result<DatasetSummary, LeaderboardServiceError> {
        let snapshot = self.repository.snapshot()?;
        Ok(self.summarize(&snapshot))
    }

    /// Scoped boards for an optional viewer. Unknown viewers get the anonymous boards.
    pub fn rankings(&self, viewer_id: Option<&str>) -> Result<RankingsView, LeaderboardServiceError> {
        let snapshot = self.repository.snapshot()?;
        let viewer_id = viewer_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let viewer_found = viewer_id
            .as_deref()
            .is_some_and(|id| find_first(&snapshot.records, id).is_some());

        let data = compute_rankings(&snapshot.records, viewer_id.as_deref(), &self.policy);
        debug!(
            generation = snapshot.generation,
            viewer_found,
            branch = data.branch.len(),
            region = data.region.len(),
            rookie = data.rookie.len(),
            "computed rankings"
        );

        Ok(RankingsView::build(
            snapshot.generation,
            viewer_id,
            viewer_found,
            &data,
            self.policy.grouping.fine,
            self.palette_size,
        ))
    }

    /// Validate a login: the id must exist in a non-empty dataset.
    pub fn login(&self, employee_id: &str) -> Result<StandingView, LeaderboardServiceError> {
        let snapshot = self.repository.snapshot()?;
        if snapshot.is_empty() {
            return Err(LeaderboardServiceError::NoDataset);
        }
        let result = Self::standing_in(&snapshot, employee_id);
        match &result {
            Ok(view) => info!(
                employee_id = %view.standing.employee_id,
                rank = view.standing.rank,
                "login accepted"
            ),
            Err(_) => info!(employee_id = employee_id.trim(), "login rejected"),
        }
        result
    }

    pub fn standing(&self, employee_id: &str) -> Result<StandingView, LeaderboardServiceError> {
        let snapshot = self.repository.snapshot()?;
        Self::standing_in(&snapshot, employee_id)
    }

    fn standing_in(
        snapshot: &DatasetSnapshot,
        employee_id: &str,
    ) -> Result<StandingView, LeaderboardServiceError> {
        let employee_id = employee_id.trim();
        let standing = lookup_employee(&snapshot.records, employee_id)
            .ok_or_else(|| LeaderboardServiceError::UnknownEmployee(employee_id.to_string()))?;
        Ok(StandingView {
            generation: snapshot.generation,
            standing,
        })
    }

    fn summarize(&self, snapshot: &DatasetSnapshot) -> DatasetSummary {
        let branch_field = self.policy.grouping.fine;
        let region_field = self.policy.grouping.coarse;
        let records = snapshot.records.as_slice();

        let branches: HashSet<&str> = records.iter().map(|r| branch_field.value(r)).collect();
        let regions: HashSet<&str> = records.iter().map(|r| region_field.value(r)).collect();
        let rookies = records
            .iter()
            .filter(|record| record.is_rookie(self.policy.rookie_threshold))
            .count();

        DatasetSummary {
            exists: !snapshot.is_empty(),
            generation: snapshot.generation,
            records: records.len(),
            branches: branches.len(),
            regions: regions.len(),
            rookies,
            uploaded_at: snapshot.uploaded_at,
            source: snapshot.source.clone(),
        }
    }
}

/// Error raised by the leaderboard service.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardServiceError {
    #[error("no leaderboard data has been uploaded yet")]
    NoDataset,
    #[error("employee id '{0}' is not registered in the current dataset")]
    UnknownEmployee(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
