//! Branch, region, and rookie leaderboards over one shared, replaceable dataset.
//!
//! [`compute_rankings`] and [`lookup_employee`] are pure functions of a record
//! slice; [`LeaderboardService`] pairs them with a [`DatasetRepository`] snapshot
//! so every answer is computed from a single upload.

pub mod domain;
pub mod import;
pub mod lookup;
pub mod palette;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{EmployeeId, EmployeeRecord, GroupingField, GroupingMap, Scope};
pub use import::{DatasetFormat, DatasetImporter, ImportError};
pub use lookup::{lookup_employee, EmployeeStanding};
pub use palette::{palette_index, DEFAULT_PALETTE_SIZE};
pub use ranking::{
    compute_rankings, ParticipantCounts, RankedEntry, RankingData, RankingPolicy,
    DEFAULT_ROOKIE_THRESHOLD, DEFAULT_WINDOW_SIZE,
};
pub use repository::{
    DatasetRepository, DatasetSnapshot, InMemoryDatasetRepository, RepositoryError,
};
pub use router::leaderboard_router;
pub use service::{LeaderboardService, LeaderboardServiceError};
pub use views::{BoardEntryView, DatasetSummary, RankingsView, ScopeBoardView, StandingView};
