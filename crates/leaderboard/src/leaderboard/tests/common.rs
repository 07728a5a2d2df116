use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::leaderboard::domain::{EmployeeId, EmployeeRecord};
use crate::leaderboard::ranking::RankingPolicy;
use crate::leaderboard::repository::{
    DatasetRepository, DatasetSnapshot, InMemoryDatasetRepository, RepositoryError,
};
use crate::leaderboard::{leaderboard_router, LeaderboardService};

pub(super) fn employee(
    id: &str,
    region: &str,
    branch: &str,
    score: u64,
    tenure_months: u32,
) -> EmployeeRecord {
    EmployeeRecord {
        region: region.to_string(),
        branch_unit: branch.to_string(),
        employee_id: EmployeeId(id.to_string()),
        name: format!("Employee {id}"),
        score,
        tenure_months,
    }
}

/// Two regions, three branches, a handful of rookies.
pub(super) fn sample_records() -> Vec<EmployeeRecord> {
    vec![
        employee("1001", "Seoul", "Jeongdong", 2_005_073, 216),
        employee("1002", "Seoul", "Jeongdong", 1_583_626, 158),
        employee("1003", "Seoul", "Jeongdong", 1_005_203, 9),
        employee("1004", "Seoul", "Jeongdong", 19_510, 147),
        employee("2001", "Seoul", "Royal", 1_993_939, 275),
        employee("2002", "Seoul", "Royal", 1_099_028, 7),
        employee("3001", "Gyeonggi", "Bulgwang", 2_405_251, 335),
        employee("3002", "Gyeonggi", "Bulgwang", 706_554, 3),
    ]
}

pub(super) fn build_service() -> (
    LeaderboardService<InMemoryDatasetRepository>,
    Arc<InMemoryDatasetRepository>,
) {
    let repository = Arc::new(InMemoryDatasetRepository::new());
    let service = LeaderboardService::new(repository.clone(), RankingPolicy::default());
    (service, repository)
}

pub(super) fn loaded_service() -> LeaderboardService<InMemoryDatasetRepository> {
    let (service, _) = build_service();
    service
        .upload(sample_records(), "sample.csv")
        .expect("upload succeeds");
    service
}

pub(super) struct UnavailableRepository;

impl DatasetRepository for UnavailableRepository {
    fn replace(
        &self,
        _records: Vec<EmployeeRecord>,
        _source: String,
    ) -> Result<DatasetSnapshot, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn snapshot(&self) -> Result<DatasetSnapshot, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn router_with_service(
    service: LeaderboardService<InMemoryDatasetRepository>,
) -> axum::Router {
    leaderboard_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
