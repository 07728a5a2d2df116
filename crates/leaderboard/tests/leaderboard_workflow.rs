use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use leaderboard::leaderboard::{
    compute_rankings, leaderboard_router, lookup_employee, DatasetFormat, DatasetImporter,
    EmployeeRecord, InMemoryDatasetRepository, LeaderboardService, LeaderboardServiceError,
    RankingPolicy, Scope,
};
use serde_json::Value;
use tower::ServiceExt;

fn sample_board() -> Vec<EmployeeRecord> {
    let data = include_bytes!("../sample_board.csv");
    DatasetImporter::from_reader(DatasetFormat::Csv, &data[..])
        .expect("sample board imports")
}

#[test]
fn sample_board_imports_every_row() {
    let records = sample_board();
    assert_eq!(records.len(), 42);
    assert_eq!(records[0].employee_id.as_str(), "1001");
    assert_eq!(records[0].region, "서울");
    assert_eq!(records[0].branch_unit, "정동");
    assert_eq!(records[0].score, 1_658_253);
    assert_eq!(records[0].tenure_months, 7);
}

#[test]
fn viewer_outside_the_window_is_appended_with_true_rank() {
    let records = sample_board();
    let data = compute_rankings(&records, Some("1008"), &RankingPolicy::default());

    assert_eq!(data.branch.len(), 16);
    assert_eq!(data.branch[0].employee_id.as_str(), "1018");
    let last = data.branch.last().expect("viewer row");
    assert_eq!(last.employee_id.as_str(), "1008");
    assert_eq!(last.rank, 20);
    assert!(last.is_viewer);
    assert!(data.branch[..15].iter().all(|entry| !entry.is_viewer));

    assert_eq!(data.region.len(), 16);
    assert!(data.region.iter().all(|entry| entry.branch_unit != "로얄"));
    assert_eq!(data.region.last().map(|entry| entry.rank), Some(26));

    let rookie_ids: Vec<&str> = data
        .rookie
        .iter()
        .map(|entry| entry.employee_id.as_str())
        .collect();
    assert_eq!(
        rookie_ids,
        ["1018", "1016", "1001", "1017", "1012", "1011", "1009", "1019", "1005", "1008"]
    );
    assert_eq!(data.viewer_entry(Scope::Rookie).map(|entry| entry.rank), Some(10));
}

#[test]
fn global_lookup_differs_from_local_rank() {
    let records = sample_board();

    let standing = lookup_employee(&records, "1018").expect("employee present");
    assert_eq!(standing.rank, 2);
    assert_eq!(standing.total_participants, 42);

    let data = compute_rankings(&records, Some("1018"), &RankingPolicy::default());
    assert_eq!(data.viewer_entry(Scope::Branch).map(|entry| entry.rank), Some(1));

    assert_eq!(lookup_employee(&records, "1008").map(|s| s.rank), Some(41));
    assert!(lookup_employee(&records, "0000").is_none());
}

#[test]
fn service_login_requires_uploaded_dataset() {
    let service = LeaderboardService::new(
        Arc::new(InMemoryDatasetRepository::default()),
        RankingPolicy::default(),
    );
    assert!(matches!(
        service.login("1008"),
        Err(LeaderboardServiceError::NoDataset)
    ));

    let summary = service
        .upload(sample_board(), "sample_board.csv")
        .expect("upload succeeds");
    assert_eq!(summary.records, 42);
    assert_eq!(summary.branches, 4);
    assert_eq!(summary.regions, 2);
    assert_eq!(summary.rookies, 17);

    let view = service.login(" 1008 ").expect("known employee logs in");
    assert_eq!(view.standing.rank, 41);
    assert!(matches!(
        service.login("9999"),
        Err(LeaderboardServiceError::UnknownEmployee(_))
    ));
}

#[tokio::test]
async fn router_reports_empty_rookie_board_without_podium() {
    let service = Arc::new(LeaderboardService::new(
        Arc::new(InMemoryDatasetRepository::default()),
        RankingPolicy::default(),
    ));
    service
        .upload(sample_board(), "sample_board.csv")
        .expect("upload succeeds");

    let response = leaderboard_router(service)
        .oneshot(
            Request::builder()
                .uri("/api/v1/rankings?viewer=2102")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("rankings handled");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let view: Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(view["viewer_found"], true);
    let branch = view["branch"]["entries"].as_array().expect("branch entries");
    let ids: Vec<&str> = branch
        .iter()
        .filter_map(|entry| entry["employee_id"].as_str())
        .collect();
    assert_eq!(ids, ["2104", "2103", "2101", "2102"]);
    assert_eq!(view["branch"]["podium_ready"], true);
    assert_eq!(view["rookie"]["entries"].as_array().map(Vec::len), Some(0));
    assert_eq!(view["rookie"]["podium_ready"], false);
}
