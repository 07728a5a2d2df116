use clap::Args;
use leaderboard::config::AppConfig;
use leaderboard::error::AppError;
use leaderboard::leaderboard::{
    DatasetImporter, InMemoryDatasetRepository, LeaderboardService, RankingsView, Scope,
    ScopeBoardView, StandingView,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankingsArgs {
    /// CSV, XLSX, or XLS performance sheet
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Employee id whose branch, region, and rookie boards should be shown
    #[arg(long)]
    pub(crate) viewer: Option<String>,
    /// Emit the rankings as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// CSV, XLSX, or XLS performance sheet
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Employee id to look up
    #[arg(long)]
    pub(crate) employee: String,
}

pub(crate) fn run_rankings_report(args: RankingsArgs) -> Result<(), AppError> {
    let RankingsArgs {
        dataset,
        viewer,
        json,
    } = args;

    let service = load_service(&dataset)?;
    let view = service.rankings(viewer.as_deref())?;

    if json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &view).map_err(std::io::Error::from)?;
        writeln!(stdout)?;
        return Ok(());
    }

    print!("{}", render_rankings(&view));
    Ok(())
}

pub(crate) fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let service = load_service(&args.dataset)?;
    let view = service.standing(&args.employee)?;
    println!("{}", render_standing(&view));
    Ok(())
}

fn load_service(
    dataset: &Path,
) -> Result<LeaderboardService<InMemoryDatasetRepository>, AppError> {
    let policy = AppConfig::load()?.ranking;
    let records = DatasetImporter::from_path(dataset)?;
    let service = LeaderboardService::new(Arc::new(InMemoryDatasetRepository::default()), policy);
    service.upload(records, dataset.display().to_string())?;
    Ok(service)
}

pub(crate) fn render_rankings(view: &RankingsView) -> String {
    let mut out = String::new();
    match (&view.viewer_id, view.viewer_found) {
        (Some(viewer), true) => out.push_str(&format!("Leaderboards for employee {viewer}\n")),
        (Some(viewer), false) => out.push_str(&format!(
            "Employee {viewer} is not in this dataset; showing overall boards\n"
        )),
        (None, _) => out.push_str("Overall leaderboards\n"),
    }

    for scope in Scope::ALL {
        render_board(&mut out, view.board(scope));
    }
    out
}

fn render_board(out: &mut String, board: &ScopeBoardView) {
    out.push_str(&format!(
        "\n{} board ({} participants)\n",
        board.scope_label, board.participants
    ));
    if !board.podium_ready {
        out.push_str("  not enough entries to rank yet\n");
    }
    for row in &board.entries {
        let entry = &row.entry;
        let marker = if entry.is_viewer { "  <- you" } else { "" };
        out.push_str(&format!(
            "  {:>3}. {:<10} {:<12} {:<12} {:>12}  {:>3} mo{}\n",
            entry.rank,
            entry.employee_id.as_str(),
            entry.name,
            entry.branch_unit,
            group_thousands(entry.score),
            entry.tenure_months,
            marker
        ));
    }
}

pub(crate) fn render_standing(view: &StandingView) -> String {
    let standing = &view.standing;
    format!(
        "{} {} ({} / {}): rank {} of {} with {} points, {} months tenure",
        standing.employee_id,
        standing.name,
        standing.region,
        standing.branch_unit,
        standing.rank,
        standing.total_participants,
        group_thousands(standing.score),
        standing.tenure_months
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard::leaderboard::{EmployeeId, EmployeeRecord, RankingPolicy};

    fn record(branch: &str, id: &str, score: u64, tenure: u32) -> EmployeeRecord {
        EmployeeRecord {
            region: "Seoul".to_string(),
            branch_unit: branch.to_string(),
            employee_id: EmployeeId(id.to_string()),
            name: format!("Agent {id}"),
            score,
            tenure_months: tenure,
        }
    }

    fn service() -> LeaderboardService<InMemoryDatasetRepository> {
        let service = LeaderboardService::new(
            Arc::new(InMemoryDatasetRepository::default()),
            RankingPolicy::default(),
        );
        service
            .upload(
                vec![
                    record("Jeongdong", "1001", 2_005_073, 216),
                    record("Jeongdong", "1002", 1_005_203, 9),
                    record("Royal", "2001", 1_099_028, 7),
                ],
                "fixture",
            )
            .expect("upload succeeds");
        service
    }

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(2_005_073), "2,005,073");
    }

    #[test]
    fn rankings_text_marks_viewer_and_thin_boards() {
        let view = service().rankings(Some("1002")).expect("rankings");
        let text = render_rankings(&view);

        assert!(text.starts_with("Leaderboards for employee 1002"));
        assert!(text.contains("<- you"));
        assert!(text.contains("Branch board (2 participants)"));
        assert!(text.contains("2,005,073"));
        assert!(text.contains("not enough entries to rank yet"));
    }

    #[test]
    fn unknown_viewer_falls_back_to_overall_boards() {
        let view = service().rankings(Some("9999")).expect("rankings");
        let text = render_rankings(&view);
        assert!(text.starts_with("Employee 9999 is not in this dataset"));
        assert!(!text.contains("<- you"));
    }

    #[test]
    fn standing_line_reports_global_rank() {
        let view = service().standing("2001").expect("standing");
        assert_eq!(
            render_standing(&view),
            "2001 Agent 2001 (Seoul / Royal): rank 2 of 3 with 1,099,028 points, 7 months tenure"
        );
    }
}
