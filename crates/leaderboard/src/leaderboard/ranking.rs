use serde::{Deserialize, Serialize};

use super::domain::{EmployeeId, EmployeeRecord, GroupingMap, Scope};

/// Employees at or below this many months of tenure count as rookies.
pub const DEFAULT_ROOKIE_THRESHOLD: u32 = 12;

/// Number of leading entries kept on each board before the viewer row is appended.
pub const DEFAULT_WINDOW_SIZE: usize = 15;

/// Tunables shared by every ranking computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub rookie_threshold: u32,
    pub window_size: usize,
    pub grouping: GroupingMap,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            rookie_threshold: DEFAULT_ROOKIE_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
            grouping: GroupingMap::default(),
        }
    }
}

/// A row on one scoped board. `rank` is local to the scope, not the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub region: String,
    pub branch_unit: String,
    pub employee_id: EmployeeId,
    pub name: String,
    pub score: u64,
    pub tenure_months: u32,
    pub is_viewer: bool,
}

impl RankedEntry {
    fn new(rank: usize, record: &EmployeeRecord, viewer: Option<&EmployeeRecord>) -> Self {
        Self {
            rank,
            region: record.region.clone(),
            branch_unit: record.branch_unit.clone(),
            employee_id: record.employee_id.clone(),
            name: record.name.clone(),
            score: record.score,
            tenure_months: record.tenure_months,
            is_viewer: viewer.is_some_and(|viewer| std::ptr::eq(viewer, record)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankingData {
    pub branch: Vec<RankedEntry>,
    pub region: Vec<RankedEntry>,
    pub rookie: Vec<RankedEntry>,
    /// Scope sizes before windowing.
    pub participants: ParticipantCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantCounts {
    pub branch: usize,
    pub region: usize,
    pub rookie: usize,
}

impl ParticipantCounts {
    pub fn get(&self, scope: Scope) -> usize {
        match scope {
            Scope::Branch => self.branch,
            Scope::Region => self.region,
            Scope::Rookie => self.rookie,
        }
    }
}

impl RankingData {
    pub fn scope(&self, scope: Scope) -> &[RankedEntry] {
        match scope {
            Scope::Branch => &self.branch,
            Scope::Region => &self.region,
            Scope::Rookie => &self.rookie,
        }
    }

    /// Boards with fewer than three rows cannot fill a podium.
    pub fn podium_ready(&self, scope: Scope) -> bool {
        self.scope(scope).len() >= 3
    }

    pub fn viewer_entry(&self, scope: Scope) -> Option<&RankedEntry> {
        self.scope(scope).iter().find(|entry| entry.is_viewer)
    }
}

/// Build the branch, region, and rookie boards for an optional viewer.
///
/// A viewer id that is blank or absent from `records` personalizes nothing: every
/// scope falls back to the whole dataset (rookies still filtered by tenure).
pub fn compute_rankings(
    records: &[EmployeeRecord],
    viewer_id: Option<&str>,
    policy: &RankingPolicy,
) -> RankingData {
    let viewer_id = viewer_id.map(str::trim).filter(|id| !id.is_empty());
    let viewer = viewer_id.and_then(|id| find_first(records, id));

    let in_scope = |scope: Scope, record: &EmployeeRecord| match viewer {
        Some(viewer) => {
            let field = policy.grouping.field_for(scope);
            field.value(record) == field.value(viewer)
        }
        None => true,
    };

    let (branch, branch_total) = rank_scope(
        records.iter().filter(|&record| in_scope(Scope::Branch, record)),
        viewer,
        policy.window_size,
    );
    let (region, region_total) = rank_scope(
        records.iter().filter(|&record| in_scope(Scope::Region, record)),
        viewer,
        policy.window_size,
    );
    let (rookie, rookie_total) = rank_scope(
        records.iter().filter(|&record| {
            record.is_rookie(policy.rookie_threshold) && in_scope(Scope::Rookie, record)
        }),
        viewer,
        policy.window_size,
    );

    RankingData {
        branch,
        region,
        rookie,
        participants: ParticipantCounts {
            branch: branch_total,
            region: region_total,
            rookie: rookie_total,
        },
    }
}

pub(crate) fn find_first<'a>(
    records: &'a [EmployeeRecord],
    employee_id: &str,
) -> Option<&'a EmployeeRecord> {
    records
        .iter()
        .find(|record| record.employee_id.as_str() == employee_id)
}

/// Stable sort by score, highest first. Ties keep upload order.
pub(crate) fn sort_by_score<'a, I>(members: I) -> Vec<&'a EmployeeRecord>
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let mut sorted: Vec<&EmployeeRecord> = members.into_iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted
}

/// The windowed board plus the size of the whole scope.
///
/// The viewer is matched by identity so a duplicated id marks only the resolved record.
fn rank_scope<'a, I>(
    members: I,
    viewer: Option<&EmployeeRecord>,
    window_size: usize,
) -> (Vec<RankedEntry>, usize)
where
    I: IntoIterator<Item = &'a EmployeeRecord>,
{
    let sorted = sort_by_score(members);

    let mut board: Vec<RankedEntry> = sorted
        .iter()
        .take(window_size)
        .enumerate()
        .map(|(index, record)| RankedEntry::new(index + 1, record, viewer))
        .collect();

    let viewer_position = viewer.and_then(|viewer| {
        sorted
            .iter()
            .position(|record| std::ptr::eq(*record, viewer))
    });
    if let Some(position) = viewer_position {
        if position >= window_size {
            board.push(RankedEntry::new(position + 1, sorted[position], viewer));
        }
    }

    (board, sorted.len())
}
