use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{GroupingField, Scope};
use super::lookup::EmployeeStanding;
use super::palette::palette_index;
use super::ranking::{RankedEntry, RankingData};

/// Public summary of the currently loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub exists: bool,
    pub generation: u64,
    pub records: usize,
    pub branches: usize,
    pub regions: usize,
    pub rookies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntryView {
    #[serde(flatten)]
    pub entry: RankedEntry,
    pub palette_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeBoardView {
    pub scope: Scope,
    pub scope_label: &'static str,
    /// False when the display should show a "not enough data" placeholder.
    pub podium_ready: bool,
    /// Everyone in the scope, including rows cut by the window.
    pub participants: usize,
    pub entries: Vec<BoardEntryView>,
}

impl ScopeBoardView {
    fn build(
        data: &RankingData,
        scope: Scope,
        color_field: GroupingField,
        palette_size: usize,
    ) -> Self {
        Self {
            scope,
            scope_label: scope.label(),
            podium_ready: data.podium_ready(scope),
            participants: data.participants.get(scope),
            entries: data
                .scope(scope)
                .iter()
                .map(|entry| BoardEntryView {
                    entry: entry.clone(),
                    palette_index: palette_index(group_label(entry, color_field), palette_size),
                })
                .collect(),
        }
    }
}

fn group_label(entry: &RankedEntry, field: GroupingField) -> &str {
    match field {
        GroupingField::Region => &entry.region,
        GroupingField::BranchUnit => &entry.branch_unit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingsView {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_id: Option<String>,
    pub viewer_found: bool,
    pub branch: ScopeBoardView,
    pub region: ScopeBoardView,
    pub rookie: ScopeBoardView,
}

impl RankingsView {
    pub(crate) fn build(
        generation: u64,
        viewer_id: Option<String>,
        viewer_found: bool,
        data: &RankingData,
        color_field: GroupingField,
        palette_size: usize,
    ) -> Self {
        Self {
            generation,
            viewer_id,
            viewer_found,
            branch: ScopeBoardView::build(data, Scope::Branch, color_field, palette_size),
            region: ScopeBoardView::build(data, Scope::Region, color_field, palette_size),
            rookie: ScopeBoardView::build(data, Scope::Rookie, color_field, palette_size),
        }
    }

    pub fn board(&self, scope: Scope) -> &ScopeBoardView {
        match scope {
            Scope::Branch => &self.branch,
            Scope::Region => &self.region,
            Scope::Rookie => &self.rookie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingView {
    pub generation: u64,
    #[serde(flatten)]
    pub standing: EmployeeStanding,
}
