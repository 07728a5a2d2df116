use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for employees; the join key between uploads, logins, and boards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One validated row of the uploaded performance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub region: String,
    pub branch_unit: String,
    pub employee_id: EmployeeId,
    pub name: String,
    pub score: u64,
    pub tenure_months: u32,
}

impl EmployeeRecord {
    pub fn is_rookie(&self, rookie_threshold: u32) -> bool {
        self.tenure_months <= rookie_threshold
    }
}

/// The three leaderboards shown to every viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Branch,
    Region,
    Rookie,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Branch, Scope::Region, Scope::Rookie];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Branch => "Branch",
            Self::Region => "Region",
            Self::Rookie => "Rookie",
        }
    }
}

/// Record columns that can act as a grouping label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingField {
    Region,
    BranchUnit,
}

impl GroupingField {
    pub fn value(self, record: &EmployeeRecord) -> &str {
        match self {
            Self::Region => &record.region,
            Self::BranchUnit => &record.branch_unit,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Region => Self::BranchUnit,
            Self::BranchUnit => Self::Region,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::BranchUnit => "branch_unit",
        }
    }
}

impl FromStr for GroupingField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "region" => Ok(Self::Region),
            "branch" | "branch_unit" | "branch-unit" => Ok(Self::BranchUnit),
            other => Err(format!(
                "unknown grouping field '{other}' (expected 'region' or 'branch_unit')"
            )),
        }
    }
}

/// Which column drives the fine-grained (branch) and coarse (region) scopes.
///
/// Uploaded sheets have swapped the meaning of the two labels before, so the
/// mapping is configuration rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingMap {
    pub fine: GroupingField,
    pub coarse: GroupingField,
}

impl GroupingMap {
    pub const fn with_branch_field(fine: GroupingField) -> Self {
        Self {
            fine,
            coarse: fine.other(),
        }
    }

    pub const fn field_for(self, scope: Scope) -> GroupingField {
        match scope {
            Scope::Region => self.coarse,
            Scope::Branch | Scope::Rookie => self.fine,
        }
    }
}

impl Default for GroupingMap {
    fn default() -> Self {
        Self::with_branch_field(GroupingField::BranchUnit)
    }
}
