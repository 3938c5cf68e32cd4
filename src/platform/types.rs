use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

// -----------------------------------------------------------------------------
// Session

/// Per-repository context established by [`init_repo`].
///
/// Owned by the caller and passed by reference into every repo-scoped
/// operation; replaced wholesale on each `init_repo` call, no field survives
/// from a prior repository.
///
/// [`init_repo`]: crate::platform::Platform::init_repo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub repository: String,
    pub default_branch: String,
    pub endpoint: String,
}

// -----------------------------------------------------------------------------
// Init parameters and results

/// Process-wide connection parameters for [`init_platform`].
///
/// [`init_platform`]: crate::platform::Platform::init_platform
#[derive(Debug, Clone, Default)]
pub struct PlatformParams {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub git_author: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlatformResult {
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct RepoParams {
    pub repository: String,
    /// Falls back to the endpoint configured at `init_platform` time.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RepoResult {
    pub default_branch: String,
    pub is_fork: bool,
}

// -----------------------------------------------------------------------------
// Pull requests

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    Merged,
    /// Matches every other state when used as a search filter.
    #[default]
    All,
}

impl PrState {
    /// Whether a PR in `state` passes this filter.
    pub fn matches(self, state: PrState) -> bool {
        self == PrState::All || self == state
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pr {
    pub number: u64,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub body: String,
    pub state: PrState,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FindPrConfig {
    pub branch_name: String,
    pub pr_title: Option<String>,
    pub state: PrState,
}

#[derive(Debug, Clone)]
pub struct CreatePrConfig {
    pub source_branch: String,
    pub target_branch: String,
    pub pr_title: String,
    pub pr_body: String,
    pub draft_pr: bool,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePrConfig {
    pub number: u64,
    pub pr_title: String,
    pub pr_body: Option<String>,
    pub state: Option<PrState>,
}

#[derive(Debug, Clone)]
pub struct MergePrConfig {
    pub id: u64,
}

// -----------------------------------------------------------------------------
// Issues

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct EnsureIssueConfig {
    pub title: String,
    /// Previous title to match when an issue has been renamed.
    pub reuse_title: Option<String>,
    pub body: String,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureIssueResult {
    Created,
    Updated,
}

// -----------------------------------------------------------------------------
// Branch status

/// Aggregate health of a branch check.
///
/// Declaration order carries severity: worst-of aggregation is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    Green,
    Yellow,
    Red,
}

impl BranchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchStatus::Green => "green",
            BranchStatus::Yellow => "yellow",
            BranchStatus::Red => "red",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BranchStatusConfig {
    pub branch_name: String,
    pub context: String,
    pub description: String,
    pub state: BranchStatus,
    pub url: Option<String>,
}

// -----------------------------------------------------------------------------
// Comments

#[derive(Debug, Clone)]
pub struct EnsureCommentConfig {
    pub number: u64,
    /// Upsert key; falls back to exact `content` match when absent.
    pub topic: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct EnsureCommentRemovalConfig {
    pub number: u64,
    pub topic: Option<String>,
    pub content: Option<String>,
}

// -----------------------------------------------------------------------------
// Vulnerability alerts

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityAlert {
    pub dependency_name: String,
    pub vulnerable_versions: Option<String>,
    pub fixed_version: Option<String>,
}
