//! Provider-agnostic contract for source-control hosting backends.
//!
//! This module defines the full operation set a dependency-update run issues
//! against its hosting provider: repo discovery, issues, pull requests, branch
//! statuses, comments, file reads, reviewer/assignee management and
//! vulnerability alerts.
//!
//! - [`local`]: backend over a local directory tree of git working copies
//! - [`types`]: session, entity and request/response types shared by backends
//!
//! The backend is selected once at process startup via [`create`]; every
//! operation behaves identically in externally observable contract regardless
//! of which backend is behind the trait object.

pub mod local;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PlatformError;
use crate::error::Result;
use crate::platform::types::BranchStatus;
use crate::platform::types::BranchStatusConfig;
use crate::platform::types::CreatePrConfig;
use crate::platform::types::EnsureCommentConfig;
use crate::platform::types::EnsureCommentRemovalConfig;
use crate::platform::types::EnsureIssueConfig;
use crate::platform::types::EnsureIssueResult;
use crate::platform::types::FindPrConfig;
use crate::platform::types::Issue;
use crate::platform::types::MergePrConfig;
use crate::platform::types::PlatformParams;
use crate::platform::types::PlatformResult;
use crate::platform::types::Pr;
use crate::platform::types::RepoParams;
use crate::platform::types::RepoResult;
use crate::platform::types::Session;
use crate::platform::types::UpdatePrConfig;
use crate::platform::types::VulnerabilityAlert;

// -----------------------------------------------------------------------------
// Platform trait

/// The operation surface every hosting backend implements.
///
/// All I/O-bound operations are async. Callers are expected to await each
/// operation before issuing the next one against the same [`Session`]; there
/// is no internal locking. Mutating operations must be idempotent or
/// upsert-safe under retry, since network backends may retry on transient
/// failure.
#[async_trait(?Send)]
pub trait Platform {
    /// Configure the platform process-wide. A second call reinitializes.
    ///
    /// Fails with [`PlatformError::Config`] when required connection
    /// parameters are absent for the backend.
    async fn init_platform(&mut self, params: PlatformParams) -> Result<PlatformResult>;

    /// Establish a fresh [`Session`] for one repository, determining its
    /// default branch.
    ///
    /// Fails with [`PlatformError::RepoNotFound`] when the repository cannot
    /// be located or inspected.
    async fn init_repo(&self, params: RepoParams) -> Result<(Session, RepoResult)>;

    /// Discover all repositories reachable under the configured root,
    /// returning identifiers relative to it. Deterministic for a fixed state
    /// of the underlying store.
    async fn get_repos(&self) -> Result<Vec<String>>;

    // -- Issues ---------------------------------------------------------------

    async fn get_issue_list(&self, session: &Session) -> Result<Vec<Issue>>;

    /// Find an issue by exact title match.
    async fn find_issue(&self, session: &Session, title: &str) -> Result<Option<Issue>>;

    /// Upsert an issue, matching on title or the `reuse_title` alias.
    /// Returns `None` when creation was suppressed by policy.
    async fn ensure_issue(
        &self,
        session: &Session,
        config: EnsureIssueConfig,
    ) -> Result<Option<EnsureIssueResult>>;

    /// Close the issue with the given title. No-op when absent.
    async fn ensure_issue_closing(&self, session: &Session, title: &str) -> Result<()>;

    // -- Pull requests --------------------------------------------------------

    async fn get_pr_list(&self, session: &Session) -> Result<Vec<Pr>>;

    /// Match by branch name and, when given, title, filtered by state.
    async fn find_pr(&self, session: &Session, config: FindPrConfig) -> Result<Option<Pr>>;

    async fn get_pr(&self, session: &Session, number: u64) -> Result<Option<Pr>>;

    /// The open PR whose source is `branch_name`, if any.
    async fn get_branch_pr(&self, session: &Session, branch_name: &str) -> Result<Option<Pr>>;

    /// Create a pull request. Backends must not create a duplicate for an
    /// existing open PR from the same source branch.
    async fn create_pr(&self, session: &Session, config: CreatePrConfig) -> Result<Pr>;

    async fn update_pr(&self, session: &Session, config: UpdatePrConfig) -> Result<()>;

    /// Merge a pull request. A merge blocked by provider policy (e.g. failing
    /// checks) is a normal `false` result, not an error; only connectivity
    /// failures raise.
    async fn merge_pr(&self, session: &Session, config: MergePrConfig) -> Result<bool>;

    // -- Branch status --------------------------------------------------------

    /// Aggregate status across all contexts for a branch, worst-of.
    async fn get_branch_status(&self, session: &Session, branch_name: &str)
    -> Result<BranchStatus>;

    /// Status of one named check, `None` when no check with that context
    /// exists.
    async fn get_branch_status_check(
        &self,
        session: &Session,
        branch_name: &str,
        context: &str,
    ) -> Result<Option<BranchStatus>>;

    /// Upsert one named check's status.
    async fn set_branch_status(&self, session: &Session, config: BranchStatusConfig)
    -> Result<()>;

    // -- Comments -------------------------------------------------------------

    /// Upsert a comment, keyed by topic when present, else by exact content.
    /// Returns whether a comment now exists in the desired state.
    async fn ensure_comment(&self, session: &Session, config: EnsureCommentConfig)
    -> Result<bool>;

    /// Delete a comment by topic or content key. No-op when absent.
    async fn ensure_comment_removal(
        &self,
        session: &Session,
        config: EnsureCommentRemovalConfig,
    ) -> Result<()>;

    // -- People ---------------------------------------------------------------

    async fn add_assignees(&self, session: &Session, number: u64, assignees: &[String])
    -> Result<()>;

    async fn add_reviewers(&self, session: &Session, number: u64, reviewers: &[String])
    -> Result<()>;

    async fn delete_label(&self, session: &Session, number: u64, label: &str) -> Result<()>;

    /// Subset of `users` currently assignable on this backend.
    async fn filter_unavailable_users(&self, users: &[String]) -> Result<Vec<String>>;

    // -- Files ----------------------------------------------------------------

    /// Read a file as UTF-8 text. `repo` defaults to the session's repository.
    async fn get_raw_file(
        &self,
        session: &Session,
        file_name: &str,
        repo: Option<&str>,
    ) -> Result<String>;

    /// Read and parse a file. A `.json5` suffix selects the lenient JSON5
    /// grammar, everything else is strict JSON.
    async fn get_json_file(
        &self,
        session: &Session,
        file_name: &str,
        repo: Option<&str>,
    ) -> Result<Value>;

    // -- Misc -----------------------------------------------------------------

    /// Adjust Markdown to the backend's dialect.
    fn massage_markdown(&self, input: &str) -> String;

    /// Whether the provider mandates rebase-before-merge.
    async fn get_repo_force_rebase(&self, session: &Session) -> Result<bool>;

    async fn get_vulnerability_alerts(&self, session: &Session)
    -> Result<Vec<VulnerabilityAlert>>;
}

// -----------------------------------------------------------------------------
// Backend selection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Directory tree of local git working copies.
    Local,
}

impl std::str::FromStr for PlatformKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(PlatformKind::Local),
            other => Err(PlatformError::Config(format!("unknown platform: {other}"))),
        }
    }
}

/// Instantiate the backend selected at process startup.
pub fn create(kind: PlatformKind) -> Box<dyn Platform> {
    match kind {
        PlatformKind::Local => Box::new(local::LocalPlatform::new()),
    }
}
