use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::error::PlatformError;
use crate::error::Result;
use crate::git::GitOps;
use crate::git::ShellGit;
use crate::git::WorktreeConfig;
use crate::platform::Platform;
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
use crate::platform::types::PrState;
use crate::platform::types::RepoParams;
use crate::platform::types::RepoResult;
use crate::platform::types::Session;
use crate::platform::types::UpdatePrConfig;
use crate::platform::types::VulnerabilityAlert;

// -----------------------------------------------------------------------------
// Types

/// Backend over a local directory tree of git repositories.
///
/// Repositories live at `<endpoint>/<repository>/`, each a working copy with
/// a `.git` metadata directory. Issues, pull requests and comments are not
/// persisted: ensure/create operations log and succeed, lookups come back
/// empty. That divergence from persisting backends is a stub limitation and
/// must not be relied upon by tests of real backends; in particular the
/// duplicate-PR check of `create_pr` cannot be enforced here. Branch statuses
/// set during the process are tracked so worst-of aggregation works.
pub struct LocalPlatform {
    endpoint: String,
    git: Box<dyn GitOps>,
    statuses: Mutex<HashMap<String, HashMap<String, BranchStatus>>>,
    next_pr_number: AtomicU64,
}

// -----------------------------------------------------------------------------
// LocalPlatform impl

impl LocalPlatform {
    pub fn new() -> Self {
        Self::with_git(Box::new(ShellGit))
    }

    /// Construct with an explicit working-copy manager.
    pub fn with_git(git: Box<dyn GitOps>) -> Self {
        let endpoint = dirs::home_dir()
            .map(|home| home.display().to_string())
            .unwrap_or_default();
        Self {
            endpoint,
            git,
            statuses: Mutex::new(HashMap::new()),
            next_pr_number: AtomicU64::new(1),
        }
    }
}

impl Default for LocalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Ref-detection command for the default branch of a working copy.
async fn detect_default_branch(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .await
        .map_err(|err| PlatformError::GitCommand(err.to_string()))?;

    if !output.status.success() {
        return Err(PlatformError::GitCommand(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if branch.is_empty() {
        return Err(PlatformError::GitCommand(
            "empty output from git rev-parse".to_string(),
        ));
    }

    Ok(branch)
}

// -----------------------------------------------------------------------------
// Platform impl

#[async_trait(?Send)]
impl Platform for LocalPlatform {
    async fn init_platform(&mut self, params: PlatformParams) -> Result<PlatformResult> {
        if let Some(endpoint) = params.endpoint {
            self.endpoint = endpoint;
        }
        if self.endpoint.is_empty() {
            return Err(PlatformError::Config(
                "no endpoint given and no home directory to default to".to_string(),
            ));
        }
        Ok(PlatformResult {
            endpoint: self.endpoint.clone(),
        })
    }

    #[instrument(skip_all, fields(repository = %params.repository))]
    async fn init_repo(&self, params: RepoParams) -> Result<(Session, RepoResult)> {
        let endpoint = params.endpoint.unwrap_or_else(|| self.endpoint.clone());
        let repo_dir = Path::new(&endpoint).join(&params.repository);
        let git_dir = repo_dir.join(".git");

        if !git_dir.is_dir() {
            return Err(PlatformError::RepoNotFound {
                repository: params.repository,
                reason: format!("no .git directory under {}", repo_dir.display()),
            });
        }

        let default_branch =
            detect_default_branch(&repo_dir)
                .await
                .map_err(|err| PlatformError::RepoNotFound {
                    repository: params.repository.clone(),
                    reason: err.to_string(),
                })?;

        self.git
            .init_repo(WorktreeConfig {
                repository: params.repository.clone(),
                default_branch: default_branch.clone(),
                endpoint: endpoint.clone(),
                url: git_dir.display().to_string(),
            })
            .await?;

        let session = Session {
            repository: params.repository,
            default_branch: default_branch.clone(),
            endpoint,
        };
        let result = RepoResult {
            default_branch,
            is_fork: false,
        };
        Ok((session, result))
    }

    #[instrument(skip_all)]
    async fn get_repos(&self) -> Result<Vec<String>> {
        debug!("autodiscovering local repositories");

        let output = Command::new("find")
            .args([
                self.endpoint.as_str(),
                "-type",
                "d",
                "-execdir",
                "test",
                "-d",
                "{}/.git",
                ";",
                "-print",
                "-prune",
            ])
            .output()
            .await
            .map_err(|err| PlatformError::Discovery(err.to_string()))?;

        if !output.status.success() {
            return Err(PlatformError::Discovery(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let prefix = Regex::new(&format!("^{}/?", regex::escape(&self.endpoint)))
            .map_err(|err| PlatformError::Discovery(err.to_string()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(|line| prefix.replace(line, "").into_owned())
            .filter(|repo| !repo.is_empty())
            .collect())
    }

    async fn get_issue_list(&self, _session: &Session) -> Result<Vec<Issue>> {
        debug!("get_issue_list()");
        Ok(Vec::new())
    }

    async fn find_issue(&self, _session: &Session, title: &str) -> Result<Option<Issue>> {
        debug!("find_issue() {title}");
        Ok(None)
    }

    async fn ensure_issue(
        &self,
        _session: &Session,
        config: EnsureIssueConfig,
    ) -> Result<Option<EnsureIssueResult>> {
        debug!("ensure_issue() {}", config.title);
        info!("ensured issue\n# {}\n\n{}", config.title, config.body);
        Ok(Some(EnsureIssueResult::Created))
    }

    async fn ensure_issue_closing(&self, _session: &Session, title: &str) -> Result<()> {
        debug!("ensure_issue_closing() {title}");
        Ok(())
    }

    async fn get_pr_list(&self, _session: &Session) -> Result<Vec<Pr>> {
        debug!("get_pr_list()");
        Ok(Vec::new())
    }

    async fn find_pr(&self, _session: &Session, config: FindPrConfig) -> Result<Option<Pr>> {
        debug!(
            "find_pr({}, {}, {:?})",
            config.branch_name,
            config.pr_title.as_deref().unwrap_or(""),
            config.state
        );
        Ok(None)
    }

    async fn get_pr(&self, _session: &Session, number: u64) -> Result<Option<Pr>> {
        debug!("get_pr({number})");
        Ok(None)
    }

    async fn get_branch_pr(&self, _session: &Session, branch_name: &str) -> Result<Option<Pr>> {
        debug!("get_branch_pr({branch_name})");
        Ok(None)
    }

    async fn create_pr(&self, _session: &Session, config: CreatePrConfig) -> Result<Pr> {
        debug!("create_pr({})", config.source_branch);
        info!(
            "created PR {} -> {}\n# {}\n\n{}",
            config.source_branch, config.target_branch, config.pr_title, config.pr_body
        );
        Ok(Pr {
            number: self.next_pr_number.fetch_add(1, Ordering::Relaxed),
            source_branch: config.source_branch,
            target_branch: config.target_branch,
            title: config.pr_title,
            body: config.pr_body,
            state: PrState::Open,
            labels: config.labels,
        })
    }

    async fn update_pr(&self, _session: &Session, config: UpdatePrConfig) -> Result<()> {
        debug!("update_pr({})", config.number);
        Ok(())
    }

    async fn merge_pr(&self, _session: &Session, config: MergePrConfig) -> Result<bool> {
        debug!("merge_pr({})", config.id);
        Ok(true)
    }

    async fn get_branch_status(
        &self,
        _session: &Session,
        branch_name: &str,
    ) -> Result<BranchStatus> {
        debug!("get_branch_status({branch_name})");
        let statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(statuses
            .get(branch_name)
            .and_then(|checks| checks.values().max().copied())
            .unwrap_or(BranchStatus::Green))
    }

    async fn get_branch_status_check(
        &self,
        _session: &Session,
        branch_name: &str,
        context: &str,
    ) -> Result<Option<BranchStatus>> {
        debug!("get_branch_status_check({branch_name}, {context})");
        let statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(statuses
            .get(branch_name)
            .and_then(|checks| checks.get(context))
            .copied())
    }

    async fn set_branch_status(
        &self,
        _session: &Session,
        config: BranchStatusConfig,
    ) -> Result<()> {
        debug!(
            "set_branch_status({}, '{}')",
            config.branch_name,
            config.state.as_str()
        );
        let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        statuses
            .entry(config.branch_name)
            .or_default()
            .insert(config.context, config.state);
        Ok(())
    }

    async fn ensure_comment(
        &self,
        _session: &Session,
        config: EnsureCommentConfig,
    ) -> Result<bool> {
        debug!(
            "ensure_comment({}, {})",
            config.number,
            config.topic.as_deref().unwrap_or(&config.content)
        );
        Ok(true)
    }

    async fn ensure_comment_removal(
        &self,
        _session: &Session,
        config: EnsureCommentRemovalConfig,
    ) -> Result<()> {
        debug!(
            "ensure_comment_removal({}, {})",
            config.number,
            config
                .topic
                .as_deref()
                .or(config.content.as_deref())
                .unwrap_or("")
        );
        Ok(())
    }

    async fn add_assignees(
        &self,
        _session: &Session,
        number: u64,
        assignees: &[String],
    ) -> Result<()> {
        debug!("add_assignees({number}, '{}')", assignees.join(", "));
        Ok(())
    }

    async fn add_reviewers(
        &self,
        _session: &Session,
        number: u64,
        reviewers: &[String],
    ) -> Result<()> {
        debug!("add_reviewers({number}, '{}')", reviewers.join(", "));
        Ok(())
    }

    async fn delete_label(&self, _session: &Session, number: u64, label: &str) -> Result<()> {
        debug!("delete_label({number}, {label})");
        Ok(())
    }

    async fn filter_unavailable_users(&self, _users: &[String]) -> Result<Vec<String>> {
        debug!("filter_unavailable_users()");
        Ok(Vec::new())
    }

    async fn get_raw_file(
        &self,
        session: &Session,
        file_name: &str,
        repo: Option<&str>,
    ) -> Result<String> {
        let repo = repo.unwrap_or(&session.repository);
        let path = Path::new(&session.endpoint).join(repo).join(file_name);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PlatformError::FileNotFound(path))
            }
            Err(err) => Err(PlatformError::Io(err)),
        }
    }

    async fn get_json_file(
        &self,
        session: &Session,
        file_name: &str,
        repo: Option<&str>,
    ) -> Result<Value> {
        let raw = self.get_raw_file(session, file_name, repo).await?;
        if file_name.ends_with(".json5") {
            json5::from_str(&raw).map_err(|err| PlatformError::Parse {
                file: file_name.to_string(),
                reason: err.to_string(),
            })
        } else {
            serde_json::from_str(&raw).map_err(|err| PlatformError::Parse {
                file: file_name.to_string(),
                reason: err.to_string(),
            })
        }
    }

    fn massage_markdown(&self, input: &str) -> String {
        input.to_string()
    }

    async fn get_repo_force_rebase(&self, _session: &Session) -> Result<bool> {
        Ok(false)
    }

    async fn get_vulnerability_alerts(
        &self,
        _session: &Session,
    ) -> Result<Vec<VulnerabilityAlert>> {
        debug!("get_vulnerability_alerts()");
        Ok(Vec::new())
    }
}
