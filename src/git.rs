use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::PlatformError;
use crate::error::Result;

// -----------------------------------------------------------------------------
// Types

/// Parameters handed to the working-copy manager when a repository session is
/// established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeConfig {
    pub repository: String,
    pub default_branch: String,
    pub endpoint: String,
    /// Location of the git metadata directory backing the working copy.
    pub url: String,
}

// -----------------------------------------------------------------------------
// GitOps trait

/// Working-copy manager seam.
///
/// Commit, branch and push plumbing live behind this trait; the platform
/// layer only ever hands over session parameters when a repository is
/// initialized.
#[async_trait(?Send)]
pub trait GitOps {
    async fn init_repo(&self, config: WorktreeConfig) -> Result<()>;
}

// -----------------------------------------------------------------------------
// ShellGit

/// Subprocess-backed implementation that validates the worktree.
pub struct ShellGit;

#[async_trait(?Send)]
impl GitOps for ShellGit {
    async fn init_repo(&self, config: WorktreeConfig) -> Result<()> {
        let worktree = Path::new(&config.endpoint).join(&config.repository);
        let output = Command::new("git")
            .current_dir(&worktree)
            .args(["rev-parse", "--git-dir"])
            .output()
            .await
            .map_err(|err| PlatformError::GitCommand(err.to_string()))?;

        if !output.status.success() {
            return Err(PlatformError::GitCommand(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// RecordingGit

/// Test double that records every worktree config it receives.
#[cfg(test)]
pub struct RecordingGit {
    init_calls: std::rc::Rc<std::cell::RefCell<Vec<WorktreeConfig>>>,
}

#[cfg(test)]
impl RecordingGit {
    pub fn new() -> Self {
        Self {
            init_calls: std::rc::Rc::new(std::cell::RefCell::new(Vec::new())),
        }
    }

    /// Handle onto the recorded calls, usable after the double is boxed away.
    pub fn calls(&self) -> std::rc::Rc<std::cell::RefCell<Vec<WorktreeConfig>>> {
        self.init_calls.clone()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl GitOps for RecordingGit {
    async fn init_repo(&self, config: WorktreeConfig) -> Result<()> {
        self.init_calls.borrow_mut().push(config);
        Ok(())
    }
}
