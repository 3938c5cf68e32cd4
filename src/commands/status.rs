use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::platform::Platform as _;
use crate::platform::types::BranchStatus;

impl App {
    pub async fn cmd_status(
        &self,
        repository: &str,
        branch: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let session = self.open_session(repository).await?;
        let status = self.platform.get_branch_status(&session, branch).await?;

        let rendered = match status {
            BranchStatus::Green => status.as_str().green(),
            BranchStatus::Yellow => status.as_str().yellow(),
            BranchStatus::Red => status.as_str().red(),
        };
        writeln!(stdout, "{} {}", branch.white().bold(), rendered)?;
        Ok(())
    }
}
