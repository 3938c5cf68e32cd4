use anyhow::Result;

use crate::App;
use crate::platform::Platform as _;
use crate::platform::types::RepoParams;

impl App {
    pub async fn cmd_init(
        &self,
        repository: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let (session, result) = self
            .platform
            .init_repo(RepoParams {
                repository: repository.to_string(),
                endpoint: None,
            })
            .await?;

        writeln!(stdout, "Repository: {}", session.repository)?;
        writeln!(stdout, "Default branch: {}", result.default_branch)?;
        writeln!(stdout, "Fork: {}", result.is_fork)?;
        Ok(())
    }
}
