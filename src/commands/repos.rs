use anyhow::Result;

use crate::App;
use crate::platform::Platform as _;

impl App {
    pub async fn cmd_repos(&self, stdout: &mut impl std::io::Write) -> Result<()> {
        let mut repos = self.platform.get_repos().await?;
        repos.sort();
        for repo in repos {
            writeln!(stdout, "{repo}")?;
        }
        Ok(())
    }
}
