use anyhow::Result;

use crate::App;
use crate::platform::Platform as _;

impl App {
    pub async fn cmd_file(
        &self,
        repository: &str,
        file_name: &str,
        json: bool,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let session = self.open_session(repository).await?;

        if json {
            let value = self.platform.get_json_file(&session, file_name, None).await?;
            writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;
        } else {
            let raw = self.platform.get_raw_file(&session, file_name, None).await?;
            write!(stdout, "{raw}")?;
        }
        Ok(())
    }
}
