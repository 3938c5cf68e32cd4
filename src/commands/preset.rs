use anyhow::Result;
use log::warn;

use crate::App;
use crate::presets::local::get_preset_from_endpoint;

impl App {
    pub async fn cmd_preset(
        &self,
        repository: &str,
        preset: &str,
        path: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let resolved =
            get_preset_from_endpoint(repository, preset, path, &self.endpoint, None).await?;

        match resolved {
            Some(doc) => writeln!(stdout, "{}", serde_json::to_string_pretty(&doc)?)?,
            None => warn!("No preset '{preset}' found in {repository}"),
        }
        Ok(())
    }
}
