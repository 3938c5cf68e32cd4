use anyhow::Result;

use crate::platform::Platform;
use crate::platform::types::RepoParams;
use crate::platform::types::Session;

pub struct App {
    pub platform: Box<dyn Platform>,
    /// Root address repositories and presets are resolved against.
    pub endpoint: String,
}

impl App {
    pub fn new(platform: Box<dyn Platform>, endpoint: String) -> Self {
        Self { platform, endpoint }
    }
}

/// Shared helper methods for App
impl App {
    /// Establish a session for one repository under the configured endpoint.
    pub(crate) async fn open_session(&self, repository: &str) -> Result<Session> {
        let (session, _) = self
            .platform
            .init_repo(RepoParams {
                repository: repository.to_string(),
                endpoint: None,
            })
            .await?;
        Ok(session)
    }
}
