use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::presets::FetchOutcome;
use crate::presets::FetchPresetConfig;
use crate::presets::FetchPresetFile;
use crate::presets::Preset;
use crate::presets::fetch_preset;

// -----------------------------------------------------------------------------
// LocalFetcher

/// Reads preset files from `<endpoint>/<repo>/<file_name>`.
///
/// Preset files are always parsed as strict JSON regardless of extension. Any
/// failure (missing file, invalid JSON, permissions) resolves to
/// [`FetchOutcome::Absent`] so higher-level resolution can move on to other
/// sources.
pub struct LocalFetcher;

#[async_trait(?Send)]
impl FetchPresetFile for LocalFetcher {
    async fn fetch(
        &self,
        repo: &str,
        file_name: &str,
        endpoint: &str,
        _package_tag: Option<&str>,
    ) -> Result<FetchOutcome> {
        let path = Path::new(endpoint).join(repo).join(file_name);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = %err, repo, "failed to retrieve {file_name} from repo");
                return Ok(FetchOutcome::Absent);
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => Ok(FetchOutcome::Found(parsed)),
            Err(err) => {
                debug!(error = %err, repo, "failed to parse {file_name} from repo");
                Ok(FetchOutcome::Absent)
            }
        }
    }
}

/// Resolve `preset_name` for `pkg_name` against a local endpoint.
pub async fn get_preset_from_endpoint(
    pkg_name: &str,
    preset_name: &str,
    preset_path: Option<&str>,
    endpoint: &str,
    package_tag: Option<&str>,
) -> Result<Option<Preset>> {
    fetch_preset(
        FetchPresetConfig {
            pkg_name,
            file_preset: preset_name,
            preset_path,
            endpoint,
            package_tag,
        },
        &LocalFetcher,
    )
    .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn write_repo_file(endpoint: &Path, repo: &str, file: &str, contents: &str) {
        let dir = endpoint.join(repo);
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join(file), contents).await.unwrap();
    }

    #[tokio::test]
    async fn test_round_trips_a_valid_json_file() {
        let temp = tempfile::tempdir().unwrap();
        let doc = json!({"extends": ["config:base"], "rangeStrategy": "bump"});
        write_repo_file(
            temp.path(),
            "some/repo",
            "default.json",
            &serde_json::to_string(&doc).unwrap(),
        )
        .await;

        let endpoint = temp.path().display().to_string();
        let preset = get_preset_from_endpoint("some/repo", "default", None, &endpoint, None)
            .await
            .unwrap();
        assert_eq!(preset, Some(doc));
    }

    #[tokio::test]
    async fn test_missing_file_is_none_and_never_raises() {
        let temp = tempfile::tempdir().unwrap();
        let endpoint = temp.path().display().to_string();
        let preset = get_preset_from_endpoint("no/such/repo", "default", None, &endpoint, None)
            .await
            .unwrap();
        assert_eq!(preset, None);
    }

    #[tokio::test]
    async fn test_invalid_json_is_absent_not_error() {
        let temp = tempfile::tempdir().unwrap();
        write_repo_file(temp.path(), "repo", "broken.json", "{not json").await;

        let endpoint = temp.path().display().to_string();
        let preset = get_preset_from_endpoint("repo", "broken", None, &endpoint, None)
            .await
            .unwrap();
        assert_eq!(preset, None);
    }

    #[tokio::test]
    async fn test_json5_syntax_is_rejected_by_the_strict_parser() {
        let temp = tempfile::tempdir().unwrap();
        // Presets are strict JSON regardless of how the repo file is written.
        write_repo_file(temp.path(), "repo", "lenient.json", "{a: 1, /* c */}").await;

        let endpoint = temp.path().display().to_string();
        let preset = get_preset_from_endpoint("repo", "lenient", None, &endpoint, None)
            .await
            .unwrap();
        assert_eq!(preset, None);
    }
}
