//! Preset resolution: shareable configuration fragments referenced by an
//! "extends" mechanism, fetched from an addressable endpoint.
//!
//! - [`local`]: strategy reading preset files from a local directory tree
//!
//! Strategies distinguish "document fetched" from "nothing there"; only the
//! per-source entry points collapse that two-state outcome into an `Option`.
//! Fatal errors travel separately as `Err`, so "resolution exhausted, try the
//! next source" never masks a broken configuration.

pub mod local;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

// -----------------------------------------------------------------------------
// Types

/// A parsed preset document. Immutable once fetched; never cached here.
pub type Preset = Value;

/// Outcome of one fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(Preset),
    Absent,
}

/// Source-specific fetch strategy.
#[async_trait(?Send)]
pub trait FetchPresetFile {
    async fn fetch(
        &self,
        repo: &str,
        file_name: &str,
        endpoint: &str,
        package_tag: Option<&str>,
    ) -> Result<FetchOutcome>;
}

/// Parameters for one preset lookup.
#[derive(Debug, Clone)]
pub struct FetchPresetConfig<'a> {
    pub pkg_name: &'a str,
    pub file_preset: &'a str,
    pub preset_path: Option<&'a str>,
    pub endpoint: &'a str,
    pub package_tag: Option<&'a str>,
}

// -----------------------------------------------------------------------------
// Resolution

/// Generic resolution routine shared by all strategies.
///
/// `file_preset` is `file`, `file/key` or `file/key/subkey`: the first segment
/// names the JSON file, later segments select nested members of the fetched
/// document. The `default` file falls back to `updatebot.json` when
/// `default.json` is missing.
pub async fn fetch_preset(
    config: FetchPresetConfig<'_>,
    strategy: &dyn FetchPresetFile,
) -> Result<Option<Preset>> {
    let mut segments = config.file_preset.splitn(3, '/');
    let file_segment = segments.next().unwrap_or(config.file_preset);
    let preset_key = segments.next();
    let sub_key = segments.next();

    let path_of = |name: &str| match config.preset_path {
        Some(path) => format!("{path}/{name}"),
        None => name.to_string(),
    };

    let mut outcome = strategy
        .fetch(
            config.pkg_name,
            &path_of(&format!("{file_segment}.json")),
            config.endpoint,
            config.package_tag,
        )
        .await?;

    if file_segment == "default" && outcome == FetchOutcome::Absent {
        outcome = strategy
            .fetch(
                config.pkg_name,
                &path_of("updatebot.json"),
                config.endpoint,
                config.package_tag,
            )
            .await?;
    }

    let FetchOutcome::Found(mut preset) = outcome else {
        return Ok(None);
    };

    for key in [preset_key, sub_key].into_iter().flatten() {
        match preset.get(key) {
            Some(member) if member.is_object() => preset = member.clone(),
            Some(_) => {
                debug!(preset = config.file_preset, key, "nested preset member is not an object");
                return Ok(None);
            }
            None => {
                debug!(preset = config.file_preset, key, "nested preset member not found");
                return Ok(None);
            }
        }
    }

    Ok(Some(preset))
}
