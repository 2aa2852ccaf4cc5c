pub mod blocks;
pub mod config;
pub mod info;
pub mod preview;
pub mod video;

use std::path::Path;

use anyhow::{bail, Context, Result};
use fathom_core::blocks::TransducerConfig;
use fathom_core::pipeline::config::SurveyConfig;

/// Load a TOML survey config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SurveyConfig> {
    let Some(path) = path else {
        return Ok(SurveyConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid survey config")
}

/// Explicit channels, falling back to the first suggested pair.
pub fn resolve_pair(
    left: Option<u32>,
    right: Option<u32>,
    transducer: &TransducerConfig,
) -> Result<(u32, u32)> {
    match (left, right, transducer.suggested_pairs.first()) {
        (Some(l), Some(r), _) => Ok((l, r)),
        (None, None, Some(&pair)) => Ok(pair),
        (l, r, Some(&(sl, sr))) => Ok((l.unwrap_or(sl), r.unwrap_or(sr))),
        _ => bail!(
            "No channel pair could be inferred ({}); pass --left and --right",
            transducer.scan_type
        ),
    }
}
