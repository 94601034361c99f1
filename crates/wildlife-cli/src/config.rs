//! Configuration file of the `wildlife` binary
//!
//! ```json
//! {
//!   "analysis": { "confidence_z": 1.959963984540054, "failure_policy": "skip" },
//!   "render": { "output_dir": "plots", "palette": ["#2ecc71", "#e74c3c"] },
//!   "log": { "level": "debug" }
//! }
//! ```
//!
//! Every section and every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wildlife_analysis::config::AnalysisConfig;

use crate::{logging::LogConfig, render::RenderConfig, util};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub analysis: AnalysisConfig,
    pub render: RenderConfig,
    pub log: LogConfig,
}

impl CliConfig {
    /// Reads the configuration file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => util::read_json_file("config", path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use wildlife_analysis::config::FailurePolicy;

    use super::*;

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wildlife.json");
        fs::write(
            &path,
            r#"{"analysis":{"failure_policy":"skip"},"render":{"output_dir":"out"}}"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.analysis.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.analysis.risk_histogram_bins, 30);
        assert_eq!(config.render.output_dir, Path::new("out"));
        assert_eq!(config.render.palette, RenderConfig::default().palette);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_unreadable_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
