use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::application::compare::CompareOptions;

/// Top-level cellscope configuration.
///
/// Every section is optional; an absent file yields the defaults. The CLI
/// flags override whatever was loaded here.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub compare: CompareOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory report files are written under.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Report format: "json", "csv", "html", or "all".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> String {
    "reports".to_string()
}

fn default_format() -> String {
    "all".to_string()
}

impl AppConfig {
    /// Per-user config location: `<config_dir>/cellscope/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cellscope").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse; with `None`, the per-user
    /// default location is consulted and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                builder = builder.add_source(
                    File::from(p.to_path_buf())
                        .format(FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                if let Some(p) = Self::default_path() {
                    builder = builder.add_source(
                        File::from(p).format(FileFormat::Toml).required(false),
                    );
                }
            }
        }

        builder
            .build()
            .with_context(|| "Failed to read config file")?
            .try_deserialize()
            .with_context(|| "Failed to parse config TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_file_parses() {
        let mut f = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            f,
            "[compare]\nignore_case = true\nignore_whitespace = true\n\n[output]\ndir = \"out\"\nformat = \"json\""
        )
        .unwrap();

        let cfg = AppConfig::load(Some(f.path())).unwrap();
        assert!(cfg.compare.ignore_case);
        assert!(cfg.compare.ignore_whitespace);
        assert_eq!(cfg.output.dir, "out");
        assert_eq!(cfg.output.format, "json");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut f = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(f, "[compare]\nignore_case = true").unwrap();

        let cfg = AppConfig::load(Some(f.path())).unwrap();
        assert!(cfg.compare.ignore_case);
        assert!(!cfg.compare.ignore_whitespace);
        assert_eq!(cfg.output.dir, "reports");
        assert_eq!(cfg.output.format, "all");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/cellscope.toml"))).is_err());
    }
}
