//! Settings for a conversion run.
//!
//! Values come from, in order of precedence: command-line flags, a TOML config
//! file, built-in defaults. The config file is optional:
//!
//! ```toml
//! output_dir = "app/src/main/res/values"
//! format = "xml"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tolgee_pull::OutputFormat;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tolgee-pull.toml";

/// Output directory used when neither the command line nor the config file sets one.
pub const DEFAULT_OUTPUT_DIR: &str = "i18n";

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
}

/// Fully resolved settings handed to the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}

/// Loads the config file.
///
/// An explicitly given file must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// the working directory is read if present, otherwise the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Error reading config {}: {}", path.display(), e))?;
    parse_config(&content).map_err(|e| format!("Error parsing config {}: {}", path.display(), e))
}

/// Parses config file contents.
pub fn parse_config(content: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Merges command-line values over the config file over the defaults.
///
/// An unknown format name is an error here, before any file is touched.
pub fn resolve_settings(
    output_dir: Option<PathBuf>,
    format: Option<String>,
    file: FileConfig,
) -> Result<Settings, String> {
    let output_dir = output_dir
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let format = match format.or(file.format) {
        Some(name) => OutputFormat::from_str(&name).map_err(|e| e.to_string())?,
        None => OutputFormat::default(),
    };

    Ok(Settings { output_dir, format })
}
