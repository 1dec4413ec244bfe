use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DocError;
use crate::DocResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"docblocks.toml",
	".docblocks.toml",
	".config/docblocks.toml",
];

/// Configuration loaded from `docblocks.toml`.
///
/// ```toml
/// name = "snowplow"
/// docs_paths = ["models", "docs"]
/// extensions = ["md"]
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["target/", "*.draft.md"]
/// ```
#[derive(Debug, Deserialize)]
pub struct DocblocksConfig {
	/// The package every entry in this project belongs to. Defaults to the
	/// name of the project root directory.
	#[serde(default)]
	pub name: Option<String>,
	/// Directories searched for documentation files, relative to the project
	/// root. Defaults to the root itself.
	#[serde(default)]
	pub docs_paths: Vec<PathBuf>,
	/// File extensions (without the dot) treated as documentation files.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Maximum file size in bytes to scan. Larger files are reported as
	/// failures.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// Files and directories to skip while scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules (unless `disable_gitignore` is set).
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_extensions() -> Vec<String> {
	vec!["md".to_string()]
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl DocblocksConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> DocResult<Option<DocblocksConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> DocResult<DocblocksConfig> {
		toml::from_str(content).map_err(|e| DocError::ConfigParse(e.to_string()))
	}
}
