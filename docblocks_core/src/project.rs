use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use rayon::prelude::*;

use crate::DocError;
use crate::DocResult;
use crate::Document;
use crate::DocumentationRegistry;
use crate::SourcePath;
use crate::config::CONFIG_FILE_CANDIDATES;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::DocblocksConfig;
use crate::parser::parse_document_to_registry;

/// Options for controlling how a project is scanned.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from a [`DocblocksConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Package name for every entry. `None` uses the root directory name.
	pub package_name: Option<String>,
	/// Directories to search, relative to the root. Empty means the root.
	pub docs_paths: Vec<PathBuf>,
	/// File extensions treated as documentation files.
	pub extensions: Vec<String>,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Maximum file size to scan in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
	/// Parse documents on the rayon thread pool.
	pub parallel: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			package_name: None,
			docs_paths: Vec::new(),
			extensions: vec!["md".to_string()],
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			parallel: true,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a [`DocblocksConfig`].
	pub fn from_config(config: Option<&DocblocksConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			package_name: config.name.clone(),
			docs_paths: config.docs_paths.clone(),
			extensions: config.extensions.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
			parallel: true,
		}
	}

	/// The package name used for `root`.
	pub fn resolve_package_name(&self, root: &Path) -> String {
		self.package_name.clone().unwrap_or_else(|| {
			root.canonicalize()
				.ok()
				.as_deref()
				.unwrap_or(root)
				.file_name()
				.and_then(|name| name.to_str())
				.unwrap_or("root")
				.to_string()
		})
	}
}

/// A document that could not be loaded, parsed, or merged.
#[derive(Debug)]
pub struct DocumentFailure {
	pub path: PathBuf,
	pub error: DocError,
}

/// The outcome of scanning a project. Failures are collected per document;
/// a failing document contributes no entries.
#[derive(Debug, Default)]
pub struct ProjectScan {
	pub registry: DocumentationRegistry,
	pub failures: Vec<DocumentFailure>,
	/// Every file that was considered, in scan order.
	pub files: Vec<PathBuf>,
}

impl ProjectScan {
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Scan a directory with default options.
pub fn scan_project(root: &Path) -> DocResult<ProjectScan> {
	scan_project_with_options(root, &ScanOptions::default())
}

/// Scan a project using the config discovered at `root`, if any.
pub fn scan_project_with_config(root: &Path) -> DocResult<ProjectScan> {
	let config = DocblocksConfig::load(root)?;
	let options = ScanOptions::from_config(config.as_ref());
	scan_project_with_options(root, &options)
}

/// Scan a directory with the given [`ScanOptions`].
///
/// Each document is parsed into its own registry and merged into the result
/// in file order, so the outcome does not depend on `parallel`.
pub fn scan_project_with_options(root: &Path, options: &ScanOptions) -> DocResult<ProjectScan> {
	let package_name = options.resolve_package_name(root);
	let searched_paths: Vec<PathBuf> = if options.docs_paths.is_empty() {
		vec![root.to_path_buf()]
	} else {
		options.docs_paths.iter().map(|path| root.join(path)).collect()
	};

	// Overlapping docs paths find the same file more than once. The first
	// searched path that reaches a file owns it.
	let mut seen = HashSet::new();
	let mut sources = Vec::new();
	for searched_path in &searched_paths {
		for file in collect_files(root, searched_path, options)? {
			let canonical = file.canonicalize().unwrap_or_else(|_| file.clone());
			if seen.insert(canonical) {
				sources.push((searched_path.clone(), file));
			}
		}
	}

	let parse = |(searched_path, file): &(PathBuf, PathBuf)| {
		let result = load_document(root, searched_path, file, &package_name, options.max_file_size)
			.and_then(|document| parse_document_to_registry(&document));
		(file.clone(), result)
	};

	let results: Vec<_> = if options.parallel {
		sources.par_iter().map(parse).collect()
	} else {
		sources.iter().map(parse).collect()
	};

	let mut scan = ProjectScan::default();
	for (path, result) in results {
		let merged = result.and_then(|partial| scan.registry.merge(partial));
		if let Err(error) = merged {
			tracing::warn!(path = %path.display(), %error, "skipping documentation file");
			scan.failures.push(DocumentFailure {
				path: path.clone(),
				error,
			});
		}
		scan.files.push(path);
	}

	tracing::debug!(
		package = %package_name,
		files = scan.files.len(),
		entries = scan.registry.len(),
		failures = scan.failures.len(),
		"scanned project"
	);

	Ok(scan)
}

/// Read `file` into a [`Document`] owned by `package_name`.
pub fn load_document(
	root: &Path,
	searched_path: &Path,
	file: &Path,
	package_name: &str,
	max_file_size: u64,
) -> DocResult<Document> {
	let size = std::fs::metadata(file)?.len();
	if size > max_file_size {
		return Err(DocError::FileTooLarge {
			path: file.display().to_string(),
			size,
			limit: max_file_size,
		});
	}

	let contents = normalize_line_endings(&std::fs::read_to_string(file)?);
	let relative_path = file.strip_prefix(searched_path).unwrap_or(file);

	Ok(Document::new(
		SourcePath::new(root, searched_path, relative_path),
		package_name,
		contents,
	))
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Collect every documentation file below `searched_path`, sorted.
///
/// When `disable_gitignore` is false (the default), files matched by the
/// project's `.gitignore` are skipped. Exclude patterns always apply on top.
pub fn collect_files(
	root: &Path,
	searched_path: &Path,
	options: &ScanOptions,
) -> DocResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	let walker = DirWalker {
		extensions: &options.extensions,
		gitignore: &gitignore,
		custom_exclude: &custom_exclude,
	};
	walker.walk(searched_path, true, &mut files, &mut visited_dirs)?;

	files.sort();
	Ok(files)
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> DocResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DocError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| DocError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

struct DirWalker<'a> {
	extensions: &'a [String],
	gitignore: &'a Gitignore,
	custom_exclude: &'a Gitignore,
}

impl DirWalker<'_> {
	fn walk(
		&self,
		dir: &Path,
		is_root: bool,
		files: &mut Vec<PathBuf>,
		visited_dirs: &mut HashSet<PathBuf>,
	) -> DocResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !visited_dirs.insert(canonical) {
			return Err(DocError::SymlinkCycle {
				path: dir.display().to_string(),
			});
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) {
					continue;
				}
			}

			let is_dir = path.is_dir();

			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.custom_exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				// Nested projects own their docs.
				if !is_root && has_project_config(&path) {
					continue;
				}
				self.walk(&path, false, files, visited_dirs)?;
			} else if self.is_documentation_file(&path) {
				files.push(path);
			}
		}

		Ok(())
	}

	fn is_documentation_file(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
	}
}
