use std::collections::hash_map::DefaultHasher;
use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::Path;
use std::path::PathBuf;

/// Where a document was found: the project it belongs to, the directory that
/// was searched, and the file's path relative to that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePath {
	/// Root directory of the owning project.
	pub project_root: PathBuf,
	/// The docs path the file was discovered under.
	pub searched_path: PathBuf,
	/// The file's path relative to `searched_path`.
	pub relative_path: PathBuf,
}

impl SourcePath {
	pub fn new(
		project_root: impl Into<PathBuf>,
		searched_path: impl Into<PathBuf>,
		relative_path: impl Into<PathBuf>,
	) -> Self {
		Self {
			project_root: project_root.into(),
			searched_path: searched_path.into(),
			relative_path: relative_path.into(),
		}
	}

	/// The path the file was originally read from.
	pub fn original_file_path(&self) -> PathBuf {
		self.searched_path.join(&self.relative_path)
	}

	pub fn relative_path(&self) -> &Path {
		&self.relative_path
	}
}

/// A checksum of a document's contents, recorded when the document is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHash(pub u64);

impl FileHash {
	pub fn of(contents: &str) -> Self {
		let mut hasher = DefaultHasher::new();
		contents.hash(&mut hasher);
		Self(hasher.finish())
	}

	/// The checksum of an empty document.
	pub fn empty() -> Self {
		Self::of("")
	}
}

impl Display for FileHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

/// The raw text of one documentation file plus the metadata needed to record
/// where its blocks came from. Documents are immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
	path: SourcePath,
	package_name: String,
	contents: String,
	checksum: FileHash,
}

impl Document {
	pub fn new(path: SourcePath, package_name: impl Into<String>, contents: impl Into<String>) -> Self {
		let contents = contents.into();
		let checksum = FileHash::of(&contents);

		Self {
			path,
			package_name: package_name.into(),
			contents,
			checksum,
		}
	}

	pub fn path(&self) -> &SourcePath {
		&self.path
	}

	pub fn package_name(&self) -> &str {
		&self.package_name
	}

	pub fn contents(&self) -> &str {
		&self.contents
	}

	pub fn checksum(&self) -> FileHash {
		self.checksum
	}
}
