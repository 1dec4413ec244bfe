use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

use derive_more::Deref;
use serde::Serialize;
use serde::Serializer;

use crate::BlockMatch;
use crate::DocError;
use crate::DocResult;
use crate::Document;

/// The kind of resource an entry describes. Docs blocks are the only kind
/// this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ResourceKind {
	Documentation,
}

impl ResourceKind {
	/// The prefix used in unique ids, e.g. `doc.my_package.my_block`.
	pub fn id_prefix(self) -> &'static str {
		match self {
			Self::Documentation => "doc",
		}
	}
}

impl Display for ResourceKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Documentation => write!(f, "documentation"),
		}
	}
}

/// Where an entry was defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Provenance {
	pub package_name: String,
	/// The full path the file was read from.
	pub original_file_path: PathBuf,
	/// The path relative to the docs path it was found under.
	pub path: PathBuf,
}

impl Provenance {
	pub fn from_document(document: &Document) -> Self {
		Self {
			package_name: document.package_name().to_string(),
			original_file_path: document.path().original_file_path(),
			path: document.path().relative_path().to_path_buf(),
		}
	}
}

impl Display for Provenance {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.original_file_path.display())
	}
}

/// A named documentation block registered for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationEntry {
	pub name: String,
	pub package_name: String,
	pub resource_type: ResourceKind,
	pub block_contents: String,
	pub provenance: Provenance,
}

impl DocumentationEntry {
	pub fn from_block(block: BlockMatch, document: &Document) -> Self {
		Self {
			name: block.name,
			package_name: document.package_name().to_string(),
			resource_type: ResourceKind::Documentation,
			block_contents: block.contents,
			provenance: Provenance::from_document(document),
		}
	}

	pub fn key(&self) -> DocKey {
		DocKey::new(&self.package_name, &self.name)
	}

	/// `doc.<package>.<name>`
	pub fn unique_id(&self) -> String {
		format!(
			"{}.{}.{}",
			self.resource_type.id_prefix(),
			self.package_name,
			self.name
		)
	}
}

/// Registry key: a name is unique within its package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocKey {
	pub package: String,
	pub name: String,
}

impl DocKey {
	pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			package: package.into(),
			name: name.into(),
		}
	}
}

/// All documentation entries found during a run, keyed by package and name.
///
/// The registry only grows: [`insert`](Self::insert) and
/// [`merge`](Self::merge) reject any key that is already present, even when
/// the contents are identical. Reads go through the dereferenced map or the
/// helpers below.
#[derive(Debug, Clone, Default, Deref)]
pub struct DocumentationRegistry {
	#[deref]
	docs: HashMap<DocKey, DocumentationEntry>,
}

impl DocumentationRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an entry, failing if its `(package, name)` is already registered.
	pub fn insert(&mut self, entry: DocumentationEntry) -> DocResult<()> {
		let key = entry.key();

		if let Some(existing) = self.docs.get(&key) {
			return Err(duplicate(existing, &entry));
		}

		self.docs.insert(key, entry);
		Ok(())
	}

	/// Move every entry of `other` into this registry. Collisions are checked
	/// before anything is moved, so a failed merge leaves `self` untouched.
	pub fn merge(&mut self, other: DocumentationRegistry) -> DocResult<()> {
		let collision = other
			.sorted_entries()
			.into_iter()
			.find_map(|entry| self.docs.get(&entry.key()).map(|existing| (existing, entry)));

		if let Some((existing, entry)) = collision {
			return Err(duplicate(existing, entry));
		}

		self.docs.extend(other.docs);
		Ok(())
	}

	pub fn lookup(&self, package: &str, name: &str) -> Option<&DocumentationEntry> {
		self.docs.get(&DocKey::new(package, name))
	}

	/// Resolve a bare name the way a `doc('name')` reference does: the
	/// preferred package first, then any package in alphabetical order.
	pub fn find(&self, name: &str, preferred_package: Option<&str>) -> Option<&DocumentationEntry> {
		if let Some(entry) = preferred_package.and_then(|package| self.lookup(package, name)) {
			return Some(entry);
		}

		self.docs
			.values()
			.filter(|entry| entry.name == name)
			.min_by(|a, b| a.package_name.cmp(&b.package_name))
	}

	/// Every entry, in no particular order.
	pub fn all_entries(&self) -> impl Iterator<Item = &DocumentationEntry> {
		self.docs.values()
	}

	/// Every entry sorted by package, then name.
	pub fn sorted_entries(&self) -> Vec<&DocumentationEntry> {
		let mut entries: Vec<_> = self.docs.values().collect();
		entries.sort_by(|a, b| {
			(&a.package_name, &a.name).cmp(&(&b.package_name, &b.name))
		});
		entries
	}

	pub fn entries_for_package<'a>(
		&'a self,
		package: &'a str,
	) -> impl Iterator<Item = &'a DocumentationEntry> + 'a {
		self.docs
			.values()
			.filter(move |entry| entry.package_name == package)
	}
}

impl Serialize for DocumentationRegistry {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.sorted_entries())
	}
}

fn duplicate(existing: &DocumentationEntry, entry: &DocumentationEntry) -> DocError {
	DocError::DuplicateName {
		package: entry.package_name.clone(),
		name: entry.name.clone(),
		first: Box::new(existing.provenance.clone()),
		second: Box::new(entry.provenance.clone()),
	}
}
