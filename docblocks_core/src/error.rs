use miette::Diagnostic;
use thiserror::Error;

use crate::Provenance;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocError {
	#[error(transparent)]
	#[diagnostic(code(docblocks::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed tag at {line}:{column}: {reason}")]
	#[diagnostic(
		code(docblocks::malformed_tag),
		help("documentation tags look like `{{% docs name %}}`, `{{% enddocs %}}`, `{{% raw %}}` and `{{% endraw %}}`")
	)]
	MalformedTag {
		reason: String,
		offset: usize,
		line: usize,
		column: usize,
	},

	#[error("missing `{{% enddocs %}}` for block `{name}` opened at {line}:{column}")]
	#[diagnostic(
		code(docblocks::unbalanced_block),
		help("add `{{% enddocs %}}` after the contents of `{name}`")
	)]
	UnbalancedBlock {
		name: String,
		offset: usize,
		line: usize,
		column: usize,
	},

	#[error("unexpected `{{% enddocs %}}` at {line}:{column} with no open docs block")]
	#[diagnostic(
		code(docblocks::unexpected_end_tag),
		help("remove the stray end tag or add the matching `{{% docs name %}}`")
	)]
	UnexpectedEndTag {
		offset: usize,
		line: usize,
		column: usize,
	},

	#[error("docs block `{name}` at {line}:{column} is nested inside block `{outer}`")]
	#[diagnostic(
		code(docblocks::nested_block),
		help("docs blocks cannot be nested; close `{outer}` with `{{% enddocs %}}` first")
	)]
	NestedBlock {
		name: String,
		outer: String,
		offset: usize,
		line: usize,
		column: usize,
	},

	#[error("duplicate documentation `{package}.{name}`: defined in `{first}` and `{second}`")]
	#[diagnostic(
		code(docblocks::duplicate_name),
		help("each docs block name must be unique within a package")
	)]
	DuplicateName {
		package: String,
		name: String,
		first: Box<Provenance>,
		second: Box<Provenance>,
	},

	#[error("failed to parse documentation file `{path}`")]
	#[diagnostic(code(docblocks::document))]
	Document {
		path: String,
		#[source]
		source: Box<DocError>,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docblocks::config_parse),
		help("check that docblocks.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(docblocks::file_too_large),
		help("increase `max_file_size` in docblocks.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(docblocks::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

impl DocError {
	/// The byte offset in the source document this error points at, if any.
	/// Errors wrapped with a document path report the offset of the inner
	/// error.
	pub fn offset(&self) -> Option<usize> {
		match self {
			Self::MalformedTag { offset, .. }
			| Self::UnbalancedBlock { offset, .. }
			| Self::UnexpectedEndTag { offset, .. }
			| Self::NestedBlock { offset, .. } => Some(*offset),
			Self::Document { source, .. } => source.offset(),
			_ => None,
		}
	}

	/// Strip the document wrapper, if present.
	pub fn inner(&self) -> &DocError {
		match self {
			Self::Document { source, .. } => source.inner(),
			other => other,
		}
	}
}

pub type DocResult<T> = Result<T, DocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
