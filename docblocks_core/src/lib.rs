//! `docblocks_core` extracts named documentation blocks from markdown files
//! that embed Jinja-style tags, and collects them into a registry keyed by
//! package and name.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown file
//!   → Document (contents, source path, package, checksum)
//!   → Scanner (finds `{% docs %}` / `{% enddocs %}` / `{% raw %}` / `{% endraw %}` tags, live or inert)
//!   → Extractor (pairs live docs tags into BlockMatches)
//!   → Registry (one DocumentationEntry per block, unique per package)
//! ```
//!
//! Text inside `{% raw %}` … `{% endraw %}` is never treated as tags, so a docs
//! block can document the tag syntax itself:
//!
//! ```text
//! {% docs tag_syntax %}
//! {% raw %}
//!     {% docs %}example{% enddocs %}
//! {% endraw %}
//! {% enddocs %}
//! ```
//!
//! ## Modules
//!
//! - [`config`]: configuration loading from `docblocks.toml`.
//! - [`project`]: directory walking, file loading, and per-file parsing merged
//!   into one registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use docblocks_core::Document;
//! use docblocks_core::DocumentationRegistry;
//! use docblocks_core::SourcePath;
//! use docblocks_core::parse_document;
//!
//! let document = Document::new(
//! 	SourcePath::new("/project", "/project/models", "docs.md"),
//! 	"my_package",
//! 	"{% docs orders %}\nOne row per order.\n{% enddocs %}",
//! );
//!
//! let mut registry = DocumentationRegistry::new();
//! parse_document(&document, &mut registry).unwrap();
//!
//! let entry = registry.lookup("my_package", "orders").unwrap();
//! assert_eq!(entry.block_contents, "One row per order.");
//! ```

pub use document::*;
pub use error::*;
pub use extractor::*;
pub use parser::*;
pub use position::*;
pub use registry::*;
pub use scanner::*;

pub mod config;
mod document;
#[allow(unused_assignments)]
mod error;
mod extractor;
mod parser;
mod position;
pub mod project;
mod registry;
mod scanner;

#[cfg(test)]
mod __fixtures;
