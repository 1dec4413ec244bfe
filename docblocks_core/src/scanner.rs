use std::fmt::Display;
use std::ops::Range;

use logos::Logos;

use crate::DocError;
use crate::DocResult;
use crate::Position;
use crate::position::LineTable;

/// Raw tokens produced by logos. Everything that is not one of these is
/// reported as a lexer error and treated as ordinary text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[token("{%")]
	#[token("{%-")]
	#[token("{%+")]
	TagOpen,
	#[token("%}")]
	#[token("-%}")]
	#[token("+%}")]
	TagClose,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Ident,
	#[regex(r"[ \t\r\n]+")]
	Whitespace,
}

/// The four tags the scanner acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
	/// `{% docs name %}`
	BlockStart,
	/// `{% enddocs %}`
	BlockEnd,
	/// `{% raw %}`
	EscapeStart,
	/// `{% endraw %}`
	EscapeEnd,
}

impl TagKind {
	fn from_keyword(keyword: &str) -> Option<Self> {
		match keyword {
			"docs" => Some(Self::BlockStart),
			"enddocs" => Some(Self::BlockEnd),
			"raw" => Some(Self::EscapeStart),
			"endraw" => Some(Self::EscapeEnd),
			_ => None,
		}
	}

	pub fn keyword(self) -> &'static str {
		match self {
			Self::BlockStart => "docs",
			Self::BlockEnd => "enddocs",
			Self::EscapeStart => "raw",
			Self::EscapeEnd => "endraw",
		}
	}
}

impl Display for TagKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BlockStart => write!(f, "block_start"),
			Self::BlockEnd => write!(f, "block_end"),
			Self::EscapeStart => write!(f, "escape_start"),
			Self::EscapeEnd => write!(f, "escape_end"),
		}
	}
}

/// Whether a tag occurrence should be acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagState {
	/// A real delimiter.
	Live,
	/// Tag-like text inside a raw region (or a stray `{% endraw %}`). It is
	/// literal text and never acted upon.
	Inert,
}

impl Display for TagState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Live => write!(f, "live"),
			Self::Inert => write!(f, "inert"),
		}
	}
}

/// One recognized tag in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
	pub kind: TagKind,
	pub state: TagState,
	/// The block name. Only set for live block-start tags.
	pub name: Option<String>,
	/// Byte range of the whole tag, `{%` through `%}`.
	pub span: Range<usize>,
	pub position: Position,
}

impl TagOccurrence {
	pub fn is_live(&self) -> bool {
		self.state == TagState::Live
	}
}

/// A `{% ... %}` tag whose closing delimiter has been seen, before it is
/// classified.
struct PendingTag<'a> {
	start: usize,
	words: Vec<&'a str>,
	/// Offset of the first character that is neither whitespace nor an
	/// identifier.
	stray: Option<usize>,
	/// A stray character appeared before the keyword.
	leading_stray: bool,
}

enum ScanContext<'a> {
	/// Ordinary text.
	Outside,
	/// Between `{%` and `%}`.
	Tag(PendingTag<'a>),
}

/// Walks the logos token stream, assembling tags and tracking how deeply the
/// cursor is nested inside raw regions.
struct TagWalker<'a> {
	source: &'a str,
	lines: LineTable,
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	cursor: usize,
	context: ScanContext<'a>,
	escape_depth: usize,
	/// Start offset of the outermost open raw region.
	escape_opened_at: Option<usize>,
	occurrences: Vec<TagOccurrence>,
}

impl<'a> TagWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			lines: LineTable::new(source),
			raw_tokens,
			cursor: 0,
			context: ScanContext::Outside,
			escape_depth: 0,
			escape_opened_at: None,
			occurrences: vec![],
		}
	}

	fn process(mut self) -> DocResult<Vec<TagOccurrence>> {
		let source = self.source;

		while self.cursor < self.raw_tokens.len() {
			let (result, span) = self.raw_tokens[self.cursor].clone();
			self.cursor += 1;

			match result {
				// A second `{%` before `%}` means the first one was plain text.
				Ok(RawToken::TagOpen) => self.open_tag(span.start),
				Ok(RawToken::TagClose) => {
					if let ScanContext::Tag(pending) =
						std::mem::replace(&mut self.context, ScanContext::Outside)
					{
						self.close_tag(&pending, span.end)?;
					}
				}
				Ok(RawToken::Ident) => {
					if let ScanContext::Tag(pending) = &mut self.context {
						pending.words.push(&source[span]);
					}
				}
				Ok(RawToken::Whitespace) => {}
				Err(()) => {
					if let ScanContext::Tag(pending) = &mut self.context {
						if pending.words.is_empty() {
							pending.leading_stray = true;
						}
						pending.stray.get_or_insert(span.start);
					}
				}
			}
		}

		if let Some(opened_at) = self.escape_opened_at {
			let point = self.lines.point(opened_at);
			tracing::warn!(
				line = point.line,
				column = point.column,
				"raw region is never closed; the rest of the document is literal text"
			);
		}

		Ok(self.occurrences)
	}

	fn open_tag(&mut self, start: usize) {
		self.context = ScanContext::Tag(PendingTag {
			start,
			words: vec![],
			stray: None,
			leading_stray: false,
		});
	}

	fn close_tag(&mut self, pending: &PendingTag<'a>, end: usize) -> DocResult<()> {
		let span = pending.start..end;

		// A tag that starts with a stray character is someone else's syntax.
		let Some(keyword) = pending.words.first().copied() else {
			return Ok(());
		};
		if pending.leading_stray {
			return Ok(());
		}

		let Some(kind) = TagKind::from_keyword(keyword) else {
			tracing::trace!(keyword, offset = span.start, "ignoring unrecognized tag");
			return Ok(());
		};

		let validated = validate_tag(kind, &pending.words[1..], pending.stray);

		let (state, name) = match kind {
			TagKind::EscapeStart => {
				match validated {
					Ok(_) => {
						let state = if self.escape_depth == 0 {
							self.escape_opened_at = Some(span.start);
							TagState::Live
						} else {
							TagState::Inert
						};
						self.escape_depth += 1;
						(state, None)
					}
					Err(reason) if self.escape_depth == 0 => {
						return Err(self.malformed(reason, pending.stray.unwrap_or(span.start)));
					}
					Err(_) => (TagState::Inert, None),
				}
			}
			TagKind::EscapeEnd => {
				if self.escape_depth == 0 || validated.is_err() {
					(TagState::Inert, None)
				} else {
					self.escape_depth -= 1;
					if self.escape_depth == 0 {
						self.escape_opened_at = None;
						(TagState::Live, None)
					} else {
						(TagState::Inert, None)
					}
				}
			}
			TagKind::BlockStart | TagKind::BlockEnd => {
				if self.escape_depth > 0 {
					(TagState::Inert, None)
				} else {
					match validated {
						Ok(name) => (TagState::Live, name),
						Err(reason) => {
							return Err(self.malformed(reason, pending.stray.unwrap_or(span.start)));
						}
					}
				}
			}
		};

		tracing::trace!(%kind, %state, offset = span.start, "classified tag");

		self.occurrences.push(TagOccurrence {
			kind,
			state,
			name,
			position: self.lines.position(&span),
			span,
		});

		Ok(())
	}

	fn malformed(&self, reason: String, offset: usize) -> DocError {
		let point = self.lines.point(offset);
		DocError::MalformedTag {
			reason,
			offset,
			line: point.line,
			column: point.column,
		}
	}
}

/// Check the arguments of a recognized tag. Returns the block name for a
/// well-formed block-start tag.
fn validate_tag(
	kind: TagKind,
	arguments: &[&str],
	stray: Option<usize>,
) -> Result<Option<String>, String> {
	let keyword = kind.keyword();

	match kind {
		TagKind::BlockStart => {
			if stray.is_some() {
				return Err(format!(
					"`{keyword}` expects a name made of letters, digits and underscores"
				));
			}

			match arguments {
				[name] => Ok(Some((*name).to_string())),
				[] => Err(format!("`{keyword}` is missing a block name")),
				_ => Err(format!("`{keyword}` expects a single block name")),
			}
		}
		TagKind::BlockEnd | TagKind::EscapeStart | TagKind::EscapeEnd => {
			if stray.is_some() || !arguments.is_empty() {
				Err(format!("`{keyword}` does not take arguments"))
			} else {
				Ok(None)
			}
		}
	}
}

/// Scan `source` for docs and raw tags, returning every occurrence in document
/// order together with its live/inert classification.
pub fn scan(source: &str) -> DocResult<Vec<TagOccurrence>> {
	TagWalker::new(source).process()
}
