use std::ops::Range;

use crate::DocError;
use crate::DocResult;
use crate::Position;
use crate::scanner::TagKind;
use crate::scanner::TagOccurrence;
use crate::scanner::scan;

/// A docs block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
	/// The identifier from `{% docs name %}`.
	pub name: String,
	/// The interior with raw delimiters unwrapped and surrounding whitespace
	/// trimmed. Text inside raw regions is kept exactly as written.
	pub contents: String,
	/// The exact source text between the start and end tags.
	pub raw_contents: String,
	/// Byte range from the start of `{% docs %}` to the end of `{% enddocs %}`.
	pub span: Range<usize>,
	/// Position of the `{% docs name %}` tag.
	pub opening: Position,
	/// Position of the `{% enddocs %}` tag.
	pub closing: Position,
}

impl BlockMatch {
	/// Byte range of the interior, between the two tags.
	pub fn interior(&self) -> Range<usize> {
		self.opening.end.offset..self.closing.start.offset
	}
}

struct OpenBlock<'a> {
	name: &'a str,
	tag: &'a TagOccurrence,
	/// Live raw delimiters seen since the block opened.
	escapes: Vec<&'a TagOccurrence>,
}

/// Pair the live block tags in `occurrences` into [`BlockMatch`]es. Inert
/// occurrences are ignored.
pub fn extract(source: &str, occurrences: &[TagOccurrence]) -> DocResult<Vec<BlockMatch>> {
	let mut open: Option<OpenBlock<'_>> = None;
	let mut blocks = vec![];

	for occurrence in occurrences.iter().filter(|occurrence| occurrence.is_live()) {
		match occurrence.kind {
			TagKind::BlockStart => {
				let name = occurrence.name.as_deref().unwrap_or_default();

				if let Some(outer) = &open {
					return Err(DocError::NestedBlock {
						name: name.to_string(),
						outer: outer.name.to_string(),
						offset: occurrence.span.start,
						line: occurrence.position.start.line,
						column: occurrence.position.start.column,
					});
				}

				open = Some(OpenBlock {
					name,
					tag: occurrence,
					escapes: vec![],
				});
			}
			TagKind::BlockEnd => {
				let Some(block) = open.take() else {
					return Err(DocError::UnexpectedEndTag {
						offset: occurrence.span.start,
						line: occurrence.position.start.line,
						column: occurrence.position.start.column,
					});
				};

				let block = build_match(source, &block, occurrence);
				tracing::debug!(name = %block.name, line = block.opening.start.line, "extracted docs block");
				blocks.push(block);
			}
			TagKind::EscapeStart | TagKind::EscapeEnd => {
				if let Some(block) = &mut open {
					block.escapes.push(occurrence);
				}
			}
		}
	}

	if let Some(block) = open {
		return Err(DocError::UnbalancedBlock {
			name: block.name.to_string(),
			offset: block.tag.span.start,
			line: block.tag.position.start.line,
			column: block.tag.position.start.column,
		});
	}

	Ok(blocks)
}

fn build_match(source: &str, block: &OpenBlock<'_>, end: &TagOccurrence) -> BlockMatch {
	let interior = block.tag.span.end..end.span.start;
	let mut contents = String::with_capacity(interior.len());
	let mut cursor = interior.start;

	for escape in &block.escapes {
		contents.push_str(&source[cursor..escape.span.start]);
		cursor = escape.span.end;
	}
	contents.push_str(&source[cursor..interior.end]);

	BlockMatch {
		name: block.name.to_string(),
		contents: contents.trim().to_string(),
		raw_contents: source[interior].to_string(),
		span: block.tag.span.start..end.span.end,
		opening: block.tag.position,
		closing: end.position,
	}
}

/// Scan and extract in one step.
pub fn extract_blocks(source: &str) -> DocResult<Vec<BlockMatch>> {
	let occurrences = scan(source)?;
	extract(source, &occurrences)
}
