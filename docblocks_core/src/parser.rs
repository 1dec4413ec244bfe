use crate::DocError;
use crate::DocResult;
use crate::Document;
use crate::DocumentationEntry;
use crate::DocumentationRegistry;
use crate::extractor::extract;
use crate::scanner::scan;

/// Extract every docs block from `document` as a registry entry, in document
/// order. Scanner and extractor errors are wrapped with the document's path.
pub fn entries_from_document(document: &Document) -> DocResult<Vec<DocumentationEntry>> {
	let wrap = |source: DocError| DocError::Document {
		path: document.path().original_file_path().display().to_string(),
		source: Box::new(source),
	};

	let occurrences = scan(document.contents()).map_err(wrap)?;
	let blocks = extract(document.contents(), &occurrences).map_err(wrap)?;

	tracing::debug!(
		path = %document.path().original_file_path().display(),
		package = document.package_name(),
		tags = occurrences.len(),
		blocks = blocks.len(),
		"scanned document"
	);

	Ok(blocks
		.into_iter()
		.map(|block| DocumentationEntry::from_block(block, document))
		.collect())
}

/// Parse `document` into a registry of its own. This is the per-file partial
/// registry that gets merged into the project registry.
pub fn parse_document_to_registry(document: &Document) -> DocResult<DocumentationRegistry> {
	let mut registry = DocumentationRegistry::new();

	for entry in entries_from_document(document)? {
		registry.insert(entry)?;
	}

	Ok(registry)
}

/// Parse `document` and add its entries to `registry`. Either every entry of
/// the document is added or none is. Returns the number of entries added.
pub fn parse_document(document: &Document, registry: &mut DocumentationRegistry) -> DocResult<usize> {
	let partial = parse_document_to_registry(document)?;
	let count = partial.len();
	registry.merge(partial)?;

	Ok(count)
}
