//! EPUB metadata and text extraction.
//!
//! This module is intentionally small: it knows how to open an EPUB,
//! read the Dublin Core fields from its package document, walk the
//! spine collecting paragraph text, and stop once enough has been
//! gathered for a preview. Keeping it isolated makes it easy to swap
//! out or enhance parsing later (e.g., pulling more than `<p>` elements
//! or lifting the preview cap).

use anyhow::{Context, Result};
use epub::doc::{DocError, EpubDoc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reported in place of metadata and text when the container cannot be
/// opened as a zip archive.
pub const CORRUPTED_EPUB_MESSAGE: &str =
    "Error: The file is not a valid EPUB file or is corrupted.";

/// Preview cap, counted in UTF-8 bytes while accumulating.
const TEXT_LIMIT: usize = 50 * 1024;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Read an EPUB and return its metadata plus the opening paragraph text.
///
/// The metadata maps each Dublin Core field to its last declared value.
/// A container that cannot be opened as a zip archive comes back as
/// `(None, message)` rather than an error; every other parse failure
/// propagates.
pub fn extract_epub_data(path: &Path) -> Result<(Option<HashMap<String, String>>, String)> {
    info!(path = %path.display(), "Opening EPUB container");
    let mut doc = match EpubDoc::new(path) {
        Ok(doc) => doc,
        Err(DocError::ArchiveError(err)) => {
            warn!(path = %path.display(), "Not a readable zip archive: {err}");
            return Ok((None, CORRUPTED_EPUB_MESSAGE.to_string()));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to parse EPUB at {}", path.display()));
        }
    };

    let mut metadata = HashMap::new();
    for item in &doc.metadata {
        metadata.insert(item.property.clone(), item.value.clone());
    }

    let mut text = String::new();
    let mut text_size = 0usize;
    let mut documents = 0usize;

    loop {
        if text_size >= TEXT_LIMIT {
            break;
        }
        match doc.get_current_str() {
            Some((content, _mime)) => {
                documents += 1;
                let before = text_size;
                append_paragraphs(&content, &mut text, &mut text_size);
                debug!(
                    document = documents,
                    added_bytes = text_size - before,
                    "Collected paragraph text"
                );
            }
            None => break,
        }
        if !doc.go_next() {
            break;
        }
    }

    truncate_chars(&mut text, TEXT_LIMIT);
    info!(
        documents,
        fields = metadata.len(),
        total_bytes = text.len(),
        "Finished extracting EPUB"
    );
    Ok((Some(metadata), text))
}

/// Append each non-empty `<p>` text from one content document, plus a
/// blank line. The budget check runs before a paragraph is added, so
/// the last paragraph kept may push the total past the cap.
fn append_paragraphs(content: &str, text: &mut String, text_size: &mut usize) {
    let document = Html::parse_document(content);
    for paragraph in document.select(&PARAGRAPH) {
        if *text_size >= TEXT_LIMIT {
            break;
        }
        let joined = paragraph
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            continue;
        }
        text.push_str(&joined);
        text.push_str("\n\n");
        *text_size += joined.len() + 2;
    }
}

/// Truncate to at most `limit` characters. Characters, not bytes: the
/// accumulation budget counts bytes, and the two differ in multi-byte
/// text.
fn truncate_chars(text: &mut String, limit: usize) {
    if let Some((idx, _)) = text.char_indices().nth(limit) {
        text.truncate(idx);
    }
}
