//! Document loaders for PDF, plain text, and crawled web pages

use scraper::{ElementRef, Html};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::document::{Document, SOURCE_KEY};

/// Metadata key holding the sha-256 hex digest of the raw input
pub const CONTENT_HASH_KEY: &str = "content_hash";
/// Metadata key holding a PDF's page count
pub const PAGES_KEY: &str = "pages";

/// Extract text from a PDF and return a single document.
///
/// Page count is recorded in metadata when the file structure is readable;
/// extraction failures surface as parse errors.
pub fn load_pdf(data: &[u8]) -> Result<Vec<Document>> {
    let content = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::FileParse(format!("PDF extraction failed: {}", e)))?;

    let mut metadata = HashMap::new();
    metadata.insert(
        CONTENT_HASH_KEY.to_string(),
        serde_json::json!(content_hash(data)),
    );
    if let Ok(pdf) = lopdf::Document::load_mem(data) {
        metadata.insert(
            PAGES_KEY.to_string(),
            serde_json::json!(pdf.get_pages().len()),
        );
    }

    Ok(vec![Document::with_metadata(content, metadata)])
}

/// Decode a text file into a single document.
///
/// UTF-8 first; on decode failure every byte is mapped to its Latin-1
/// code point, which never fails.
pub fn load_text(data: &[u8]) -> Vec<Document> {
    let content = match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    };

    let mut metadata = HashMap::new();
    metadata.insert(
        CONTENT_HASH_KEY.to_string(),
        serde_json::json!(content_hash(data)),
    );

    vec![Document::with_metadata(content, metadata)]
}

/// Fetch a URL and convert the HTML body to plain text.
///
/// The loader owns the `source` metadata here (the fetched URL), so the
/// ingestion pipeline leaves it untouched.
pub async fn load_url(client: &reqwest::Client, url: &str) -> Result<Vec<Document>> {
    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;

    let content = html_to_text(&html);

    let mut metadata = HashMap::new();
    metadata.insert(SOURCE_KEY.to_string(), serde_json::json!(url));
    metadata.insert(
        CONTENT_HASH_KEY.to_string(),
        serde_json::json!(content_hash(html.as_bytes())),
    );

    Ok(vec![Document::with_metadata(content, metadata)])
}

/// Convert HTML markup to plain text, skipping non-content elements and
/// inserting line breaks after block-level elements.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);
    normalize_whitespace(&text)
}

fn collect_text(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if matches!(name, "script" | "style" | "noscript" | "head" | "template") {
        return;
    }

    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            collect_text(el, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }

    if is_block_element(name) {
        out.push('\n');
    }
}

fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "br"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "tr"
            | "table"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "blockquote"
            | "pre"
    )
}

/// Trim lines and collapse runs of blank lines to a single paragraph break
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
