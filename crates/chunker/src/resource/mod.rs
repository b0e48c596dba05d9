// ABOUTME: Reading input documents: HTML file discovery and byte-to-text decoding.
// ABOUTME: Decodes with the BOM or a <meta> charset declaration when present, else chardetng detection.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::error::{ChunkError, Result};

/// How far into a document to look for a charset declaration.
const META_PRESCAN_BYTES: usize = 1024;

/// File extensions treated as HTML.
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

static META_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap());

/// Decode document bytes to a String.
pub fn decode_html(body: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(body) {
        let (decoded, _, _) = encoding.decode(&body[bom_len..]);
        return decoded.into_owned();
    }

    if let Some(charset) = extract_meta_charset(body) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(body);
            return decoded.into_owned();
        }
    }

    // Use chardetng for detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Charset named by a `<meta charset>` or `<meta http-equiv content="...; charset=">` tag.
fn extract_meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_PRESCAN_BYTES)];
    let caps = META_CHARSET_RE.captures(head)?;
    let charset = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
    Some(charset.to_ascii_lowercase())
}

/// Read and decode an HTML file.
pub fn read_html_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        ChunkError::io(
            format!("read {}", path.display()),
            Some(anyhow::Error::new(e)),
        )
    })?;
    Ok(decode_html(&bytes))
}

/// Returns true if the path has an HTML extension.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// The HTML files named by `input`: the file itself, or every HTML file below a directory.
pub fn collect_html_files(input: &Path) -> Result<Vec<PathBuf>> {
    let op = format!("collect {}", input.display());
    if input.is_file() {
        if !is_html_file(input) {
            return Err(ChunkError::invalid_options(
                op,
                Some(anyhow::anyhow!("not an HTML file")),
            ));
        }
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(ChunkError::io(
            op,
            Some(anyhow::anyhow!("input path does not exist")),
        ));
    }

    let base = glob::Pattern::escape(&input.to_string_lossy());
    let mut files = Vec::new();
    for ext in HTML_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", base, ext);
        let paths = glob::glob(&pattern)
            .map_err(|e| ChunkError::io(op.clone(), Some(anyhow::Error::new(e))))?;
        for entry in paths {
            let path = entry.map_err(|e| ChunkError::io(op.clone(), Some(anyhow::Error::new(e))))?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
