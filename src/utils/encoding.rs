//! Text decoding with BOM detection, UTF-8 fast path and charset sniffing.
//!
//! Fetched blobs and local files arrive as raw bytes. This module decides
//! whether they are text at all and, if so, how to decode them:
//! - BOM markers (UTF-8, UTF-16 LE/BE) win outright
//! - strict UTF-8 is tried next, since most source files are UTF-8
//! - anything else goes through chardetng

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Pick the encoding for `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// Heuristic binary check over the first few KiB.
///
/// Null bytes mark binary outright. Valid UTF-8 is text. Otherwise fewer than
/// 70% printable ASCII bytes means binary.
pub fn is_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }
    if Encoding::for_bom(sample).is_some_and(|(enc, _)| enc != UTF_8) {
        // UTF-16 text is full of zero bytes.
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return false;
    }

    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13)
        .count();
    (printable as f64 / sample.len() as f64) < 0.70
}

/// Decode `bytes` as text, or `None` when they look binary.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    if is_binary(bytes) {
        return None;
    }
    let encoding = detect_encoding(bytes);
    let (decoded, _used, _had_errors) = encoding.decode(bytes);
    Some(decoded.into_owned())
}

/// Read a file from disk as text. `Ok(None)` means the file looks binary.
pub fn read_text_file(path: &Path) -> Result<Option<String>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(decode_text(&bytes))
}
