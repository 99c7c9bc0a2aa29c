// Unitex text files: UTF-16LE with a byte-order mark, or UTF-8.

use std::fs;
use std::path::Path;

use crate::CoreError;

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encoding detected when reading a text file, reused when writing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-16 little endian preceded by `FF FE` (the native Unitex format).
    #[default]
    Utf16Le,
    /// UTF-8, with or without a leading BOM. Written back without a BOM.
    Utf8,
}

/// Decode the raw content of a Unitex text file.
///
/// A `FF FE` prefix selects UTF-16LE; anything else is read as UTF-8
/// (an optional UTF-8 BOM is skipped).
pub fn decode_text(bytes: &[u8]) -> Result<(String, Encoding), CoreError> {
    if let Some(body) = bytes.strip_prefix(&UTF16LE_BOM) {
        if body.len() % 2 != 0 {
            return Err(CoreError::OddLength(body.len()));
        }
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        return Ok((String::from_utf16(&units)?, Encoding::Utf16Le));
    }
    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    Ok((String::from_utf8(body.to_vec())?, Encoding::Utf8))
}

/// Encode `text` for writing, prefixed with the BOM of `encoding` if it has one.
pub fn encode_text(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf16Le => {
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            out.extend_from_slice(&UTF16LE_BOM);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        }
        Encoding::Utf8 => text.as_bytes().to_vec(),
    }
}

/// Read and decode a whole text file.
pub fn read_text(path: impl AsRef<Path>) -> Result<(String, Encoding), CoreError> {
    let bytes = fs::read(path)?;
    decode_text(&bytes)
}
