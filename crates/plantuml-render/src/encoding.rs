//! PlantUML text encoding
//!
//! PlantUML servers accept diagram source embedded in a URL path. The source
//! is compressed with raw DEFLATE and the compressed bytes are written with a
//! base64-like alphabet that differs from RFC 4648:
//!
//! ```text
//!  0..=9   '0'..='9'
//! 10..=35  'A'..='Z'
//! 36..=61  'a'..='z'
//!      62  '-'
//!      63  '_'
//! ```
//!
//! Every group of three bytes becomes four characters. A short final group is
//! padded with zero bits, so the token length is always a multiple of four and
//! no padding character is ever emitted.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{RenderError, Result};

/// Encode diagram source into a token for `GET {server}/svg/{token}`
///
/// # Example
/// ```
/// use plantuml_render::encoding;
///
/// let token = encoding::encode("@startuml\nAlice -> Bob\n@enduml")?;
/// assert_eq!(token.len() % 4, 0);
/// assert_eq!(encoding::decode(&token)?, "@startuml\nAlice -> Bob\n@enduml");
/// # Ok::<(), plantuml_render::RenderError>(())
/// ```
pub fn encode(text: &str) -> Result<String> {
    let compressed = compress(text)?;
    Ok(encode_bytes(&compressed))
}

/// Compress UTF-8 text with raw DEFLATE (no zlib or gzip header) at the best level
pub fn compress(text: &str) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Write bytes with the PlantUML alphabet, four characters per three bytes
pub fn encode_bytes(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);

        out.push(encode_6bit(b1 >> 2));
        out.push(encode_6bit(((b1 & 0x3) << 4) | (b2 >> 4)));
        out.push(encode_6bit(((b2 & 0xF) << 2) | (b3 >> 6)));
        out.push(encode_6bit(b3 & 0x3F));
    }

    out
}

/// Map a 6-bit value to its character. Bits above the low six are ignored.
pub fn encode_6bit(value: u8) -> char {
    let value = value & 0x3F;
    match value {
        0..=9 => (b'0' + value) as char,
        10..=35 => (b'A' + (value - 10)) as char,
        36..=61 => (b'a' + (value - 36)) as char,
        62 => '-',
        _ => '_',
    }
}

/// Map a token character back to its 6-bit value
pub fn decode_6bit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(c as u8 - b'A' + 10),
        'a'..='z' => Some(c as u8 - b'a' + 36),
        '-' => Some(62),
        '_' => Some(63),
        _ => None,
    }
}

/// Reverse [`encode_bytes`]
///
/// Returns three bytes per four characters. When the encoded data was not a
/// multiple of three bytes long, the output keeps the zero bytes that padded
/// the final group.
pub fn decode_bytes(token: &str) -> Result<Vec<u8>> {
    let values = token
        .char_indices()
        .map(|(offset, c)| {
            decode_6bit(c).ok_or_else(|| {
                RenderError::InvalidToken(format!("unexpected character {c:?} at offset {offset}"))
            })
        })
        .collect::<Result<Vec<u8>>>()?;

    if values.len() % 4 != 0 {
        return Err(RenderError::InvalidToken(format!(
            "length {} is not a multiple of 4",
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(values.len() / 4 * 3);
    for quad in values.chunks_exact(4) {
        out.push((quad[0] << 2) | (quad[1] >> 4));
        out.push((quad[1] << 4) | (quad[2] >> 2));
        out.push((quad[2] << 6) | quad[3]);
    }

    Ok(out)
}

/// Decode a token back into diagram source
///
/// Zero padding after the final DEFLATE block is never read by the inflater.
pub fn decode(token: &str) -> Result<String> {
    let payload = decode_bytes(token)?;
    let mut text = String::new();
    DeflateDecoder::new(payload.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| RenderError::InvalidToken(e.to_string()))?;
    Ok(text)
}
