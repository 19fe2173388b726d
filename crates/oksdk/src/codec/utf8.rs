//! The byte transform the platform applies before hashing a signature base.
//!
//! It works on UTF-16 code units rather than scalar values: every unit below
//! 0x80 takes one byte, below 0x800 two bytes, anything else three bytes.
//! Characters outside the BMP therefore come out as two three-byte surrogate
//! encodings (CESU-8) instead of one four-byte UTF-8 sequence. Server-side
//! verification depends on these exact bytes, so do not replace this with
//! `str::as_bytes`.

pub fn encode_utf8_legacy(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        let c = u32::from(unit);
        if c < 0x80 {
            out.push(c as u8);
        } else if c < 0x800 {
            out.push(((c >> 6) | 0xC0) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        } else {
            out.push(((c >> 12) | 0xE0) as u8);
            out.push((((c >> 6) & 0x3F) | 0x80) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        }
    }
    out
}

/// Inverse of [`encode_utf8_legacy`].
///
/// Truncated sequences read missing continuation bytes as zero; unpaired
/// surrogates become U+FFFD.
pub fn decode_utf8_legacy(bytes: &[u8]) -> String {
    let byte = |i: usize| u16::from(bytes.get(i).copied().unwrap_or(0));
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = byte(i);
        if c < 0x80 {
            units.push(c);
            i += 1;
        } else if c > 0xBF && c < 0xE0 {
            units.push(((c & 0x1F) << 6) | (byte(i + 1) & 0x3F));
            i += 2;
        } else {
            units.push(((c & 0x0F) << 12) | ((byte(i + 1) & 0x3F) << 6) | (byte(i + 2) & 0x3F));
            i += 3;
        }
    }
    String::from_utf16_lossy(&units)
}
