//! Legacy percent escaping for serialized map text.
//!
//! Matches the browser `escape()`/`unescape()` pair: ASCII alphanumerics and
//! `@*_+-./` are kept, other UTF-16 code units become `%XX` or `%uXXXX`.
//! Space, `=` and `%` are always escaped, so they can act as separators.

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'*' | b'+' | b'-' | b'.' | b'/' | b'@' | b'_')
}

fn hex_digit(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
        b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
        _ => None,
    }
}

fn push_hex(out: &mut String, nibble: u16) {
    out.push(char::from(HEX_UPPER[usize::from(nibble & 0x0F)]));
}

/// Escape `src` so that it contains no separators or whitespace.
pub fn escape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for unit in src.encode_utf16() {
        if unit <= 0x7F && is_unreserved(unit as u8) {
            out.push(char::from(unit as u8));
        } else if unit <= 0xFF {
            out.push('%');
            push_hex(&mut out, unit >> 4);
            push_hex(&mut out, unit);
        } else {
            out.push_str("%u");
            push_hex(&mut out, unit >> 12);
            push_hex(&mut out, unit >> 8);
            push_hex(&mut out, unit >> 4);
            push_hex(&mut out, unit);
        }
    }
    out
}

/// Reverse [`escape`]. Malformed `%` sequences are kept literally.
pub fn unescape(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut units: Vec<u16> = Vec::with_capacity(src.len());
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(unit) = decode_wide(&bytes[i + 1..]) {
                units.push(unit);
                i += 6;
                continue;
            }
            if let Some(unit) = decode_narrow(&bytes[i + 1..]) {
                units.push(unit);
                i += 3;
                continue;
            }
        }

        let ch = src[i..].chars().next().unwrap_or_default();
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
        i += ch.len_utf8();
    }

    String::from_utf16_lossy(&units)
}

// `uXXXX` following a percent sign
fn decode_wide(rest: &[u8]) -> Option<u16> {
    match rest {
        [b'u', a, b, c, d, ..] => {
            Some(hex_digit(*a)? << 12 | hex_digit(*b)? << 8 | hex_digit(*c)? << 4 | hex_digit(*d)?)
        }
        _ => None,
    }
}

// `XX` following a percent sign
fn decode_narrow(rest: &[u8]) -> Option<u16> {
    match rest {
        [a, b, ..] => Some(hex_digit(*a)? << 4 | hex_digit(*b)?),
        _ => None,
    }
}
