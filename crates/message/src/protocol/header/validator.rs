//! Grammar and injection checks for header names and values.
//!
//! Names must be RFC 7230 tokens. Values are scanned byte by byte: control
//! bytes other than horizontal tab are rejected, and CR/LF are only accepted as
//! an obs-fold continuation (`CRLF` followed by a space or tab). This keeps a
//! value such as `"value\r\ninjected: x"` from smuggling a second header line
//! onto the wire, while still admitting legitimately folded values.

use crate::ensure;
use crate::protocol::MessageError;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const SP: u8 = b' ';
const HTAB: u8 = b'\t';
const DEL: u8 = 0x7f;

/// Returns true if `b` is a `tchar` as defined by RFC 7230 section 3.2.6.
#[inline]
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' | b'-')
}

/// Returns true if `s` is a non-empty token.
#[inline]
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

pub fn validate_name(name: &str) -> Result<(), MessageError> {
    ensure!(is_token(name), MessageError::invalid_header_name(name));
    Ok(())
}

/// Scans a header value for forbidden bytes.
///
/// A CR is only accepted when it starts a `CRLF SP` or `CRLF HTAB` sequence,
/// in which case the whole three byte fold is skipped. A lone LF is a control
/// byte and is always rejected.
pub fn is_valid_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == CR {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(&LF), Some(&SP | &HTAB)) => {
                    i += 3;
                    continue;
                }
                _ => return false,
            }
        }

        if (b < SP && b != HTAB) || b == DEL {
            return false;
        }
        i += 1;
    }
    true
}

pub fn validate_value(value: &str) -> Result<(), MessageError> {
    ensure!(is_valid_value(value), MessageError::invalid_header_value(format!("{value:?} contains a forbidden control sequence")));
    Ok(())
}
