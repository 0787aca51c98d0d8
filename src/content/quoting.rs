//! Git's path quoting, read back for display.
//!
//! With `core.quotePath` at its default, git wraps a path in double quotes
//! when it contains a control character, a double quote, a backslash or a
//! byte outside printable ASCII, and escapes inside the quotes:
//!
//! ```text
//! quoted  = '"' *( plain / escape ) '"'
//! escape  = '\' ( '"' / '\' / control / octal )
//! control = 'a' / 'b' / 't' / 'n' / 'v' / 'f' / 'r'
//! octal   = 3( '0'-'7' )            ; one raw byte
//! ```
//!
//! The display form drops the quotes, resolves `\"`, `\\` and octal bytes,
//! and keeps control escapes as their visible two-character sequence so a
//! tab in a file name shows up as `\t` rather than as whitespace.

/// Whether `raw` is a quoted path as emitted by git.
pub fn is_quoted(raw: &str) -> bool {
    raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"')
}

/// Display form of a path field. Unquoted input is returned unchanged.
pub fn display_path(raw: &str) -> String {
    if is_quoted(raw) {
        unescape(&raw[1..raw.len() - 1])
    } else {
        raw.to_string()
    }
}

fn unescape(inner: &str) -> String {
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 >= bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }

        let next = bytes[i + 1];
        match next {
            b'"' | b'\\' => {
                out.push(next);
                i += 2;
            }
            b'a' | b'b' | b't' | b'n' | b'v' | b'f' | b'r' => {
                out.extend_from_slice(&[b'\\', next]);
                i += 2;
            }
            b'0'..=b'3' if is_octal_triplet(&bytes[i + 1..]) => {
                let value = (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
                out.push(value);
                i += 4;
            }
            _ => {
                out.extend_from_slice(&[b'\\', next]);
                i += 2;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_triplet(bytes: &[u8]) -> bool {
    bytes.len() >= 3 && bytes[..3].iter().all(|b| (b'0'..=b'7').contains(b))
}
