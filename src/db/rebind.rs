//! Placeholder rebinding.
//!
//! Statements are written with `?` placeholders and rewritten into the
//! target dialect's syntax. Quoted literals, quoted identifiers and comments
//! are copied through untouched, including PostgreSQL dollar-quoted bodies
//! (`$$ .. $$`, `$tag$ .. $tag$`) and `E'..'` strings with backslash escapes.
//!
//! Plain `'..'` strings only treat `''` as an escape. MySQL's backslash
//! escapes in ordinary strings (`'it\'s'`) are not recognised.

use crate::db::dialect::BindStyle;

/// Rewrite `?` placeholders into `style`.
pub fn rebind(style: BindStyle, sql: &str) -> String {
    if style == BindStyle::Question {
        return sql.to_string();
    }

    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = skip_literal(bytes, i) {
            i = end;
            continue;
        }
        if bytes[i] == b'?' {
            out.push_str(&sql[last..i]);
            index += 1;
            style.write_placeholder(&mut out, index);
            i += 1;
            last = i;
            continue;
        }
        i += 1;
    }

    out.push_str(&sql[last..]);
    out
}

/// If a quoted section or comment starts at `i`, return the index just past
/// its end (or the input length if unterminated).
///
/// Every delimiter is ASCII, so returned indices are always char boundaries.
pub(crate) fn skip_literal(bytes: &[u8], i: usize) -> Option<usize> {
    let find_from = |start: usize, needle: &[u8]| -> usize {
        bytes[start.min(bytes.len())..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map_or(bytes.len(), |p| start + p + needle.len())
    };

    match bytes[i] {
        b'E' | b'e' if bytes.get(i + 1) == Some(&b'\'') && !follows_word(bytes, i) => {
            Some(skip_escaped_string(bytes, i + 2))
        }
        b'$' => dollar_tag_end(bytes, i).map(|open_end| find_from(open_end, &bytes[i..open_end])),
        q @ (b'\'' | b'"' | b'`') => Some(find_from(i + 1, &[q])),
        b'-' if bytes.get(i + 1) == Some(&b'-') => Some(find_from(i + 2, b"\n")),
        b'/' if bytes.get(i + 1) == Some(&b'*') => Some(find_from(i + 2, b"*/")),
        _ => None,
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn follows_word(bytes: &[u8], i: usize) -> bool {
    i > 0 && (is_word_byte(bytes[i - 1]) || bytes[i - 1] == b'$')
}

/// End of a `$$` or `$tag$` opener at `i`. Tags cannot start with a digit,
/// so `$1` placeholders are never mistaken for one.
fn dollar_tag_end(bytes: &[u8], i: usize) -> Option<usize> {
    if follows_word(bytes, i) {
        return None;
    }
    let mut j = i + 1;
    if bytes.get(j).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_') {
        while bytes.get(j).is_some_and(|b| is_word_byte(*b)) {
            j += 1;
        }
    }
    (bytes.get(j) == Some(&b'$')).then_some(j + 1)
}

/// Skip the body of an `E'..'` string starting just after the opening quote.
fn skip_escaped_string(bytes: &[u8], mut k: usize) -> usize {
    while k < bytes.len() {
        match bytes[k] {
            b'\\' => k += 2,
            b'\'' if bytes.get(k + 1) == Some(&b'\'') => k += 2,
            b'\'' => return k + 1,
            _ => k += 1,
        }
    }
    bytes.len()
}
