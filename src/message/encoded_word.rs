// https://tools.ietf.org/html/rfc2047

use std::fmt::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use email_encoding::headers::writer::EmailWriter;

use super::Charset;

/// Longest encoded word written for charsets other than `UTF-8`
///
/// Below the 75 characters allowed by RFC 2047, so that a word still fits
/// on the first line of a header after its name.
const MAX_WORD_LEN: usize = 64;

fn allowed_char(c: char) -> bool {
    matches!(u32::from(c), 1..=9 | 11 | 12 | 14..=127)
}

/// Returns true when `s` can go into a header as is
pub(crate) fn is_plain(s: &str) -> bool {
    s.chars().all(allowed_char)
}

/// Writes `s` as one or more `B` encoded words in `charset`
///
/// `UTF-8` goes through `email_encoding`. Other charsets are split into
/// words of at most [`MAX_WORD_LEN`] characters, folded between words.
pub(crate) fn encode(s: &str, charset: Charset, w: &mut EmailWriter<'_>) -> fmt::Result {
    if charset == Charset::utf_8() {
        return email_encoding::headers::rfc2047::encode(s, w);
    }

    let overhead = "=?".len() + charset.name().len() + "?B?".len() + "?=".len();
    let max_bytes = (MAX_WORD_LEN.saturating_sub(overhead) / 4 * 3).max(3);

    for (i, chunk) in split(s, charset, max_bytes).iter().enumerate() {
        if i > 0 {
            w.space();
        }
        let word = format!("=?{}?B?{}?=", charset.name(), STANDARD.encode(chunk));
        w.folding().write_str(&word)?;
    }

    Ok(())
}

/// Splits `s` on character boundaries into chunks of at most `max_bytes`
/// once encoded
fn split(s: &str, charset: Charset, max_bytes: usize) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for (i, c) in s.char_indices() {
        let next = i + c.len_utf8();
        if end > start && charset.encode(&s[start..next]).len() > max_bytes {
            chunks.push(charset.encode(&s[start..end]).into_owned());
            start = end;
        }
        end = next;
    }
    if end > start {
        chunks.push(charset.encode(&s[start..end]).into_owned());
    }

    chunks
}
