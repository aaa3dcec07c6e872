//! Character encoding detection and transcoding.
//!
//! Byte-input entry points go through here: the declared charset is sniffed
//! from the document head and the payload is transcoded to UTF-8 before
//! parsing. Undecodable sequences become U+FFFD.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// `<meta charset="...">` declaration.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("META_CHARSET regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">` declaration.
#[allow(clippy::expect_used)]
static META_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("META_CONTENT_TYPE regex")
});

/// Declared encoding of an HTML payload, defaulting to UTF-8. Only the
/// first 1024 bytes are examined; declarations past that point are ignored
/// by browsers too.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(1024)]);

    for pattern in [&*META_CHARSET, &*META_CONTENT_TYPE] {
        if let Some(label) = pattern.captures(&head).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Transcode an HTML payload to a UTF-8 string using its declared encoding.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
