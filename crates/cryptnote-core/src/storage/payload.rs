//! Plaintext framing of an entry before sealing.
//!
//! ```text
//! "TITLE:" <title> "\n--CONTENT--\n" <body lines joined by "\n">
//! ```
//!
//! Title and body travel in one authenticated blob. Payloads without the
//! framing (older or hand-made files) still read: the whole text becomes the
//! body and a title is synthesized from the entry id.

use super::types::EntryId;

pub const TITLE_MARKER: &str = "TITLE:";
pub const CONTENT_SEPARATOR: &str = "\n--CONTENT--\n";

/// Frame `title` and `body` into the plaintext that gets sealed.
///
/// Line breaks in the title are flattened to spaces so they cannot collide
/// with the separator.
pub fn encode(title: &str, body: &[String]) -> String {
    let title = title.replace(['\r', '\n'], " ");
    format!(
        "{}{}{}{}",
        TITLE_MARKER,
        title,
        CONTENT_SEPARATOR,
        body.join("\n")
    )
}

/// Split an opened payload back into title and body lines.
///
/// Never fails: invalid UTF-8 is decoded lossily and missing framing falls
/// back to a synthesized title.
pub fn decode(plaintext: &[u8], id: &EntryId) -> (String, Vec<String>) {
    let text = String::from_utf8_lossy(plaintext);

    match text.split_once(CONTENT_SEPARATOR) {
        Some((head, body)) if head.starts_with(TITLE_MARKER) => {
            let title = head[TITLE_MARKER.len()..].trim().to_string();
            (title, split_lines(body))
        }
        _ => (fallback_title(id), split_lines(&text)),
    }
}

pub fn fallback_title(id: &EntryId) -> String {
    format!("Entry: {}", id)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> EntryId {
        EntryId::parse("20261017_142501_384").unwrap()
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_matches_wire_format() {
        let payload = encode("T", &lines(&["hello", "world"]));
        assert_eq!(payload, "TITLE:T\n--CONTENT--\nhello\nworld");
    }

    #[test]
    fn test_decode_framed_payload() {
        let (title, body) = decode(b"TITLE:  My note \n--CONTENT--\nhello\n\nworld", &id());
        assert_eq!(title, "My note");
        assert_eq!(body, lines(&["hello", "", "world"]));
    }

    #[test]
    fn test_decode_keeps_separator_inside_body() {
        let payload = encode("T", &lines(&["a", "--CONTENT--", "b"]));
        let (title, body) = decode(payload.as_bytes(), &id());
        assert_eq!(title, "T");
        assert_eq!(body, lines(&["a", "--CONTENT--", "b"]));
    }

    #[test]
    fn test_decode_unframed_payload_falls_back() {
        let (title, body) = decode(b"just some\nlegacy text", &id());
        assert_eq!(title, "Entry: 20261017_142501_384");
        assert_eq!(body, lines(&["just some", "legacy text"]));
    }

    #[test]
    fn test_decode_separator_without_title_marker_falls_back() {
        let raw = b"Subject:x\n--CONTENT--\nbody";
        let (title, body) = decode(raw, &id());
        assert_eq!(title, fallback_title(&id()));
        assert_eq!(body, lines(&["Subject:x", "--CONTENT--", "body"]));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let (_, body) = decode(&[b'o', b'k', 0xFF], &id());
        assert_eq!(body.len(), 1);
        assert!(body[0].starts_with("ok"));
    }

    #[test]
    fn test_title_newlines_are_flattened() {
        let payload = encode("line one\nline two", &lines(&["body"]));
        let (title, body) = decode(payload.as_bytes(), &id());
        assert_eq!(title, "line one line two");
        assert_eq!(body, lines(&["body"]));
    }
}
