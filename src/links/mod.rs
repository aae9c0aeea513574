//! Outbound deep links: map embeds, map searches and messaging.

pub mod map;
pub mod messaging;

pub use map::{MapTarget, map_embed_url, project_map_link, resolve_map_target, unit_map_link};
pub use messaging::whatsapp_link;

/// Percent-encode with `encodeURIComponent` semantics: everything except
/// ASCII alphanumerics and `-_.!~*'()` is escaped as UTF-8 bytes.
pub fn encode_component(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Strict percent-decoding. `None` for a truncated or non-hex escape, or
/// when the decoded bytes are not UTF-8.
pub fn decode_component(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("it's (ok)!"), "it's%20(ok)!");
        assert_eq!(encode_component("الرياض"), "%D8%A7%D9%84%D8%B1%D9%8A%D8%A7%D8%B6");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("Al%20Nakheel").as_deref(), Some("Al Nakheel"));
        assert_eq!(
            decode_component("%D8%A7%D9%84%D8%B1%D9%8A%D8%A7%D8%B6").as_deref(),
            Some("الرياض")
        );
        assert_eq!(decode_component("100%"), None);
        assert_eq!(decode_component("%zz"), None);
        assert_eq!(decode_component("%FF"), None);
    }
}
