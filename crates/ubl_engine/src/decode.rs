use encoding_rs::{Encoding, UTF_8};
use ubl_logging::ubl_warn;

/// Decode a downloaded body into text.
///
/// Encoding is chosen by BOM, then by the Content-Type charset, then UTF-8.
/// Malformed sequences become U+FFFD and are reported once.
pub fn decode_payload(bytes: &[u8], content_type: Option<&str>) -> String {
    let fallback = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, encoding, had_errors) = fallback.decode(bytes);
    if had_errors {
        ubl_warn!(
            "Banlist payload contained bytes that are not valid {}; they were replaced",
            encoding.name()
        );
    }
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']).to_string())
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_utf8() {
        assert_eq!(decode_payload("v1\nnaïve".as_bytes(), None), "v1\nnaïve");
    }

    #[test]
    fn honours_content_type_charset() {
        let latin1 = [b'v', b'1', b'\n', 0xE9];
        let text = decode_payload(&latin1, Some("text/plain; Charset=\"ISO-8859-1\""));
        assert_eq!(text, "v1\né");
    }

    #[test]
    fn bom_wins_over_header() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("h\né".as_bytes());
        assert_eq!(decode_payload(&bytes, Some("text/plain; charset=latin1")), "h\né");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_payload(&[b'h', 0xFF], None), "h\u{FFFD}");
    }
}
