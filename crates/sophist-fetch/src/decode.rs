//! Page body decoding.

use encoding_rs::Encoding;

/// Decodes a page body into a string.
///
/// A byte order mark overrides `encoding`. Invalid sequences are replaced
/// with U+FFFD rather than failing the page.
#[must_use]
pub fn decode_page(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(encoding = used.name(), "page contains invalid byte sequences");
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1251};

    #[test]
    fn test_windows_1251() {
        let (bytes, _, _) = WINDOWS_1251.encode("Индекс 85,4");
        assert_eq!(decode_page(&bytes, WINDOWS_1251), "Индекс 85,4");
    }

    #[test]
    fn test_bom_overrides_encoding() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("доход".as_bytes());
        assert_eq!(decode_page(&bytes, WINDOWS_1251), "доход");
    }

    #[test]
    fn test_invalid_sequences_are_replaced() {
        assert_eq!(decode_page(&[0x41, 0xFF], UTF_8), "A\u{FFFD}");
    }
}
