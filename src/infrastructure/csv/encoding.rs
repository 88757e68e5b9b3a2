use chardetng::EncodingDetector;
use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};

/// Decoded file content together with the encoding that produced it.
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode raw CSV bytes into a string.
///
/// UTF-8 is tried first so plain ASCII files are never mislabelled, then the
/// chardetng guess, then a fixed fallback chain (GBK, windows-1252). The
/// first encoding that decodes without replacement characters wins. A BOM,
/// when present, overrides everything (encoding_rs sniffs it) and is
/// stripped from the output.
pub fn decode(bytes: &[u8]) -> Option<DecodedText> {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);

    let mut candidates: Vec<&'static Encoding> = vec![UTF_8];
    for enc in [guess, GBK, WINDOWS_1252] {
        if !candidates.contains(&enc) {
            candidates.push(enc);
        }
    }

    for enc in candidates {
        let (text, used, had_errors) = enc.decode(bytes);
        if !had_errors {
            return Some(DecodedText {
                text: text.into_owned(),
                encoding: used.name(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_reports_utf8() {
        let d = decode(b"name,value\na,1\n").unwrap();
        assert_eq!(d.encoding, "UTF-8");
        assert_eq!(d.text, "name,value\na,1\n");
    }

    #[test]
    fn utf8_multibyte_is_preserved() {
        let d = decode("col\ncafé\n".as_bytes()).unwrap();
        assert_eq!(d.encoding, "UTF-8");
        assert!(d.text.contains("café"));
    }

    #[test]
    fn gbk_bytes_are_decoded() {
        let (bytes, _, _) = GBK.encode("名,值\n你好,1\n");
        let d = decode(&bytes).unwrap();
        assert_ne!(d.encoding, "UTF-8");
        assert!(d.text.contains("你好"));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"a,b\n1,2\n");
        let d = decode(&bytes).unwrap();
        assert_eq!(d.encoding, "UTF-8");
        assert!(d.text.starts_with("a,b"));
    }
}
