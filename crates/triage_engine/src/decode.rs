use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use triage_logging::triage_debug;

/// Decode a response body to text using: BOM -> JSON is UTF-8 -> Content-Type
/// charset -> chardetng fallback.
///
/// Malformed sequences become U+FFFD, the way a browser renders them.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if content_type.is_some_and(is_json) {
        return decode_with(bytes, UTF_8);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or(content_type).trim();
    mime.eq_ignore_ascii_case("application/json")
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()))
        })
        .next()
        .map(|s| s.to_string())
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> String {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        triage_debug!(
            "Body of {} bytes had malformed {} sequences; replaced",
            bytes.len(),
            enc.name()
        );
    }
    text.into_owned()
}
