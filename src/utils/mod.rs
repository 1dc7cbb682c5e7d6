//! Path and text helpers.

use chardetng::EncodingDetector;
use encoding_rs::UTF_8;

/// Convert backslashes to forward slashes so paths match blob paths.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Decode raw file bytes as text.
///
/// Strategy:
/// 1. BOM-aware UTF-8 first; `decode` strips the BOM and switches
///    encodings itself when the BOM says UTF-16
/// 2. chardetng detection, decoding with replacement characters
pub fn decode_text(bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// The lowercased extension of a path: the substring after the final `.`
/// of the file name, or `None` when there is no dot.
pub fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}
