//! Plain-text decoding with a fixed fallback chain.
//!
//! UTF-8 is tried first. On failure the legacy single-byte encodings are
//! tried in order: Latin-1, Windows-1252, ISO-8859-1. Latin-1 here accepts
//! only the printable ISO-8859-1 repertoire (no C1 controls 0x80-0x9F), so
//! Windows-1252 documents with smart quotes or the euro sign fall through to
//! the Windows-1252 decoder. ISO-8859-1 is byte-transparent and accepts
//! anything the other two reject.

use encoding_rs::WINDOWS_1252;

use super::ExtractionCause;

/// Encodings the plain-text path can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
    Iso8859_1,
}

/// Tried in order after UTF-8 fails.
pub const FALLBACK_ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
    TextEncoding::Iso8859_1,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Bytes with no mapping in Windows-1252.
const WINDOWS_1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Strict decode. Returns `None` when the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).ok()
            }
            TextEncoding::Latin1 => {
                if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
                    return None;
                }
                Some(bytes.iter().map(|&b| char::from(b)).collect())
            }
            TextEncoding::Windows1252 => {
                if bytes.iter().any(|b| WINDOWS_1252_UNDEFINED.contains(b)) {
                    return None;
                }
                let (decoded, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
                (!had_errors).then(|| decoded.into_owned())
            }
            TextEncoding::Iso8859_1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decodes raw bytes with the UTF-8 → Latin-1 → Windows-1252 → ISO-8859-1 chain.
/// Line endings are normalised to `\n`.
pub fn decode_text(bytes: &[u8]) -> Result<(String, TextEncoding), ExtractionCause> {
    std::iter::once(TextEncoding::Utf8)
        .chain(FALLBACK_ENCODINGS)
        .find_map(|encoding| {
            encoding
                .decode(bytes)
                .map(|text| (normalize_newlines(&text), encoding))
        })
        .ok_or(ExtractionCause::NoSupportedEncoding)
}

fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
