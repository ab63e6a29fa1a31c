//! Text extraction: normalises uploaded letters (txt, pdf, doc, docx) into plain text.
//!
//! Extraction is synchronous file I/O. Callers on the async runtime should
//! run it via `tokio::task::spawn_blocking`.

pub mod docx;
pub mod encoding;
pub mod pdf;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::extraction::encoding::decode_text;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error extracting text from {}: {cause}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        cause: ExtractionCause,
    },
}

/// Underlying reason a supported document could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractionCause {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading PDF file: {0}")]
    Pdf(String),

    #[error("Error reading DOCX container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Error reading DOCX XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Unable to decode text file with any supported encoding")]
    NoSupportedEncoding,
}

// ────────────────────────────────────────────────────────────────────────────
// Formats
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    /// Legacy binary `.doc`. Best-effort only, see [`extract_legacy_doc`].
    LegacyWord,
    Word,
}

impl DocumentFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 4] = ["txt", "pdf", "doc", "docx"];

    /// Maps a bare extension (no dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "pdf" => Some(DocumentFormat::Pdf),
            "doc" => Some(DocumentFormat::LegacyWord),
            "docx" => Some(DocumentFormat::Word),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ExtractError::UnsupportedFormat(dotted_extension(path)))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::PlainText => "plain-text",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::LegacyWord => "doc",
            DocumentFormat::Word => "docx",
        };
        f.write_str(name)
    }
}

/// Lowercased extension with a leading dot (".pdf"), or "" when absent.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

/// Metadata probe result used to pre-validate uploads without reading content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub extension: String,
    pub is_supported: bool,
}

/// Stateless extractor. Never modifies or deletes the source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts trimmed plain text from `path`.
    ///
    /// Order of checks: existence, then format (before the file is opened),
    /// then the format-specific parser.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let format = DocumentFormat::from_path(path)?;
        debug!("Extracting {} as {format}", path.display());

        let text = match format {
            DocumentFormat::PlainText => extract_plain_text(path),
            DocumentFormat::Pdf => pdf::extract_pdf(path),
            DocumentFormat::Word => docx::extract_docx(path),
            DocumentFormat::LegacyWord => extract_legacy_doc(path),
        }
        .map_err(|cause| ExtractError::Extraction {
            path: path.to_path_buf(),
            cause,
        })?;

        debug!(
            "Extracted {} characters from {}",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }

    /// Reports name, size and extension support. Unsupported extensions are
    /// reported via `is_supported = false`, never as an error.
    pub fn describe(&self, path: &Path) -> Result<FileDescriptor, ExtractError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractError::NotFound(path.to_path_buf()),
            _ => ExtractError::Extraction {
                path: path.to_path_buf(),
                cause: ExtractionCause::Io(e),
            },
        })?;

        Ok(FileDescriptor {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: metadata.len(),
            extension: dotted_extension(path),
            is_supported: DocumentFormat::from_path(path).is_ok(),
        })
    }

    /// True when the file exists and has a supported extension.
    pub fn is_processable(&self, path: &Path) -> bool {
        self.describe(path)
            .map(|info| info.is_supported)
            .unwrap_or(false)
    }
}

fn extract_plain_text(path: &Path) -> Result<String, ExtractionCause> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_text(&bytes)?;
    debug!("Decoded {} as {}", path.display(), encoding.label());
    Ok(text.trim().to_string())
}

/// Degraded capability: there is no binary Word parser. The raw bytes go
/// through the plain-text encoding chain and control characters are dropped,
/// which recovers the text runs of simple documents and little else.
fn extract_legacy_doc(path: &Path) -> Result<String, ExtractionCause> {
    let bytes = std::fs::read(path)?;
    let (text, _) = decode_text(&bytes)?;
    let visible: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();
    Ok(visible.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use encoding_rs::WINDOWS_1252;

    use super::*;
    use crate::extraction::docx::tests::{document_xml, write_docx};

    fn fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = TextExtractor::new().extract(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_missing_file_with_unsupported_extension_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = TextExtractor::new().extract(&dir.path().join("missing.rtf"));
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "letter.rtf", b"{\\rtf1 hello}");
        match TextExtractor::new().extract(&path) {
            Err(ExtractError::UnsupportedFormat(ext)) => assert_eq!(ext, ".rtf"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_extension_checked_before_open() {
        // A directory exists but cannot be read as a file; the format check must win.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folder.rtf");
        fs::create_dir(&path).unwrap();
        assert!(matches!(
            TextExtractor::new().extract(&path),
            Err(ExtractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_plain_text_trimmed_with_lines_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "offer.txt", b"\n\n  Dear Candidate,\n\nWelcome.  \n");
        assert_eq!(
            TextExtractor::new().extract(&path).unwrap(),
            "Dear Candidate,\n\nWelcome."
        );
    }

    #[test]
    fn test_plain_text_round_trips_each_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = TextExtractor::new();

        let utf8 = "Stipend: ₹40,000 per month";
        let path = fixture(&dir, "utf8.txt", utf8.as_bytes());
        assert_eq!(extractor.extract(&path).unwrap(), utf8);

        let latin1 = "Société Générale, Zürich";
        let bytes: Vec<u8> = latin1.chars().map(|c| c as u32 as u8).collect();
        let path = fixture(&dir, "latin1.txt", &bytes);
        assert_eq!(extractor.extract(&path).unwrap(), latin1);

        let cp1252 = "Salary €3,000 – “negotiable”";
        let (bytes, _, _) = WINDOWS_1252.encode(cp1252);
        let path = fixture(&dir, "cp1252.txt", &bytes);
        assert_eq!(extractor.extract(&path).unwrap(), cp1252);

        let iso = "Ref\u{8F}No";
        let bytes: Vec<u8> = iso.chars().map(|c| c as u32 as u8).collect();
        let path = fixture(&dir, "iso.txt", &bytes);
        assert_eq!(extractor.extract(&path).unwrap(), iso);
    }

    #[test]
    fn test_uppercase_extension_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "OFFER.TXT", b"Hello");
        assert_eq!(TextExtractor::new().extract(&path).unwrap(), "Hello");
    }

    #[test]
    fn test_docx_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offer.docx");
        write_docx(
            &path,
            &document_xml(
                "<w:p><w:r><w:t>Internship Offer</w:t></w:r></w:p>\
                 <w:p><w:r><w:t>Globex LLC</w:t></w:r></w:p>",
            ),
        );
        assert_eq!(
            TextExtractor::new().extract(&path).unwrap(),
            "Internship Offer\nGlobex LLC"
        );
    }

    #[test]
    fn test_corrupt_docx_wrapped_as_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "broken.docx", b"not a zip archive");
        match TextExtractor::new().extract(&path) {
            Err(ExtractError::Extraction { path: p, cause }) => {
                assert_eq!(p, path);
                assert!(matches!(cause, ExtractionCause::Archive(_)));
            }
            other => panic!("expected Extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_pdf_wrapped_as_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "broken.pdf", b"%PDF-1.4 truncated");
        assert!(matches!(
            TextExtractor::new().extract(&path),
            Err(ExtractError::Extraction {
                cause: ExtractionCause::Pdf(_),
                ..
            })
        ));
    }

    #[test]
    fn test_legacy_doc_best_effort_drops_control_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = vec![0xD0, 0xCF, 0x11, 0xE0, 0x00, 0x01];
        bytes.extend_from_slice(b"Offer of Employment\x00\x00\nAcme Inc");
        let path = fixture(&dir, "legacy.doc", &bytes);

        let text = TextExtractor::new().extract(&path).unwrap();
        assert!(text.contains("Offer of Employment"));
        assert!(text.contains("Acme Inc"));
        assert!(!text.contains('\0'));
    }

    #[test]
    fn test_describe_reports_unsupported_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "Letter.RTF", b"12345");
        let info = TextExtractor::new().describe(&path).unwrap();
        assert_eq!(
            info,
            FileDescriptor {
                name: "Letter.RTF".to_string(),
                size: 5,
                extension: ".rtf".to_string(),
                is_supported: false,
            }
        );
    }

    #[test]
    fn test_describe_supported_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(&dir, "offer.pdf", b"%PDF");
        let extractor = TextExtractor::new();

        let info = extractor.describe(&path).unwrap();
        assert!(info.is_supported);
        assert_eq!(info.extension, ".pdf");

        assert!(matches!(
            extractor.describe(&dir.path().join("gone.pdf")),
            Err(ExtractError::NotFound(_))
        ));
    }

    #[test]
    fn test_is_processable() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = TextExtractor::new();
        let txt = fixture(&dir, "a.txt", b"x");
        let rtf = fixture(&dir, "a.rtf", b"x");

        assert!(extractor.is_processable(&txt));
        assert!(!extractor.is_processable(&rtf));
        assert!(!extractor.is_processable(&dir.path().join("none.txt")));
    }
}
