use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractionCause;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part of a .docx container and returns its
/// paragraphs in document order, one per line.
pub fn extract_docx(path: &Path) -> Result<String, ExtractionCause> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let paragraphs = document_paragraphs(&xml)?;
    Ok(paragraphs.join("\n").trim().to_string())
}

/// Collects the text of every outermost `w:p` element.
/// `w:t` runs are concatenated; `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
/// Those three only count inside a `w:r` run, so tab-stop definitions in
/// `w:pPr` contribute nothing.
fn document_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    if depth == 0 {
                        current.clear();
                    }
                    depth += 1;
                }
                b"r" if depth > 0 => run_depth += 1,
                b"t" if depth > 0 => in_text = true,
                _ => {}
            },
            Event::Empty(e) if run_depth > 0 => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Empty(e) if depth == 0 && e.local_name().as_ref() == b"p" => {
                paragraphs.push(String::new())
            }
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" if run_depth > 0 => run_depth -= 1,
                b"p" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    /// Wraps `<w:p>` elements in a minimal WordprocessingML document.
    pub(crate) fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    pub(crate) fn write_docx(path: &Path, document_xml: &str) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(br#"<?xml version="1.0"?><Types/>"#).unwrap();
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let xml = document_xml(
            "<w:p><w:r><w:t>Dear Candidate,</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">We are pleased </w:t></w:r><w:r><w:t>to offer you</w:t></w:r></w:p>",
        );
        let paragraphs = document_paragraphs(&xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Dear Candidate,", "We are pleased to offer you"]
        );
    }

    #[test]
    fn test_empty_paragraphs_and_inline_breaks() {
        let xml = document_xml(
            "<w:p><w:r><w:t>Position:</w:t><w:tab/><w:t>Intern</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>Line A</w:t><w:br/><w:t>Line B</w:t></w:r></w:p>",
        );
        let paragraphs = document_paragraphs(&xml).unwrap();
        assert_eq!(paragraphs, vec!["Position:\tIntern", "", "Line A\nLine B"]);
    }

    #[test]
    fn test_tab_stop_definitions_are_not_text() {
        let xml = document_xml(
            "<w:p><w:pPr><w:tabs>\
             <w:tab w:val=\"left\" w:pos=\"720\"/><w:tab w:val=\"right\" w:pos=\"9360\"/>\
             </w:tabs></w:pPr><w:r><w:t>Dear Candidate,</w:t></w:r></w:p>",
        );
        assert_eq!(document_paragraphs(&xml).unwrap(), vec!["Dear Candidate,"]);
    }

    #[test]
    fn test_run_properties_do_not_leak_into_text() {
        let xml = document_xml(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Stipend:</w:t></w:r>\
             <w:r><w:tab/><w:t>$1,200</w:t></w:r></w:p>",
        );
        assert_eq!(document_paragraphs(&xml).unwrap(), vec!["Stipend:\t$1,200"]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = document_xml("<w:p><w:r><w:t>Smith &amp; Sons Ltd</w:t></w:r></w:p>");
        assert_eq!(document_paragraphs(&xml).unwrap(), vec!["Smith & Sons Ltd"]);
    }

    #[test]
    fn test_extract_docx_from_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offer.docx");
        write_docx(
            &path,
            &document_xml(
                "<w:p><w:r><w:t>Offer Letter</w:t></w:r></w:p>\
                 <w:p><w:r><w:t>Acme Corp</w:t></w:r></w:p>",
            ),
        );

        assert_eq!(extract_docx(&path).unwrap(), "Offer Letter\nAcme Corp");
    }

    #[test]
    fn test_zip_without_document_part_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();

        assert!(matches!(
            extract_docx(&path),
            Err(ExtractionCause::Archive(_))
        ));
    }
}
