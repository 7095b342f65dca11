//! Raw-text acquisition from document files.
//!
//! The extraction pipeline only needs the [`TextSource`] contract: raw text
//! plus optional category-structured data, or a typed failure. The bundled
//! [`FileTextSource`] reads PDFs (embedded text only) and plain-text files;
//! image formats are rejected because OCR is out of scope.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::AcquisitionError;
use crate::extract::parse_structured;
use crate::models::StructuredData;

/// Text acquired from one document.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Raw extracted text.
    pub raw_text: String,

    /// Category-structured matches, when the source computed them.
    pub structured: Option<StructuredData>,

    /// Number of pages the text came from, when known.
    pub pages: Option<u32>,
}

/// Contract for raw-text acquisition collaborators.
pub trait TextSource {
    /// Produce text for a document, or a typed failure. The pipeline treats
    /// any failure as terminal for that document attempt.
    fn extract_from_file(&self, path: &Path) -> Result<DocumentText, AcquisitionError>;
}

/// File-based text source for PDFs and plain-text documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl FileTextSource {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(&self, path: &Path) -> Result<DocumentText, AcquisitionError> {
        let pages = match lopdf::Document::load(path) {
            Ok(doc) => {
                let count = doc.get_pages().len();
                debug!("PDF has {count} pages");
                Some(count as u32)
            }
            Err(e) => {
                warn!("could not read PDF page count: {e}");
                None
            }
        };

        let raw_text = pdf_extract::extract_text(path)
            .map_err(|e| AcquisitionError::Read(e.to_string()))?;

        if raw_text.trim().is_empty() {
            return Err(AcquisitionError::EmptyText);
        }

        let structured = parse_structured(&raw_text);
        Ok(DocumentText {
            raw_text,
            structured: Some(structured),
            pages,
        })
    }

    fn extract_plain(&self, path: &Path) -> Result<DocumentText, AcquisitionError> {
        let raw_text = std::fs::read_to_string(path)
            .map_err(|e| AcquisitionError::Read(e.to_string()))?;

        if raw_text.trim().is_empty() {
            return Err(AcquisitionError::EmptyText);
        }

        let structured = parse_structured(&raw_text);
        Ok(DocumentText {
            raw_text,
            structured: Some(structured),
            pages: None,
        })
    }
}

impl TextSource for FileTextSource {
    fn extract_from_file(&self, path: &Path) -> Result<DocumentText, AcquisitionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        debug!("acquiring text from {} ({ext})", path.display());

        match ext.as_str() {
            "pdf" => self.extract_pdf(path),
            "txt" | "text" | "md" | "csv" => self.extract_plain(path),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" => Err(AcquisitionError::OcrDisabled),
            other => Err(AcquisitionError::UnsupportedType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Minimal one-page PDF with the given line of embedded text.
    fn write_pdf(path: &Path, text: &str) {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pdf_text_and_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        write_pdf(&path, "Customer: John Doe");

        let doc = FileTextSource::new().extract_from_file(&path).unwrap();
        assert!(doc.raw_text.contains("John Doe"));
        assert_eq!(doc.pages, Some(1));
    }

    #[test]
    fn test_plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Customer: John Doe").unwrap();
        writeln!(f, "Phone: 0712 345 678").unwrap();

        let doc = FileTextSource::new().extract_from_file(&path).unwrap();
        assert!(doc.raw_text.contains("John Doe"));
        let structured = doc.structured.unwrap();
        assert!(structured.phone_numbers.contains(&"0712345678".to_string()));
    }

    #[test]
    fn test_image_rejected_without_ocr() {
        let err = FileTextSource::new()
            .extract_from_file(Path::new("scan.jpg"))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::OcrDisabled));
        // The message steers the caller towards a supported format
        let msg = err.to_string();
        assert!(msg.contains("PDF") && msg.contains("text"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = FileTextSource::new()
            .extract_from_file(Path::new("notes.docx"))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::UnsupportedType(ref e) if e == "docx"));
    }

    #[test]
    fn test_empty_file_is_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "   \n").unwrap();

        let err = FileTextSource::new().extract_from_file(&path).unwrap_err();
        assert!(matches!(err, AcquisitionError::EmptyText));
    }
}
