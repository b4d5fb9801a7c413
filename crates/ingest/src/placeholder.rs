//! Recognises sentinel text stored in place of real document content.

const BINARY_FILE_MARKER: &str = "[Binary file:";
const NO_TEXT_IN_IMAGE_MARKER: &str = "[Image processed but no text could be extracted";

/// Stored content that cannot be meaningfully analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// A PDF/Word upload recorded by metadata only.
    UnsupportedBinary,
    /// An image where OCR found nothing.
    NoTextInImage,
}

impl Placeholder {
    pub fn detect(content: &str) -> Option<Self> {
        if content.contains(BINARY_FILE_MARKER) {
            Some(Placeholder::UnsupportedBinary)
        } else if content.contains(NO_TEXT_IN_IMAGE_MARKER) {
            Some(Placeholder::NoTextInImage)
        } else {
            None
        }
    }

    /// Short error label returned to clients.
    pub fn error(&self) -> &'static str {
        match self {
            Placeholder::UnsupportedBinary => "Unsupported file type",
            Placeholder::NoTextInImage => "No text found in image",
        }
    }

    /// Longer, user-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::UnsupportedBinary => {
                "This file type cannot be analyzed yet. Please upload a text-based document (TXT) \
                 or image (JPG, PNG) for analysis."
            }
            Placeholder::NoTextInImage => {
                "The image appears to be blank or contains no readable text. \
                 Please ensure the image is clear and contains text."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{binary_sentinel, ocr_failure_sentinel, OCR_EMPTY_SENTINEL};

    #[test]
    fn detects_generated_sentinels() {
        let binary = binary_sentinel("x.pdf", "application/pdf", 10);
        assert_eq!(Placeholder::detect(&binary), Some(Placeholder::UnsupportedBinary));
        assert_eq!(Placeholder::detect(OCR_EMPTY_SENTINEL), Some(Placeholder::NoTextInImage));
    }

    #[test]
    fn ocr_failure_is_not_rejected() {
        let failed = ocr_failure_sentinel("scan.png", "tesseract not found");
        assert_eq!(Placeholder::detect(&failed), None);
    }

    #[test]
    fn ordinary_text_passes() {
        assert_eq!(Placeholder::detect("This is a simple lease agreement."), None);
    }

    #[test]
    fn markers_anywhere_in_content_are_detected() {
        assert_eq!(
            Placeholder::detect("Scanned cover page\n[Binary file: x.pdf. Type: application/pdf]"),
            Some(Placeholder::UnsupportedBinary)
        );
        assert_eq!(
            Placeholder::detect("page 1\n[Image processed but no text could be extracted]"),
            Some(Placeholder::NoTextInImage)
        );
    }

    #[test]
    fn labels() {
        assert_eq!(Placeholder::UnsupportedBinary.error(), "Unsupported file type");
        assert_eq!(Placeholder::NoTextInImage.error(), "No text found in image");
    }
}
