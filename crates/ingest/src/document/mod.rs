//! Content extraction: uploaded bytes plus a declared MIME type become the
//! text that is stored and later sent for analysis.
//!
//! A single [`classify`] step picks one of a closed set of strategies. Every
//! strategy yields text; failures become sentinel strings rather than errors
//! so an upload always has something to persist.

mod binary;
mod image;
mod txt;

use std::sync::Arc;

use tracing::info;

use crate::ocr::OcrEngine;

pub use binary::binary_sentinel;
pub use image::{ocr_failure_sentinel, OCR_EMPTY_SENTINEL};
pub use txt::sanitize;

/// How a given upload will be turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Declared `image/*`: run OCR.
    ImageOcr,
    /// Bytes decode as UTF-8.
    Utf8Text,
    /// Undecodable PDF or word-processing file: record metadata only.
    BinaryDocument,
    /// Undecodable, unrecognised type: lossy UTF-8.
    LossyText,
}

/// Whether a declared type names a binary document format we recognise.
pub fn is_binary_document(declared_type: &str) -> bool {
    declared_type == "application/pdf" || declared_type.contains("word")
}

/// Pick the extraction strategy for an upload.
pub fn classify(bytes: &[u8], declared_type: &str) -> ExtractionStrategy {
    if declared_type.starts_with("image/") {
        ExtractionStrategy::ImageOcr
    } else if std::str::from_utf8(bytes).is_ok() {
        ExtractionStrategy::Utf8Text
    } else if is_binary_document(declared_type) {
        ExtractionStrategy::BinaryDocument
    } else {
        ExtractionStrategy::LossyText
    }
}

/// Turns uploaded files into storable text.
#[derive(Clone)]
pub struct ContentExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ContentExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Extract text from `bytes`. Never fails; the caller rejects empty output.
    pub async fn extract(&self, bytes: &[u8], declared_type: &str, file_name: &str) -> String {
        let strategy = classify(bytes, declared_type);
        info!(
            "Extracting '{}' (type={}, {} bytes) via {:?}",
            file_name,
            declared_type,
            bytes.len(),
            strategy
        );

        match strategy {
            ExtractionStrategy::ImageOcr => image::extract_image(self.ocr.as_ref(), bytes, file_name).await,
            ExtractionStrategy::Utf8Text => txt::extract_utf8(bytes),
            ExtractionStrategy::BinaryDocument => binary_sentinel(file_name, declared_type, bytes.len()),
            ExtractionStrategy::LossyText => txt::extract_lossy(bytes),
        }
    }
}
