use tracing::{info, warn};

use crate::ocr::OcrEngine;

pub const OCR_EMPTY_SENTINEL: &str = "[Image processed but no text could be extracted. \
The image may be blank, too low quality, or contain only non-text elements.]";

pub fn ocr_failure_sentinel(file_name: &str, reason: &str) -> String {
    format!(
        "[Image file: {}. OCR text extraction failed. Error: {}]",
        file_name, reason
    )
}

pub(super) async fn extract_image(ocr: &dyn OcrEngine, bytes: &[u8], file_name: &str) -> String {
    info!("Processing image file: {}", file_name);
    match ocr.recognize_text(bytes).await {
        Ok(text) => {
            let text = super::sanitize(&text);
            if text.is_empty() {
                warn!("OCR found no text in {}", file_name);
                OCR_EMPTY_SENTINEL.to_string()
            } else {
                info!("Successfully extracted {} characters from image", text.chars().count());
                text
            }
        }
        Err(e) => {
            warn!("OCR extraction failed for {}: {}", file_name, e);
            ocr_failure_sentinel(file_name, &e.to_string())
        }
    }
}
