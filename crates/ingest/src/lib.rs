pub mod document;
pub mod ocr;
pub mod placeholder;

pub use document::{ContentExtractor, ExtractionStrategy};
pub use ocr::{OcrEngine, OcrError, TesseractOcr};
pub use placeholder::Placeholder;
