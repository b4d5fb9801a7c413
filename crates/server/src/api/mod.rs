//! HTTP handlers.
//!
//! Each sub-module owns one resource. Handlers authenticate through
//! [`AuthUser`](crate::auth::AuthUser), validate input, call exactly one
//! store/extractor/analysis path and map the outcome to a status code.

pub mod analyze;
pub mod doc;
pub mod documents;
pub mod health;
pub mod text;

// ── Re-exports ───────────────────────────────────────────────────

pub use analyze::{analyze_document, list_analyses};
pub use documents::{list_documents, upload_document};
pub use health::health;
pub use text::{key_phrases, simplify};
