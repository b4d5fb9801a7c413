/// Placeholder stored for PDF/Word uploads whose bytes are not text.
pub fn binary_sentinel(file_name: &str, declared_type: &str, size: usize) -> String {
    format!(
        "[Binary file: {}. File type: {}. Size: {} bytes. Content extraction not yet implemented for this file type.]",
        file_name, declared_type, size
    )
}
