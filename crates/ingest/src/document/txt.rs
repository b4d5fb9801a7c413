/// Strip null bytes (rejected by Postgres text columns) and surrounding whitespace.
pub fn sanitize(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Caller guarantees `bytes` is valid UTF-8; falls back to lossy if not.
pub(super) fn extract_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => sanitize(text),
        Err(_) => extract_lossy(bytes),
    }
}

pub(super) fn extract_lossy(bytes: &[u8]) -> String {
    sanitize(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        assert_eq!(extract_utf8(content), "Hello, world!\nThis is a test file.");
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Unicode text with accents: déjà vu, § 4.2".as_bytes();
        assert_eq!(extract_utf8(content), "Unicode text with accents: déjà vu, § 4.2");
    }

    #[test]
    fn extract_empty_text() {
        assert_eq!(extract_utf8(b""), "");
        assert_eq!(extract_utf8(b"\0\0  \n"), "");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(extract_utf8(b"  \n  Hello  \n  "), "Hello");
    }

    #[test]
    fn interior_nulls_removed() {
        assert_eq!(sanitize("a\0b\0c"), "abc");
    }
}
