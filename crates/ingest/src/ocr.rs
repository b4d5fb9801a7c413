//! Optical character recognition seam.
//!
//! The extractor only needs `bytes -> text`; the default backend shells out
//! to the Tesseract CLI so no native bindings are linked into the server.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use legalyze_core::config::OcrConfig;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR backend not available: {0}")]
    NotAvailable(String),
    #[error("OCR failed: {0}")]
    Failed(String),
    #[error("OCR timed out after {0}s")]
    Timeout(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognise text in an encoded image (PNG, JPEG, TIFF, ...).
    async fn recognize_text(&self, bytes: &[u8]) -> Result<String, OcrError>;
}

/// Tesseract OCR via the command-line binary.
pub struct TesseractOcr {
    config: OcrConfig,
    work_dir: PathBuf,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        let work_dir = config.work_dir.as_ref().map_or_else(std::env::temp_dir, PathBuf::from);
        Self { config, work_dir }
    }

    fn temp_path(&self) -> PathBuf {
        self.work_dir.join(format!("legalyze_ocr_{}.img", uuid::Uuid::new_v4()))
    }

    async fn run(&self, image_path: &Path) -> Result<String, OcrError> {
        let child = Command::new(&self.config.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::NotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.config.binary
                )));
            }
            Err(e) => return Err(OcrError::Io(e)),
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout(self.config.timeout_secs))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize_text(&self, bytes: &[u8]) -> Result<String, OcrError> {
        info!("Starting OCR text extraction ({} bytes)", bytes.len());
        let image_path = self.temp_path();
        let result = match tokio::fs::write(&image_path, bytes).await {
            Ok(()) => self.run(&image_path).await,
            Err(e) => Err(OcrError::Io(e)),
        };

        // A failed write may still leave a partial file behind.
        if let Err(e) = tokio::fs::remove_file(&image_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("Failed to remove OCR temp file {}: {}", image_path.display(), e);
            }
        }

        let text = result?;
        info!("OCR extraction completed. Extracted {} characters.", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_not_available() {
        let ocr = TesseractOcr::new(OcrConfig {
            binary: "legalyze-no-such-ocr-binary".into(),
            language: "eng".into(),
            timeout_secs: 5,
            work_dir: None,
        });
        let err = ocr.recognize_text(b"not an image").await.unwrap_err();
        assert!(matches!(err, OcrError::NotAvailable(_)), "got {err:?}");
    }

    #[test]
    fn temp_paths_are_unique() {
        let ocr = TesseractOcr::default();
        assert_ne!(ocr.temp_path(), ocr.temp_path());
    }

    #[tokio::test]
    async fn unwritable_work_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        std::fs::write(&not_a_dir, b"x").unwrap();

        let ocr = TesseractOcr::new(OcrConfig {
            work_dir: Some(not_a_dir.to_string_lossy().into_owned()),
            ..OcrConfig::default()
        });
        let err = ocr.recognize_text(b"png").await.unwrap_err();
        assert!(matches!(err, OcrError::Io(_)), "got {err:?}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    fn work_dir_is_empty(dir: &tempfile::TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[cfg(unix)]
    fn fake_binary(dir: &tempfile::TempDir, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-ocr");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_trimmed_text() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let ocr = TesseractOcr::new(OcrConfig {
            binary: fake_binary(&dir, "printf '  LEASE AGREEMENT\\n\\n'"),
            work_dir: Some(scratch.path().to_string_lossy().into_owned()),
            ..OcrConfig::default()
        });
        assert_eq!(ocr.recognize_text(b"png").await.unwrap(), "LEASE AGREEMENT");
        assert!(work_dir_is_empty(&scratch));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let ocr = TesseractOcr::new(OcrConfig {
            binary: fake_binary(&dir, "echo 'Error opening data file' >&2; exit 1"),
            work_dir: Some(scratch.path().to_string_lossy().into_owned()),
            ..OcrConfig::default()
        });
        match ocr.recognize_text(b"png").await {
            Err(OcrError::Failed(reason)) => assert!(reason.contains("Error opening data file")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(work_dir_is_empty(&scratch));
    }
}
