//! OCR for performance screenshots
//!
//! Screenshots are converted to grayscale and inverse-thresholded before
//! being handed to the Tesseract CLI, which must be installed on the host.

use crate::ReportError;
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;
use std::process::Command;

/// Configuration for the OCR engine
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the tesseract binary (default: "tesseract", relies on PATH)
    pub tesseract_path: String,
    /// Tesseract language code (default: "eng")
    pub language: String,
    /// Grayscale cut-off; brighter pixels become black, the rest white
    pub threshold: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            threshold: 150,
        }
    }
}

impl OcrConfig {
    /// Defaults overridden by `TESSERACT_PATH`, `OCR_LANGUAGE` and `OCR_THRESHOLD`.
    pub fn from_env() -> Result<Self, ReportError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("TESSERACT_PATH") {
            config.tesseract_path = path;
        }
        if let Ok(language) = std::env::var("OCR_LANGUAGE") {
            config.language = language;
        }
        if let Ok(threshold) = std::env::var("OCR_THRESHOLD") {
            config.threshold = threshold.trim().parse().map_err(|_| {
                ReportError::Config(format!(
                    "OCR_THRESHOLD must be an integer in 0..=255, got '{}'",
                    threshold
                ))
            })?;
        }

        Ok(config)
    }
}

/// Grayscale plus inverse binary threshold: pixels brighter than
/// `threshold` become 0, all others 255.
pub fn binarize(image: &DynamicImage, threshold: u8) -> GrayImage {
    let mut gray = image.to_luma8();
    for pixel in gray.pixels_mut() {
        let Luma([value]) = *pixel;
        *pixel = Luma([if value > threshold { 0 } else { 255 }]);
    }
    gray
}

/// Runs Tesseract over binarized screenshots
#[derive(Debug, Clone, Default)]
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Recognize the text of an image file
    pub fn recognize(&self, path: &Path) -> Result<String, ReportError> {
        let image = image::open(path)?;
        let binary = binarize(&image, self.config.threshold);

        let temp_dir = tempfile::tempdir()?;
        let temp_path = temp_dir.path().join("ocr_input.png");
        binary.save(&temp_path)?;

        self.run_tesseract(&temp_path)
    }

    fn run_tesseract(&self, path: &Path) -> Result<String, ReportError> {
        // tesseract input.png stdout -l eng
        let output = Command::new(&self.config.tesseract_path)
            .arg(path.as_os_str())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .map_err(|e| {
                ReportError::Ocr(format!(
                    "failed to run tesseract (path='{}'): {}",
                    self.config.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReportError::Ocr(format!(
                "tesseract exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        log::debug!("OCR produced {} characters for {}", text.len(), path.display());
        Ok(text)
    }
}

/// Check if Tesseract is available on the system
pub fn is_tesseract_available(tesseract_path: &str) -> bool {
    Command::new(tesseract_path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
