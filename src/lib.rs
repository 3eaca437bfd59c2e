//! Monthly client report insights
//!
//! This crate provides:
//! - KPI and content-pillar extraction from strategy deck text (PDF via lopdf)
//! - Platform and metric extraction from OCR'd performance screenshots
//! - Rule-based synthesis of platform, KPI and content insights plus a key takeaway
//! - Flat JSON snapshots of every stage for one (client, month) run

pub mod insights;
pub mod numeric;
pub mod ocr;
pub mod pipeline;
pub mod screenshot;
pub mod snapshot;
pub mod strategy;

pub use insights::{InsightBundle, InsightLexicon, InsightSynthesizer};
pub use numeric::lenient_number;
pub use ocr::{OcrConfig, OcrEngine};
pub use pipeline::{run_month, MonthInputs, MonthReport, Pipeline};
pub use screenshot::{
    FailedScreenshot, MetricKind, MetricTable, MetricsCollection, Platform, PlatformTable,
    ScreenshotExtractor, ScreenshotMetrics, ScreenshotResult,
};
pub use strategy::{Kpi, SectionHeadings, StrategyData, StrategyExtractor};

/// Errors raised by the collaborators around the core (PDF reading, OCR,
/// snapshot files). The extraction and synthesis contracts themselves never
/// return them; they degrade to empty or default values instead.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Pdf(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("OCR error: {0}")]
    Ocr(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Missing inputs: {}", .0.join(", "))]
    MissingInputs(Vec<String>),
}

impl From<lopdf::Error> for ReportError {
    fn from(e: lopdf::Error) -> Self {
        ReportError::Pdf(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
