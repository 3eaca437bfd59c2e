//! One (client, month) processing run
//!
//! Locates the inputs of a month, runs both extractors and the synthesizer,
//! and hands back everything needed to write snapshots or render a report.

use crate::insights::{InsightBundle, InsightSynthesizer};
use crate::ocr::OcrEngine;
use crate::screenshot::{MetricsCollection, ScreenshotExtractor};
use crate::strategy::{StrategyData, StrategyExtractor};
use crate::ReportError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static PDF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.pdf$").unwrap());
static SCREENSHOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(png|jpe?g)$").unwrap());
static HIGHLIGHTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)highlight.*\.txt$").unwrap());

pub const MISSING_STRATEGY: &str = "Strategy deck (PDF)";
pub const MISSING_SCREENSHOTS: &str = "Performance screenshots (PNG, JPG)";
pub const MISSING_HIGHLIGHTS: &str = "Highlights text file (TXT)";

/// Input files for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthInputs {
    pub strategy_pdf: PathBuf,
    pub screenshots: Vec<PathBuf>,
    pub highlights_path: PathBuf,
}

impl MonthInputs {
    /// Find the inputs for a month.
    ///
    /// Takes the first PDF (by name) in `strategy_dir`, every PNG/JPG in
    /// `month_dir`, and the first `.txt` in `month_dir` whose name mentions
    /// "highlight". Missing directories count as empty. Fails with
    /// [`ReportError::MissingInputs`] naming everything not found.
    pub fn discover(strategy_dir: &Path, month_dir: &Path) -> Result<Self, ReportError> {
        let strategy_files = list_files(strategy_dir)?;
        let month_files = list_files(month_dir)?;

        let strategy_pdf = strategy_files
            .iter()
            .find(|p| matches_name(p, &PDF_RE))
            .cloned();
        let screenshots: Vec<PathBuf> = month_files
            .iter()
            .filter(|p| matches_name(p, &SCREENSHOT_RE))
            .cloned()
            .collect();
        let highlights_path = month_files
            .iter()
            .find(|p| matches_name(p, &HIGHLIGHTS_RE))
            .cloned();

        let mut missing = Vec::new();
        if strategy_pdf.is_none() {
            missing.push(MISSING_STRATEGY.to_string());
        }
        if screenshots.is_empty() {
            missing.push(MISSING_SCREENSHOTS.to_string());
        }
        if highlights_path.is_none() {
            missing.push(MISSING_HIGHLIGHTS.to_string());
        }

        match (strategy_pdf, highlights_path) {
            (Some(strategy_pdf), Some(highlights_path)) if missing.is_empty() => Ok(Self {
                strategy_pdf,
                screenshots,
                highlights_path,
            }),
            _ => {
                log::warn!(
                    "Missing items in {}: {}",
                    month_dir.display(),
                    missing.join(", ")
                );
                Err(ReportError::MissingInputs(missing))
            }
        }
    }
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct MonthReport {
    pub strategy: StrategyData,
    pub metrics: MetricsCollection,
    pub highlights: String,
    pub insights: InsightBundle,
}

/// The extractors, synthesizer and OCR engine used for a run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub strategy: StrategyExtractor,
    pub screenshots: ScreenshotExtractor,
    pub synthesizer: InsightSynthesizer,
    pub ocr: OcrEngine,
}

impl Pipeline {
    pub fn new(ocr: OcrEngine) -> Self {
        Self {
            ocr,
            ..Self::default()
        }
    }

    /// Process one month. Only an unreadable highlights file is an error;
    /// deck and screenshot failures degrade inside the extractors.
    pub fn run(&self, inputs: &MonthInputs) -> Result<MonthReport, ReportError> {
        let strategy = self.strategy.extract_from_pdf(&inputs.strategy_pdf);
        let metrics = self.screenshots.analyze_images(&inputs.screenshots, &self.ocr);
        let highlights = fs::read_to_string(&inputs.highlights_path)?;
        let insights = self.synthesizer.synthesize(&strategy, &metrics, &highlights);

        let failed = metrics.values().filter(|r| r.is_failure()).count();
        log::info!(
            "Processed {} KPIs, {} screenshots ({} failed)",
            strategy.kpis.len(),
            metrics.len(),
            failed
        );

        Ok(MonthReport {
            strategy,
            metrics,
            highlights,
            insights,
        })
    }
}

/// Process one month with the default extractors and the given OCR engine
pub fn run_month(inputs: &MonthInputs, ocr: &OcrEngine) -> Result<MonthReport, ReportError> {
    Pipeline::new(ocr.clone()).run(inputs)
}

/// Name of the latest month directory, by sorted name
pub fn latest_month(monthly_data_dir: &Path) -> Result<Option<String>, ReportError> {
    if !monthly_data_dir.is_dir() {
        return Ok(None);
    }

    let mut months = Vec::new();
    for entry in fs::read_dir(monthly_data_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            months.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    months.sort();

    Ok(months.pop())
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    Ok(files)
}

fn matches_name(path: &Path, re: &Regex) -> bool {
    path.file_name()
        .map(|n| re.is_match(&n.to_string_lossy()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_discover_finds_inputs() {
        let strategy = tempfile::tempdir().unwrap();
        let month = tempfile::tempdir().unwrap();
        touch(strategy.path(), "notes.docx", "");
        let deck = touch(strategy.path(), "deck.pdf", "");
        let b = touch(month.path(), "b.JPG", "");
        let a = touch(month.path(), "a.png", "");
        touch(month.path(), "readme.txt", "");
        let highlights = touch(month.path(), "March_Highlights.txt", "");

        let inputs = MonthInputs::discover(strategy.path(), month.path()).unwrap();
        assert_eq!(inputs.strategy_pdf, deck);
        assert_eq!(inputs.screenshots, vec![a, b]);
        assert_eq!(inputs.highlights_path, highlights);
    }

    #[test]
    fn test_discover_reports_all_missing() {
        let month = tempfile::tempdir().unwrap();
        let err = MonthInputs::discover(Path::new("/nonexistent/strategy"), month.path())
            .unwrap_err();
        match err {
            ReportError::MissingInputs(items) => assert_eq!(
                items,
                vec![MISSING_STRATEGY, MISSING_SCREENSHOTS, MISSING_HIGHLIGHTS]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_latest_month() {
        let data = tempfile::tempdir().unwrap();
        fs::create_dir(data.path().join("2024-01")).unwrap();
        fs::create_dir(data.path().join("2024-03")).unwrap();
        fs::create_dir(data.path().join("2024-02")).unwrap();
        touch(data.path(), "2024-12.txt", "");

        assert_eq!(latest_month(data.path()).unwrap().as_deref(), Some("2024-03"));
        assert_eq!(latest_month(Path::new("/nonexistent")).unwrap(), None);
    }
}
