//! Platform detection and metric extraction from OCR'd screenshots
//!
//! Matching is plain case-insensitive substring search against ordered
//! keyword tables. The first platform in table order wins, and each metric
//! keeps the value from its first qualifying line.

use crate::numeric::strip_metric_value;
use crate::ocr::OcrEngine;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Social platform a screenshot was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    Linkedin,
    Tiktok,
    Youtube,
    Pinterest,
    #[serde(other)]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Pinterest => "pinterest",
            Platform::Unknown => "unknown",
        }
    }

    /// Name with the first letter upper-cased, e.g. `Linkedin`
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// The closed set of metrics read from screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Impressions,
    Engagement,
    Clicks,
    Followers,
    Conversion,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Impressions,
        MetricKind::Engagement,
        MetricKind::Clicks,
        MetricKind::Followers,
        MetricKind::Conversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Impressions => "impressions",
            MetricKind::Engagement => "engagement",
            MetricKind::Clicks => "clicks",
            MetricKind::Followers => "followers",
            MetricKind::Conversion => "conversion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Ordered platform -> keyword table
#[derive(Debug, Clone)]
pub struct PlatformTable {
    pub entries: Vec<(Platform, Vec<String>)>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        let table: [(Platform, &[&str]); 7] = [
            (Platform::Facebook, &["facebook", "fb", "meta"]),
            (Platform::Instagram, &["instagram", "ig", "insta"]),
            (Platform::Twitter, &["twitter", "tweet", "x"]),
            (Platform::Linkedin, &["linkedin", "li", "linked in"]),
            (Platform::Tiktok, &["tiktok", "tt", "tik tok"]),
            (Platform::Youtube, &["youtube", "yt", "you tube"]),
            (Platform::Pinterest, &["pinterest", "pin"]),
        ];
        Self {
            entries: table
                .into_iter()
                .map(|(platform, keywords)| (platform, to_owned_list(keywords)))
                .collect(),
        }
    }
}

/// Ordered metric -> trigger keyword table
#[derive(Debug, Clone)]
pub struct MetricTable {
    pub entries: Vec<(MetricKind, Vec<String>)>,
}

impl Default for MetricTable {
    fn default() -> Self {
        let table: [(MetricKind, &[&str]); 5] = [
            (MetricKind::Impressions, &["impressions", "views", "reach"]),
            (
                MetricKind::Engagement,
                &["engagement", "interactions", "likes", "comments", "shares"],
            ),
            (
                MetricKind::Clicks,
                &["clicks", "link clicks", "website clicks"],
            ),
            (
                MetricKind::Followers,
                &["followers", "new followers", "audience growth"],
            ),
            (
                MetricKind::Conversion,
                &["conversion", "leads", "sign-ups", "purchases"],
            ),
        ];
        Self {
            entries: table
                .into_iter()
                .map(|(kind, triggers)| (kind, to_owned_list(triggers)))
                .collect(),
        }
    }
}

fn to_owned_list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Metrics read from one screenshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotMetrics {
    pub platform: Platform,
    /// Metric name -> raw value string, in table order. Absent metrics are
    /// omitted rather than stored empty.
    #[serde(default)]
    pub metrics: IndexMap<String, String>,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub image_name: String,
}

/// A screenshot that could not be read or OCR'd
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedScreenshot {
    pub image_path: String,
    pub image_name: String,
    pub error: String,
}

/// Outcome for one screenshot. Serialized without a tag: a failure is the
/// record carrying an `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScreenshotResult {
    Failed(FailedScreenshot),
    Extracted(ScreenshotMetrics),
}

impl ScreenshotResult {
    /// Detected platform; failures count as `Unknown`
    pub fn platform(&self) -> Platform {
        match self {
            ScreenshotResult::Extracted(m) => m.platform,
            ScreenshotResult::Failed(_) => Platform::Unknown,
        }
    }

    /// Extracted metrics in insertion order; empty for failures
    pub fn metrics(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let map = match self {
            ScreenshotResult::Extracted(m) => Some(&m.metrics),
            ScreenshotResult::Failed(_) => None,
        };
        map.into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn image_name(&self) -> &str {
        match self {
            ScreenshotResult::Extracted(m) => &m.image_name,
            ScreenshotResult::Failed(f) => &f.image_name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScreenshotResult::Failed(_))
    }
}

/// Image file name -> result, in processing order
pub type MetricsCollection = IndexMap<String, ScreenshotResult>;

/// Extracts platform and metrics from screenshot OCR text
#[derive(Debug, Clone, Default)]
pub struct ScreenshotExtractor {
    platforms: PlatformTable,
    metrics: MetricTable,
}

impl ScreenshotExtractor {
    pub fn new(platforms: PlatformTable, metrics: MetricTable) -> Self {
        Self { platforms, metrics }
    }

    /// Build a [`ScreenshotMetrics`] from OCR text
    pub fn extract<P: AsRef<Path>>(&self, ocr_text: &str, image_path: P) -> ScreenshotMetrics {
        let image_path = image_path.as_ref();
        ScreenshotMetrics {
            platform: self.detect_platform(ocr_text),
            metrics: self.extract_metrics(ocr_text),
            image_path: image_path.display().to_string(),
            image_name: image_name(image_path),
        }
    }

    /// First platform in table order with any keyword in the text
    pub fn detect_platform(&self, text: &str) -> Platform {
        let lower = text.to_lowercase();

        self.platforms
            .entries
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
            })
            .map(|(platform, _)| *platform)
            .unwrap_or(Platform::Unknown)
    }

    /// Metric name -> value for every metric whose trigger yields a value
    pub fn extract_metrics(&self, text: &str) -> IndexMap<String, String> {
        let lower = text.to_lowercase();
        let mut metrics = IndexMap::new();

        for (kind, triggers) in &self.metrics.entries {
            let value = triggers
                .iter()
                .map(|t| t.to_lowercase())
                .filter(|t| !t.is_empty() && lower.contains(t.as_str()))
                .find_map(|t| value_for_trigger(text, &t));

            if let Some(value) = value {
                metrics.insert(kind.as_str().to_string(), value);
            }
        }

        metrics
    }

    /// OCR an image and extract from it. Any read or OCR failure is logged
    /// and returned as [`ScreenshotResult::Failed`].
    pub fn analyze_image(&self, path: &Path, engine: &OcrEngine) -> ScreenshotResult {
        log::info!("Analyzing image: {}", path.display());

        match engine.recognize(path) {
            Ok(text) => ScreenshotResult::Extracted(self.extract(&text, path)),
            Err(e) => {
                log::error!("Error analyzing image {}: {}", path.display(), e);
                ScreenshotResult::Failed(FailedScreenshot {
                    image_path: path.display().to_string(),
                    image_name: image_name(path),
                    error: e.to_string(),
                })
            }
        }
    }

    /// Analyze screenshots in parallel, keyed by file name in input order
    pub fn analyze_images(&self, paths: &[PathBuf], engine: &OcrEngine) -> MetricsCollection {
        let results: Vec<(String, ScreenshotResult)> = paths
            .par_iter()
            .map(|path| (image_name(path), self.analyze_image(path, engine)))
            .collect();

        results.into_iter().collect()
    }
}

fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Value from the first line containing `trigger` that yields one
fn value_for_trigger(text: &str, trigger: &str) -> Option<String> {
    text.lines()
        .filter(|line| line.to_lowercase().contains(trigger))
        .find_map(|line| value_from_line(line, trigger))
}

/// `label: value` lines give everything after the first colon. Otherwise the
/// word after the one containing the trigger, reduced to digits, `.` and `%`.
fn value_from_line(line: &str, trigger: &str) -> Option<String> {
    if let Some((_, after)) = line.split_once(':') {
        let value = after.trim();
        return (!value.is_empty()).then(|| value.to_string());
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    words.windows(2).find_map(|pair| {
        if !pair[0].to_lowercase().contains(trigger) {
            return None;
        }
        let value = strip_metric_value(pair[1]);
        (!value.is_empty()).then_some(value)
    })
}
