//! KPI and content-pillar extraction from strategy deck text
//!
//! The deck is read as one concatenated string (page boundaries dropped) and
//! scanned for labelled sections. A section runs from its heading to the first
//! blank line. KPI sections yield `name: value` pairs, pillar sections yield
//! one pillar per line.

use crate::ReportError;
use lopdf::Document;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A KPI target as written in the strategy deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub value: String,
}

/// Everything pulled out of one strategy deck, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyData {
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub content_pillars: Vec<String>,
}

impl StrategyData {
    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty() && self.content_pillars.is_empty()
    }
}

/// Section headings searched for in the deck text
#[derive(Debug, Clone)]
pub struct SectionHeadings {
    /// Headings introducing `name: value` KPI lines, checked in order
    pub kpis: Vec<String>,
    /// Headings introducing one-per-line content pillars, checked in order
    pub content_pillars: Vec<String>,
    /// Drop repeated entries when several headings capture the same block.
    /// Off by default: each matching heading contributes its block again.
    pub dedup: bool,
}

impl Default for SectionHeadings {
    fn default() -> Self {
        Self {
            kpis: vec![
                "KPIs".to_string(),
                "Key Performance Indicators".to_string(),
                "Performance Metrics".to_string(),
            ],
            content_pillars: vec![
                "Content Pillars".to_string(),
                "Content Strategy".to_string(),
                "Content Themes".to_string(),
            ],
            dedup: false,
        }
    }
}

/// Extracts [`StrategyData`] from deck text
#[derive(Debug, Clone, Default)]
pub struct StrategyExtractor {
    headings: SectionHeadings,
}

impl StrategyExtractor {
    pub fn new(headings: SectionHeadings) -> Self {
        Self { headings }
    }

    pub fn headings(&self) -> &SectionHeadings {
        &self.headings
    }

    /// Extract KPIs and content pillars from the full deck text.
    ///
    /// Missing sections produce empty sequences.
    pub fn extract(&self, text: &str) -> StrategyData {
        StrategyData {
            kpis: self.extract_kpis(text),
            content_pillars: self.extract_content_pillars(text),
        }
    }

    /// Read a strategy deck PDF and extract from its text.
    ///
    /// A deck that cannot be opened or decoded is logged and treated as
    /// having no sections.
    pub fn extract_from_pdf<P: AsRef<Path>>(&self, path: P) -> StrategyData {
        let path = path.as_ref();
        log::info!("Extracting strategy data from PDF: {}", path.display());

        match read_pdf_text(path) {
            Ok(text) => self.extract(&text),
            Err(e) => {
                log::error!("Error extracting data from PDF {}: {}", path.display(), e);
                StrategyData::default()
            }
        }
    }

    /// Same as [`extract_from_pdf`](Self::extract_from_pdf) for an in-memory PDF
    pub fn extract_from_pdf_mem(&self, buffer: &[u8]) -> StrategyData {
        match read_pdf_text_mem(buffer) {
            Ok(text) => self.extract(&text),
            Err(e) => {
                log::error!("Error extracting data from PDF buffer: {}", e);
                StrategyData::default()
            }
        }
    }

    pub fn extract_kpis(&self, text: &str) -> Vec<Kpi> {
        let mut kpis = Vec::new();

        for heading in &self.headings.kpis {
            let Some(block) = section_block(text, heading) else {
                continue;
            };

            for line in block.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let kpi = Kpi {
                        name: name.trim().to_string(),
                        value: value.trim().to_string(),
                    };
                    if self.headings.dedup && kpis.contains(&kpi) {
                        continue;
                    }
                    kpis.push(kpi);
                }
            }
        }

        log::debug!("Extracted {} KPIs", kpis.len());
        kpis
    }

    pub fn extract_content_pillars(&self, text: &str) -> Vec<String> {
        let mut pillars: Vec<String> = Vec::new();

        for heading in &self.headings.content_pillars {
            let Some(block) = section_block(text, heading) else {
                continue;
            };

            for line in block.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') || line.starts_with('*') {
                    continue;
                }
                if self.headings.dedup && pillars.iter().any(|p| p == line) {
                    continue;
                }
                pillars.push(line.to_string());
            }
        }

        log::debug!("Extracted {} content pillars", pillars.len());
        pillars
    }
}

/// Text following the first occurrence of `heading`, up to the next
/// occurrence of the same heading and then up to the first blank line.
fn section_block<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    if heading.is_empty() {
        return None;
    }

    let start = text.find(heading)? + heading.len();
    let mut block = &text[start..];

    if let Some(end) = block.find(heading) {
        block = &block[..end];
    }
    if let Some(end) = block.find("\n\n") {
        block = &block[..end];
    }

    Some(block)
}

/// Read a PDF file and concatenate the text of all pages in page order
pub fn read_pdf_text<P: AsRef<Path>>(path: P) -> Result<String, ReportError> {
    let doc = Document::load(path)?;
    text_from_doc(&doc)
}

/// Read a PDF from a memory buffer and concatenate the text of all pages
pub fn read_pdf_text_mem(buffer: &[u8]) -> Result<String, ReportError> {
    let doc = Document::load_mem(buffer)?;
    text_from_doc(&doc)
}

fn text_from_doc(doc: &Document) -> Result<String, ReportError> {
    let pages = doc.get_pages();
    let page_nums: Vec<u32> = pages.keys().cloned().collect();

    doc.extract_text(&page_nums)
        .map_err(|e| ReportError::Pdf(e.to_string()))
}
