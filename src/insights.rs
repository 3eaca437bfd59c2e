//! Rule-based insight synthesis
//!
//! Combines strategy KPIs and pillars, per-screenshot metrics and the account
//! manager's highlights into four groups of plain-text insights:
//! - platform insights: one templated sentence per metric per platform
//! - KPI insights: target vs achieved, with a verdict when both parse as numbers
//! - content insights: pillars and positive phrases found in the highlights
//! - key takeaway: a fixed sentence picked by counting positive and negative wording
//!
//! Every step iterates its inputs in insertion order, so output order is
//! stable for identical inputs.

use crate::numeric::lenient_number;
use crate::screenshot::{MetricKind, MetricsCollection, Platform};
use crate::strategy::StrategyData;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const TAKEAWAY_STRONG: &str = "Overall performance was strong this month, with multiple KPIs exceeding targets. Continue to focus on content that resonates with the audience.";
pub const TAKEAWAY_BELOW: &str = "Performance was below targets in several areas this month. Consider adjusting the content strategy to better align with audience interests.";
pub const TAKEAWAY_MIXED: &str = "Performance was mixed this month, with some areas exceeding targets and others falling short. Focus on replicating successful content strategies.";
pub const TAKEAWAY_HIGHLIGHTS_ONLY: &str = "Based on the account manager's highlights, focus on continuing to create content that resonates with the audience and drives engagement.";
pub const TAKEAWAY_INSUFFICIENT: &str = "Insufficient data to generate a meaningful takeaway. Ensure all required data is provided for future reports.";
pub const TAKEAWAY_ERROR: &str = "Unable to generate insights due to an error.";

/// Insights for one (client, month) run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub platform_insights: Vec<String>,
    pub kpi_insights: Vec<String>,
    pub content_insights: Vec<String>,
    pub key_takeaway: String,
}

impl InsightBundle {
    /// Bundle returned when the inputs could not be used at all
    pub fn degraded() -> Self {
        Self {
            platform_insights: Vec::new(),
            kpi_insights: Vec::new(),
            content_insights: Vec::new(),
            key_takeaway: TAKEAWAY_ERROR.to_string(),
        }
    }

    pub fn all_insights(&self) -> impl Iterator<Item = &String> + '_ {
        self.platform_insights
            .iter()
            .chain(&self.kpi_insights)
            .chain(&self.content_insights)
    }
}

/// Word lists driving content insights and the takeaway verdict
#[derive(Debug, Clone)]
pub struct InsightLexicon {
    /// Phrases in the highlights that get their sentence quoted as an insight
    pub positive_phrases: Vec<String>,
    /// Wording that marks an insight as positive
    pub positive_keywords: Vec<String>,
    /// Wording that marks an insight as negative
    pub negative_keywords: Vec<String>,
}

impl Default for InsightLexicon {
    fn default() -> Self {
        let owned =
            |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            positive_phrases: owned(&[
                "performed well",
                "high engagement",
                "popular",
                "successful",
                "resonated",
                "positive feedback",
                "strong performance",
            ]),
            positive_keywords: owned(&["exceeded", "strong", "significant", "grew", "performed well"]),
            negative_keywords: owned(&["below", "declined", "decreased", "underperformed"]),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsightSynthesizer {
    lexicon: InsightLexicon,
}

impl InsightSynthesizer {
    pub fn new(lexicon: InsightLexicon) -> Self {
        Self { lexicon }
    }

    pub fn synthesize(
        &self,
        strategy: &StrategyData,
        metrics: &MetricsCollection,
        highlights: &str,
    ) -> InsightBundle {
        log::info!("Generating insights");

        let platform_insights = self.platform_insights(metrics);
        let kpi_insights = self.kpi_insights(strategy, metrics);
        let content_insights = self.content_insights(strategy, highlights);

        let all: Vec<&String> = platform_insights
            .iter()
            .chain(&kpi_insights)
            .chain(&content_insights)
            .collect();
        let key_takeaway = self.key_takeaway(&all, highlights).to_string();

        log::debug!(
            "Generated {} platform, {} KPI and {} content insights",
            platform_insights.len(),
            kpi_insights.len(),
            content_insights.len()
        );

        InsightBundle {
            platform_insights,
            kpi_insights,
            content_insights,
            key_takeaway,
        }
    }

    /// Synthesize from JSON snapshots of the strategy data and metrics.
    ///
    /// Snapshots that fail to decode are logged and give
    /// [`InsightBundle::degraded`].
    pub fn synthesize_snapshots(
        &self,
        strategy_json: &str,
        metrics_json: &str,
        highlights: &str,
    ) -> InsightBundle {
        let decoded = serde_json::from_str::<StrategyData>(strategy_json).and_then(|strategy| {
            serde_json::from_str::<MetricsCollection>(metrics_json).map(|m| (strategy, m))
        });

        match decoded {
            Ok((strategy, metrics)) => self.synthesize(&strategy, &metrics, highlights),
            Err(e) => {
                log::error!("Error generating insights: {}", e);
                InsightBundle::degraded()
            }
        }
    }

    /// One sentence per known metric per platform, using the first value
    /// seen for that metric on that platform. Unknown platforms are skipped.
    pub fn platform_insights(&self, metrics: &MetricsCollection) -> Vec<String> {
        let mut platforms: IndexMap<Platform, IndexMap<&str, &str>> = IndexMap::new();

        for result in metrics.values() {
            let combined = platforms.entry(result.platform()).or_default();
            for (name, value) in result.metrics() {
                combined.entry(name).or_insert(value);
            }
        }

        let mut insights = Vec::new();
        for (platform, combined) in &platforms {
            if *platform == Platform::Unknown {
                continue;
            }
            for (name, value) in combined {
                if let Some(kind) = MetricKind::from_name(name) {
                    insights.push(platform_sentence(*platform, kind, value));
                }
            }
        }

        insights
    }

    /// Compare each KPI target with the first pooled metric whose name
    /// contains, or is contained in, the KPI name.
    pub fn kpi_insights(&self, strategy: &StrategyData, metrics: &MetricsCollection) -> Vec<String> {
        let mut pooled: IndexMap<String, &str> = IndexMap::new();
        for result in metrics.values() {
            for (name, value) in result.metrics() {
                pooled.entry(name.to_lowercase()).or_insert(value);
            }
        }

        let mut insights = Vec::new();
        for kpi in &strategy.kpis {
            let kpi_name = kpi.name.to_lowercase();

            let matched = pooled
                .iter()
                .find(|(name, _)| kpi_name.contains(name.as_str()) || name.contains(&kpi_name));

            match matched {
                Some((_, achieved)) => insights.push(kpi_sentence(&kpi_name, &kpi.value, achieved)),
                None => log::debug!("No metric matches KPI '{}'", kpi.name),
            }
        }

        insights
    }

    /// Pillars mentioned in the highlights, then the first highlights
    /// sentence for each positive phrase found.
    pub fn content_insights(&self, strategy: &StrategyData, highlights: &str) -> Vec<String> {
        let mut insights = Vec::new();
        if highlights.is_empty() {
            return insights;
        }

        let highlights_lower = highlights.to_lowercase();

        for pillar in &strategy.content_pillars {
            if !pillar.is_empty() && highlights_lower.contains(&pillar.to_lowercase()) {
                insights.push(format!(
                    "Content aligned with the '{}' pillar performed well this month.",
                    pillar
                ));
            }
        }

        for phrase in &self.lexicon.positive_phrases {
            let phrase = phrase.to_lowercase();
            if phrase.is_empty() || !highlights_lower.contains(&phrase) {
                continue;
            }

            let sentence = highlights
                .split('.')
                .find(|s| s.to_lowercase().contains(&phrase));
            if let Some(sentence) = sentence {
                insights.push(format!("{}.", sentence.trim()));
            }
        }

        insights
    }

    /// Pick the fixed takeaway sentence for a set of insights
    pub fn key_takeaway(&self, insights: &[&String], highlights: &str) -> &'static str {
        if insights.is_empty() {
            return if highlights.is_empty() {
                TAKEAWAY_INSUFFICIENT
            } else {
                TAKEAWAY_HIGHLIGHTS_ONLY
            };
        }

        let lowered: Vec<String> = insights.iter().map(|i| i.to_lowercase()).collect();
        let positive = count_mentioning(&lowered, &self.lexicon.positive_keywords);
        let negative = count_mentioning(&lowered, &self.lexicon.negative_keywords);

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => TAKEAWAY_STRONG,
            std::cmp::Ordering::Less => TAKEAWAY_BELOW,
            std::cmp::Ordering::Equal => TAKEAWAY_MIXED,
        }
    }
}

fn count_mentioning(lowered: &[String], keywords: &[String]) -> usize {
    lowered
        .iter()
        .filter(|insight| {
            keywords
                .iter()
                .any(|k| insight.contains(k.to_lowercase().as_str()))
        })
        .count()
}

fn platform_sentence(platform: Platform, kind: MetricKind, value: &str) -> String {
    let name = platform.display_name();
    match kind {
        MetricKind::Impressions => format!(
            "{} content reached a significant audience with {} impressions.",
            name, value
        ),
        MetricKind::Engagement => {
            format!("{} engagement was strong with {} interactions.", name, value)
        }
        MetricKind::Clicks => format!("{} drove {} clicks to the website.", name, value),
        MetricKind::Followers => format!("{} audience grew by {} new followers.", name, value),
        MetricKind::Conversion => format!("{} generated {} conversions.", name, value),
    }
}

fn kpi_sentence(kpi_name: &str, target: &str, achieved: &str) -> String {
    match (lenient_number(target), lenient_number(achieved)) {
        (Some(target_num), Some(achieved_num)) if achieved_num >= target_num => format!(
            "Exceeded KPI for {}: Target was {}, achieved {}.",
            kpi_name, target, achieved
        ),
        (Some(_), Some(_)) => format!(
            "Below KPI for {}: Target was {}, achieved {}.",
            kpi_name, target, achieved
        ),
        _ => format!(
            "KPI for {}: Target was {}, achieved {}.",
            kpi_name, target, achieved
        ),
    }
}
