//! Integration tests for the report-insights library

use report_insights::insights::{
    TAKEAWAY_BELOW, TAKEAWAY_HIGHLIGHTS_ONLY, TAKEAWAY_INSUFFICIENT, TAKEAWAY_MIXED,
    TAKEAWAY_STRONG,
};
use report_insights::snapshot::{load_json, write_month, SnapshotPaths};
use report_insights::{
    InsightBundle, InsightSynthesizer, Kpi, MetricsCollection, MonthInputs, OcrConfig, OcrEngine,
    Pipeline, Platform, ScreenshotExtractor, ScreenshotResult, StrategyData, StrategyExtractor,
};
use std::fs;

// Helper to run OCR text through the screenshot extractor as if it came from a file
fn collect(shots: &[(&str, &str)]) -> MetricsCollection {
    let extractor = ScreenshotExtractor::default();
    shots
        .iter()
        .map(|(name, text)| {
            let path = format!("/clients/acme/Monthly_Data/2024-03/{}", name);
            (
                name.to_string(),
                ScreenshotResult::Extracted(extractor.extract(text, &path)),
            )
        })
        .collect()
}

fn strategy(kpis: &[(&str, &str)], pillars: &[&str]) -> StrategyData {
    StrategyData {
        kpis: kpis
            .iter()
            .map(|(name, value)| Kpi {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect(),
        content_pillars: pillars.iter().map(|p| p.to_string()).collect(),
    }
}

// ============================================================================
// Strategy Extraction Tests
// ============================================================================

#[test]
fn test_strategy_section_heading_end_to_end() {
    let data = StrategyExtractor::default().extract("KPIs\nReach: 5000\nClicks: 200\n\nOther text");
    assert_eq!(
        data.kpis,
        vec![
            Kpi {
                name: "Reach".to_string(),
                value: "5000".to_string()
            },
            Kpi {
                name: "Clicks".to_string(),
                value: "200".to_string()
            },
        ]
    );
}

#[test]
fn test_strategy_full_deck() {
    let deck = "Acme 2024 Social Strategy\n\
                Key Performance Indicators\n\
                Impressions: 10,000\n\
                Engagement rate: 3%\n\
                \n\
                Content Pillars\n\
                Product education\n\
                * examples below\n\
                Customer stories\n\
                \n\
                Appendix";
    let data = StrategyExtractor::default().extract(deck);
    assert_eq!(data.kpis.len(), 2);
    assert_eq!(data.kpis[1].name, "Engagement rate");
    assert_eq!(data.kpis[1].value, "3%");
    assert_eq!(data.content_pillars, vec!["Product education", "Customer stories"]);
}

// ============================================================================
// Screenshot Extraction Tests
// ============================================================================

#[test]
fn test_screenshot_extraction() {
    let result = ScreenshotExtractor::default().extract(
        "Instagram Insights\nAccounts reached\nImpressions: 12,000\nNew followers 85",
        "/shots/ig_march.png",
    );
    assert_eq!(result.platform, Platform::Instagram);
    assert_eq!(result.image_name, "ig_march.png");
    assert_eq!(result.metrics.get("impressions").map(String::as_str), Some("12,000"));
    assert_eq!(result.metrics.get("followers").map(String::as_str), Some("85"));
}

#[test]
fn test_screenshot_empty_text() {
    let result = ScreenshotExtractor::default().extract("", "blank.png");
    assert_eq!(result.platform, Platform::Unknown);
    assert!(result.metrics.is_empty());
}

// ============================================================================
// Insight Synthesis Tests
// ============================================================================

#[test]
fn test_kpi_comparison_correctness() {
    let metrics = collect(&[("fb.png", "Facebook Page\nImpressions: 12000")]);
    let synth = InsightSynthesizer::default();

    let bundle = synth.synthesize(&strategy(&[("Impressions", "10,000")], &[]), &metrics, "");
    assert_eq!(bundle.kpi_insights.len(), 1);
    assert!(bundle.kpi_insights[0].contains("Exceeded"));

    let bundle = synth.synthesize(&strategy(&[("Impressions", "15000")], &[]), &metrics, "");
    assert!(bundle.kpi_insights[0].contains("Below"));
}

#[test]
fn test_platform_grouping_first_seen_value() {
    let metrics = collect(&[
        ("ig_1.png", "Instagram\nEngagement: 500"),
        ("ig_2.png", "Instagram\nEngagement: 800"),
    ]);
    let bundle = InsightSynthesizer::default().synthesize(&StrategyData::default(), &metrics, "");

    let engagement: Vec<&String> = bundle
        .platform_insights
        .iter()
        .filter(|i| i.contains("engagement"))
        .collect();
    assert_eq!(engagement.len(), 1);
    assert!(engagement[0].starts_with("Instagram"));
    assert!(engagement[0].contains("500"));
    assert!(!engagement[0].contains("800"));
}

#[test]
fn test_unknown_platform_excluded() {
    let metrics = collect(&[("summary.png", "Weekly summary\nReach: 4000")]);
    assert_eq!(metrics["summary.png"].platform(), Platform::Unknown);

    let bundle = InsightSynthesizer::default().synthesize(
        &strategy(&[("Impressions", "3000")], &[]),
        &metrics,
        "",
    );
    assert!(bundle.platform_insights.is_empty());
    // the metric still feeds KPI comparison
    assert_eq!(bundle.kpi_insights.len(), 1);
}

#[test]
fn test_takeaway_degeneracy() {
    let synth = InsightSynthesizer::default();
    let empty = MetricsCollection::new();

    let bundle = synth.synthesize(&StrategyData::default(), &empty, "");
    assert_eq!(bundle.key_takeaway, TAKEAWAY_INSUFFICIENT);

    let bundle = synth.synthesize(&StrategyData::default(), &empty, "Quiet month overall.");
    assert!(bundle.content_insights.is_empty());
    assert_eq!(bundle.key_takeaway, TAKEAWAY_HIGHLIGHTS_ONLY);
}

#[test]
fn test_takeaway_strong_and_below() {
    let synth = InsightSynthesizer::default();

    let strong = synth.synthesize(
        &StrategyData::default(),
        &collect(&[("ig.png", "Instagram\nImpressions: 9000\nFollowers: 120")]),
        "",
    );
    assert_eq!(strong.key_takeaway, TAKEAWAY_STRONG);

    let below = synth.synthesize(
        &strategy(&[("Clicks", "900"), ("Conversion", "50")], &[]),
        &collect(&[("report.png", "Monthly report\nClicks: 300\nLeads: 10")]),
        "",
    );
    assert_eq!(below.kpi_insights.len(), 2);
    assert_eq!(below.key_takeaway, TAKEAWAY_BELOW);
}

#[test]
fn test_synthesis_is_idempotent() {
    let data = strategy(&[("Impressions", "10,000"), ("Engagement", "400")], &["Recipes"]);
    let metrics = collect(&[
        ("ig.png", "Instagram\nImpressions: 12000\nLikes: 300"),
        ("tw.png", "Twitter\nClicks: 45"),
    ]);
    let highlights = "Recipes resonated with followers. Reels had high engagement.";
    let synth = InsightSynthesizer::default();

    let first = synth.synthesize(&data, &metrics, highlights);
    let second = synth.synthesize(&data, &metrics, highlights);
    assert_eq!(first, second);
    assert_eq!(
        first.content_insights,
        vec![
            "Content aligned with the 'Recipes' pillar performed well this month.",
            "Reels had high engagement.",
            "Recipes resonated with followers.",
        ]
    );
}

#[test]
fn test_mixed_takeaway_from_neutral_insights() {
    let bundle = InsightSynthesizer::default().synthesize(
        &StrategyData::default(),
        &MetricsCollection::new(),
        "The giveaway was popular.",
    );
    assert_eq!(bundle.content_insights, vec!["The giveaway was popular."]);
    assert_eq!(bundle.key_takeaway, TAKEAWAY_MIXED);
}

// ============================================================================
// Pipeline and Snapshot Tests
// ============================================================================

#[test]
fn test_pipeline_degrades_on_unreadable_inputs() {
    let strategy_dir = tempfile::tempdir().unwrap();
    let month_dir = tempfile::tempdir().unwrap();
    fs::write(strategy_dir.path().join("deck.pdf"), b"not a pdf").unwrap();
    fs::write(month_dir.path().join("shot.png"), b"not an image").unwrap();
    fs::write(
        month_dir.path().join("highlights.txt"),
        "The campaign resonated with parents.",
    )
    .unwrap();

    let inputs = MonthInputs::discover(strategy_dir.path(), month_dir.path()).unwrap();
    let pipeline = Pipeline::new(OcrEngine::new(OcrConfig {
        tesseract_path: "/nonexistent/tesseract".to_string(),
        ..OcrConfig::default()
    }));
    let report = pipeline.run(&inputs).unwrap();

    assert_eq!(report.strategy, StrategyData::default());
    assert!(report.metrics["shot.png"].is_failure());
    assert_eq!(
        report.insights.content_insights,
        vec!["The campaign resonated with parents."]
    );
    assert_eq!(report.insights.key_takeaway, TAKEAWAY_MIXED);

    let out = tempfile::tempdir().unwrap();
    let processed = out.path().join("Processed_Data");
    let paths = write_month(&processed, "2024-03", &report).unwrap();
    assert_eq!(paths, SnapshotPaths::for_month(&processed, "2024-03"));

    let metrics_json = fs::read_to_string(&paths.metrics).unwrap();
    let strategy_json = fs::read_to_string(&paths.strategy).unwrap();
    let insights: InsightBundle = load_json(&paths.insights).unwrap();
    assert_eq!(insights, report.insights);

    // regenerating from the snapshots gives the same insights
    let regenerated = InsightSynthesizer::default().synthesize_snapshots(
        &strategy_json,
        &metrics_json,
        &report.highlights,
    );
    assert_eq!(regenerated, report.insights);
}
