//! CLI tool for reading platform metrics from a performance screenshot

use report_insights::{OcrConfig, OcrEngine, ScreenshotExtractor};
use std::env;
use std::path::Path;
use std::process;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <image_file>", args[0]);
        eprintln!();
        eprintln!("Runs Tesseract on the binarized image and prints the metrics as JSON.");
        eprintln!("Honours TESSERACT_PATH, OCR_LANGUAGE and OCR_THRESHOLD.");
        process::exit(1);
    }

    let config = match OcrConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let engine = OcrEngine::new(config);
    let result = ScreenshotExtractor::default().analyze_image(Path::new(&args[1]), &engine);

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    if result.is_failure() {
        process::exit(2);
    }
}
