//! CLI tool for extracting KPIs and content pillars from a strategy deck

use report_insights::StrategyExtractor;
use std::env;
use std::fs;
use std::process;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <strategy.pdf>", args[0]);
        eprintln!("       {} <strategy.txt> --text", args[0]);
        eprintln!();
        eprintln!("Prints the extracted KPIs and content pillars as JSON.");
        process::exit(1);
    }

    let path = &args[1];
    let plain_text = args.get(2).map(|a| a == "--text").unwrap_or(false);

    let extractor = StrategyExtractor::default();
    let data = if plain_text {
        match fs::read_to_string(path) {
            Ok(text) => extractor.extract(&text),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        extractor.extract_from_pdf(path)
    };

    match serde_json::to_string_pretty(&data) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
