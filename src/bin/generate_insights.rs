//! CLI tool for generating insights from extracted snapshots

use report_insights::InsightSynthesizer;
use std::env;
use std::fs;
use std::process;

fn read_or_exit(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        process::exit(1);
    })
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!(
            "Usage: {} <strategy_data.json> <metrics_data.json> <highlights.txt>",
            args[0]
        );
        process::exit(1);
    }

    let strategy_json = read_or_exit(&args[1]);
    let metrics_json = read_or_exit(&args[2]);
    let highlights = read_or_exit(&args[3]);

    let insights =
        InsightSynthesizer::default().synthesize_snapshots(&strategy_json, &metrics_json, &highlights);

    match serde_json::to_string_pretty(&insights) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
