//! CLI tool for processing one client's month end to end
//!
//! Expects the client directory layout:
//!   <client>/Strategy_Deck/*.pdf
//!   <client>/Monthly_Data/<month>/*.png|*.jpg and *highlight*.txt
//! and writes snapshots to <client>/Processed_Data/.

use report_insights::pipeline::{latest_month, run_month, MonthInputs};
use report_insights::snapshot::write_month;
use report_insights::{OcrConfig, OcrEngine};
use std::env;
use std::path::Path;
use std::process;
use std::time::Instant;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <client_dir> [month]", args[0]);
        eprintln!();
        eprintln!("Processes the given month (default: latest) and prints the insights as JSON.");
        process::exit(1);
    }

    let client_dir = Path::new(&args[1]);
    let monthly_data_dir = client_dir.join("Monthly_Data");

    let month = match args.get(2) {
        Some(month) => month.clone(),
        None => match latest_month(&monthly_data_dir) {
            Ok(Some(month)) => month,
            Ok(None) => {
                eprintln!("Error: no monthly data directories in {}", monthly_data_dir.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
    };
    log::info!("Processing {} for month {}", client_dir.display(), month);

    let inputs = match MonthInputs::discover(
        &client_dir.join("Strategy_Deck"),
        &monthly_data_dir.join(&month),
    ) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let config = match OcrConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let start = Instant::now();
    let report = match run_month(&inputs, &OcrEngine::new(config)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_month(&client_dir.join("Processed_Data"), &month, &report) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
    log::info!("Finished in {}ms", start.elapsed().as_millis());

    match serde_json::to_string_pretty(&report.insights) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
