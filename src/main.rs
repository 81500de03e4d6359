// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use the_includer::backends::{FsResourceHost, GlobalTable};
use the_includer::config::{load_and_validate_config, RuntimeBuilder};
use the_includer::engine::Includer;
use the_includer::traits::ProgressReport;
use tracing_subscriber::EnvFilter;

/// Print one progress report as a JSON line.
fn print_report(report: &ProgressReport) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("could not encode progress report: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <config.yaml|config.toml> <unit> [unit ...]", args[0]);
        eprintln!("Example: {} demos/includer.yaml app Underscore", args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let units = &args[2..];
    eprintln!("the-includer {}", Includer::VERSION);

    let start_time = Instant::now();
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("failed to load {}", config_file))?;

    // Resource locations are relative to the config file
    let base = Path::new(config_file)
        .parent()
        .unwrap_or_else(|| Path::new("."));
    let globals = GlobalTable::new();
    let host = FsResourceHost::new(base, globals.clone());

    let includer = RuntimeBuilder::from_config(&config, Arc::new(host))?
        .locator(globals)
        .observer(print_report)
        .build()?;

    let result = includer.require(units.iter().cloned()).await;
    includer.shutdown();

    let values = match result {
        Ok(values) => values,
        Err(e) => bail!("resolution failed: {}", e),
    };

    for (unit, value) in units.iter().zip(values) {
        println!("{}", serde_json::json!({ "unit": unit, "value": value }));
    }
    eprintln!("resolved {} units in {:?}", units.len(), start_time.elapsed());

    Ok(())
}
