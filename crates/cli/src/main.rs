// ABOUTME: CLI for collecting the latest reported earthquakes.
// ABOUTME: Fetches, persists with fallback, and prints the run report as JSON on stdout.

use anyhow::Result;
use clap::Parser;
use sismos_cli::{init_tracing, run, Args};

fn main() -> Result<()> {
    // Load .env first so env-backed flags can see it.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_format);

    let report = run(&args.to_config())?;

    if args.compact {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
