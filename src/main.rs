// In src/main.rs

use bfloat16::config::{OutputFormat, CONFIG};
use bfloat16::inspect::{inspect, render_text};

use anyhow::Context;
use log::{debug, info};

const USAGE: &str = "usage: bfloat16 VALUE... (decimal, inf, nan, or 0x-prefixed bit pattern)";

/// Main entry point for the `bfloat16` inspector.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        anyhow::bail!(USAGE);
    }

    let config = &*CONFIG;
    debug!("Using configuration: {config:?}");

    for arg in &args {
        let report = inspect(arg, config).with_context(|| format!("Failed to inspect {arg:?}"))?;
        match config.output.format {
            OutputFormat::Text => print!("{}", render_text(&report)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to encode report as JSON")?;
                println!("{json}");
            }
        }
    }

    info!("Inspected {} value(s).", args.len());
    Ok(())
}
