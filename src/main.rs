use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use adforecast::{load_fallback_table, provider_from_env, render_csv, run_estimate, GoogleAdsConfig};

/// Estimate Google Ads campaign spend, revenue and ROI.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the two-section CSV instead of JSON.
    #[arg(long)]
    csv: bool,
    /// JSON file replacing the built-in fallback table.
    #[arg(long, value_name = "FILE", env = "ADFORECAST_FALLBACK_TABLE")]
    fallback_table: Option<PathBuf>,
    /// Estimate request JSON. Read from stdin when omitted or `-`.
    #[arg(value_name = "REQUEST")]
    input: Option<PathBuf>,
}

impl Cli {
    fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = match cli.input_path() {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read request from stdin")?;
            buf
        }
    };
    let body: serde_json::Value = serde_json::from_str(&raw).context("request is not valid JSON")?;

    let table = load_fallback_table(cli.fallback_table.as_deref())?;
    let provider = provider_from_env(GoogleAdsConfig::default())?;

    let estimate = run_estimate(&body, provider.as_ref(), &table).await?;

    if cli.csv {
        println!("{}", render_csv(&estimate.result));
    } else {
        println!("{}", serde_json::to_string_pretty(&estimate.result)?);
    }
    Ok(())
}
