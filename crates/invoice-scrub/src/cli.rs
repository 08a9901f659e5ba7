use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "invoice-scrub",
    version,
    about = "PII redaction service for scanned bills and invoices"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Listen address (overrides config file setting)
    #[arg(long)]
    pub listen: Option<String>,

    /// Directory for temporary uploads (overrides config file setting)
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,
}
