use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "harmwatch-bridge")]
#[command(
    author,
    version,
    about = "Real-time harm classification and broadcast hub"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ingestion and broadcast server
    Serve(ServeArgs),

    /// Post built-in sample events to a running server
    Simulate {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://127.0.0.1:8000")]
        target: String,

        /// Pause between posts in milliseconds
        #[arg(short, long, default_value = "2000")]
        interval_ms: u64,

        /// Post the samples in random order
        #[arg(short, long)]
        shuffle: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify one text offline and print the verdict
    Classify {
        /// Text to classify
        text: String,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "harmwatch.yaml", env = "HARMWATCH_CONFIG")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Per-subscriber send timeout in milliseconds
    #[arg(long)]
    pub send_timeout_ms: Option<u64>,

    /// Payloads buffered per subscriber
    #[arg(long)]
    pub subscriber_buffer: Option<usize>,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "HARMWATCH_ALLOW_ANY_ORIGIN", value_parser = parse_flag)]
    pub cors_allow_any: Option<bool>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}
