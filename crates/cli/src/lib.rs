//! Command-line interface definitions for specd.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default address of a running specd, for the client commands.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(name = "specd")]
#[command(about = "specd - HTTP control service for USB spectrometers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the spectrometer service
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "specd.yaml")]
        config: PathBuf,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the HTTP port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the log format
        #[arg(long, value_enum)]
        log_format: Option<LogFormatArg>,
    },

    /// Validate configuration without starting the service
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "specd.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "specd.yaml")]
        output: PathBuf,
    },

    /// List devices and their configuration on a running service
    Devices {
        #[arg(long, env = "SPECD_URL", default_value = DEFAULT_URL)]
        url: String,
    },

    /// Poll spectra and log the value at a monitored wavelength
    Watch {
        #[arg(long, env = "SPECD_URL", default_value = DEFAULT_URL)]
        url: String,

        /// Device to poll (defaults to the first one listed)
        #[arg(short, long)]
        device: Option<String>,

        /// Delay between reads
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Wavelength to monitor in nm (defaults to the median wavelength)
        #[arg(long)]
        monitor_nm: Option<f64>,

        /// Set the integration time (ms) before polling
        #[arg(long)]
        int_time: Option<i64>,

        /// Set scans to average before polling
        #[arg(long)]
        scans: Option<i64>,

        /// Stop after this many reads
        #[arg(long)]
        count: Option<u64>,
    },

    /// Read one spectrum and export it as CSV
    Capture {
        #[arg(long, env = "SPECD_URL", default_value = DEFAULT_URL)]
        url: String,

        /// Device to read (defaults to the first one listed)
        #[arg(short, long)]
        device: Option<String>,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Dark reference CSV
        #[arg(long)]
        dark: Option<PathBuf>,

        /// Incident reference CSV; with --dark, exports absorbance
        #[arg(long)]
        incident: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
