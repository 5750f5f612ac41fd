use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "clippings",
    about = "PR media coverage report assembly and export"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a coverage report for a client and print the preview.
    Report {
        #[arg(long)]
        client: String,
        #[arg(long, default_value_t = false)]
        international: bool,
        /// Report date, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// Skip the backend and use the local generator directly.
        #[arg(long, default_value_t = false)]
        offline: bool,
        /// Seed for reproducible offline output. Implies --offline.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Look up client name suggestions.
    Search { query: String },
    /// List the fixed client roster.
    Clients,
    /// Download a backend-rendered PDF report.
    Pdf {
        #[arg(long)]
        client: String,
        #[arg(long, default_value_t = false)]
        international: bool,
        /// Output path. Defaults to <client>-coverage.pdf.
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
    /// Generate a report and export the included articles as a PDF.
    Export {
        #[arg(long)]
        client: String,
        #[arg(long, default_value_t = false)]
        international: bool,
        #[arg(long)]
        date: Option<String>,
        /// Also email the exported PDF to this address.
        #[arg(long)]
        email: Option<String>,
    },
}

/// Cosmetic loading labels shown while a report request is in flight. The
/// sequence is advanced by an external timer and says nothing about the
/// actual request lifecycle.
pub const GENERATION_PHASES: [&str; 4] = [
    "Scanning coverage feeds",
    "Classifying outlets",
    "Scoring sentiment",
    "Assembling report",
];

#[derive(Debug, Default)]
pub struct PhaseSequence {
    index: usize,
}

impl PhaseSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current label and moves on, holding at the final one.
    pub fn advance(&mut self) -> &'static str {
        let label = GENERATION_PHASES[self.index];
        if self.index + 1 < GENERATION_PHASES.len() {
            self.index += 1;
        }
        label
    }
}
