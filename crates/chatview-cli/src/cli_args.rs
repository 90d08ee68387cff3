use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "chatview")]
#[command(about = "Streaming markdown/LaTeX renderer for live chat panels")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Render a message once and print the script-ready fragment
    Render {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Print the HTML fragment without the script-literal escaping
        #[arg(long)]
        raw: bool,

        /// Leave out the code block action buttons
        #[arg(long)]
        no_buttons: bool,
    },
    /// Replay a message through the mock stream, re-rendering each snapshot
    Stream {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Characters per simulated delta
        #[arg(long, default_value = "16")]
        chunk_size: usize,

        /// Print only the final snapshot
        #[arg(long = "final")]
        final_only: bool,

        /// Print the panel mount/update scripts instead of bare fragments
        #[arg(long)]
        script: bool,
    },
}
