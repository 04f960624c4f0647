use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(name = "herbtrace")]
#[command(about = "Botanical herb traceability from forest collection to consumer sale")]
#[command(long_about = "HerbTrace documents every processing step of an herb batch with a simulated \
                       AI verification, and certifies the batch once enough steps are verified. \
                       Start with 'herbtrace track' to open the processing tracker.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the product overview (default)
    Landing,
    /// Run the single-image AI verification mock
    Verify {
        /// Image of the herb to verify
        #[arg(help = "Path or file name of the herb image (contents are not read)")]
        image: PathBuf,
    },
    /// Open the interactive processing tracker
    Track,
    /// Run a scripted tracker session end to end
    Demo {
        /// Number of steps to submit
        #[arg(long, default_value = "5", help = "Steps to submit, one per stakeholder in supply-chain order")]
        steps: u32,
        /// Override the simulated verification delay
        #[arg(long, help = "Verification delay in milliseconds (defaults to configuration)")]
        delay_ms: Option<u64>,
        /// Print the final state as JSON
        #[arg(long, help = "Emit batch, steps and summary as JSON instead of text")]
        json: bool,
    },
    /// List the supply-chain stakeholder roles
    Stakeholders,
}

impl Commands {
    pub fn view_name(&self) -> &'static str {
        match self {
            Commands::Landing | Commands::Stakeholders => "landing",
            Commands::Verify { .. } => "dashboard",
            Commands::Track | Commands::Demo { .. } => "processing",
        }
    }
}
