pub mod clean;
pub mod discover;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ambit")]
#[command(about = "Passive attack-surface discovery.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover the attack surface of an organisation
    #[command(alias = "d")]
    Discover {
        /// Root domain to start from, e.g. example.com
        domain: String,
        /// Organisation name (defaults to the domain)
        org: Option<String>,
        /// Try the public Chaos dataset first
        #[arg(long)]
        chaos: bool,
    },
    /// Remove artifacts of previous runs
    #[command(alias = "c")]
    Clean,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
