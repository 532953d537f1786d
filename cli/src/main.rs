mod commands;
mod terminal;

use commands::{CommandLine, Commands, clean, discover};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Discover { domain, org, chaos } => {
            print::banner();
            discover::discover(domain, org, chaos).await
        }
        Commands::Clean => {
            print::header("cleaning previous runs");
            clean::clean()
        }
    }
}
