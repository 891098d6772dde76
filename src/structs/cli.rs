use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser, Debug)]
#[clap(name = "editor-assistant-relay")]
#[clap(about = "Streams editor-assistant model output to clients as Server-Sent Events", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
