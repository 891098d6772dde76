use std::path::PathBuf;
use clap::Subcommand;
use crate::config::constants::DEFAULT_REPLAY_CHUNK_SIZE;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// Check the configuration file and report every problem
    Validate,
    /// Run the SSE relay server
    Serve {
        #[clap(short = 'H', long)]
        host: Option<String>,
        #[clap(short, long)]
        port: Option<u16>,
    },
    /// Feed a captured response document through the relay and print the SSE frames
    Replay {
        file: PathBuf,
        #[clap(short, long, default_value_t = DEFAULT_REPLAY_CHUNK_SIZE)]
        chunk_size: usize,
        /// Markdown document to apply the final replacements to
        #[clap(short, long)]
        markdown: Option<PathBuf>,
    },
}
