use clap::{Parser, Subcommand};
use is3dump_common::TimeRange;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "is3dump")]
#[command(author, version, about = "IStream3 channel stream dumper")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging and per-record output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dump one stream of a channel as ADTS (AAC) or Annex-B (H.264)
    Dump {
        /// Channel directory
        #[arg(required = true)]
        channel: PathBuf,

        /// Stream id (default: from config, else 0)
        #[arg(short, long)]
        id: Option<u64>,

        /// Output file (default: <channel_id>.<encoding>)
        #[arg(short = 'd', long = "dump", value_name = "PATH")]
        output: Option<PathBuf>,

        /// Timestamp range BEGIN,END; either side may be empty or 0
        #[arg(short, long, value_name = "BEGIN,END")]
        range: Option<TimeRange>,

        /// Replace an existing output file
        #[arg(short = 'o', long = "override")]
        overwrite: bool,
    },

    /// Write stream metadata files built from the first chunk
    Streams {
        /// Channel directory
        #[arg(required = true)]
        channel: PathBuf,

        /// Directory to write the files into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List the index records of a channel
    Index {
        /// Channel directory
        #[arg(required = true)]
        channel: PathBuf,

        /// Only list records of this stream
        #[arg(short, long)]
        id: Option<u64>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
