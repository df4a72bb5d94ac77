// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xbows_driver")]
#[command(author, version, about = "X-Bows custom layer programmer")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the upload packet sequence for a config
    #[command(visible_alias = "b")]
    Build {
        /// Config file (defaults to the user config directory)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Override the layer from the config
        #[arg(short, long)]
        layer: Option<u8>,

        /// Write the packets to a dump file
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print full packet bytes instead of one line per packet
        #[arg(long)]
        hex: bool,
    },

    /// Verify and decode a packet dump
    #[command(visible_alias = "i")]
    Inspect {
        /// Dump file written by `build --out`
        file: PathBuf,
    },

    /// List key names and their lighting bitmap positions
    #[command(visible_alias = "k")]
    Keys,

    /// Write an example config
    InitConfig {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}
