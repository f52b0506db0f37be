use std::path::PathBuf;

use clap::{Parser, Subcommand};

//-------------------------------------------------------------------------

/// A persistent, disk-resident B-tree index of unsigned 64-bit key/value
/// pairs. Each command below runs once against the given index file;
/// there is no long-lived server.
#[derive(Parser, Debug)]
#[command(name = "btrix", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new, empty index file. Fails if it already exists.
    Create {
        index: PathBuf,
    },

    /// Insert one key/value pair.
    Insert {
        index: PathBuf,
        key: u64,
        value: u64,
    },

    /// Look up a key.
    Search {
        index: PathBuf,
        key: u64,
    },

    /// Bulk-insert every `key,value` line of a delimited text file.
    Load {
        index: PathBuf,
        csv: PathBuf,
    },

    /// Dump every pair, in order, as `key value` lines.
    Print {
        index: PathBuf,
    },

    /// Write every pair, in order, as `key,value` lines to a text file.
    /// Fails if the output file already exists.
    Extract {
        index: PathBuf,
        csv: PathBuf,
    },
}

//-------------------------------------------------------------------------
