mod filter;
use filter::{filter_records, FilterArgs};
mod sample;
use sample::{sample_records, SampleArgs};
mod split;
use split::{split_records, SplitArgs};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// FASTA record store and low-complexity filter tools
#[derive(Clone, Debug, Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Emit RAW, SEG, XNU and SEG+XNU blocks for every record
    Filter(FilterArgs),
    /// Draw a random subset of records without replacement
    Rand(SampleArgs),
    /// Round-robin records into numbered output files
    Split(SplitArgs),
}

/// The selected output file, or stdout when none was requested.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(
            || format!("cannot open file: {}", path.display()),
        )?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.operation {
        Operation::Filter(filter_args) => filter_records(filter_args),
        Operation::Rand(sample_args) => sample_records(sample_args),
        Operation::Split(split_args) => split_records(split_args),
    }
}
