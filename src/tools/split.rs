use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fastaplus::{write_record, FastaError, FastaStore};

/// Highest accepted split count.
const MAX_SPLITS: usize = 800;

/// Round-robin records into numbered output files
#[derive(Clone, Debug, Parser)]
pub struct SplitArgs {
    /// input file
    #[arg(short, long)]
    input: PathBuf,
    /// the number of output files
    #[arg(short = 'l', long)]
    number: usize,
    /// taxonomy identifier assigned to every record
    #[arg(short = 't', long, default_value = "1")]
    taxid: String,
    /// output file name prefix
    #[arg(short, long, default_value = "fasta")]
    output: String,
}

pub fn split_records(args: &SplitArgs) -> Result<()> {
    if args.number == 0 || args.number > MAX_SPLITS {
        return Err(FastaError::OutOfRange(format!(
            "split count must be between 1 and {MAX_SPLITS}, got {}",
            args.number
        ))
        .into());
    }

    let mut store = FastaStore::new();
    store.load_file_raw(&args.input, &args.taxid)?;

    let mut files = Vec::with_capacity(args.number);
    for i in 1..=args.number {
        let name = format!("{}.{i}", args.output);
        let file =
            File::create(&name).with_context(|| format!("cannot open file: {name}"))?;
        files.push(BufWriter::new(file));
    }

    let seqs = store.get_all();
    for (x, si) in store.ids().iter().enumerate() {
        let Some(body) = seqs.get(si) else { continue };
        let out = &mut files[x % args.number];
        write_record(out, store.meta_for_si(si).unwrap_or(""), body)?;
    }
    for mut file in files {
        file.flush()?;
    }
    Ok(())
}
