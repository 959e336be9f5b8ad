use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::seq::SliceRandom;

use fastaplus::{write_record, FastaError, FastaStore};

use crate::open_output;

/// Draw a random subset of records, uniformly without replacement
#[derive(Clone, Debug, Parser)]
pub struct SampleArgs {
    /// input file
    #[arg(short, long)]
    input: PathBuf,
    /// the number of random sequences to retrieve
    #[arg(short = 'l', long)]
    number: usize,
    /// taxonomy identifier assigned to every record
    #[arg(short = 't', long, default_value = "1")]
    taxid: String,
    /// output file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn sample_records(args: &SampleArgs) -> Result<()> {
    let mut store = FastaStore::new();
    store.load_file_raw(&args.input, &args.taxid)?;

    let seqs = store.get_all();
    if args.number > seqs.len() {
        return Err(FastaError::OutOfRange(format!(
            "requested {} records but the store holds {}",
            args.number,
            seqs.len()
        ))
        .into());
    }

    let mut rng = rand::thread_rng();
    let mut out = open_output(args.output.as_deref())?;
    for si in store.ids().choose_multiple(&mut rng, args.number) {
        let Some(body) = seqs.get(si) else { continue };
        write_record(&mut out, store.meta_for_si(si).unwrap_or(""), body)?;
    }
    out.flush()?;
    Ok(())
}
