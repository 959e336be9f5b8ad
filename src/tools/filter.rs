use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use fastaplus::{FastaStore, Pam, Seg, SegParams, Xnu, XnuParams};

use crate::open_output;

/// Run the SEG and XNU filters over every record of a raw-header fasta file
#[derive(Clone, Debug, Parser)]
pub struct FilterArgs {
    /// input file
    #[arg(short, long)]
    input: PathBuf,
    /// output file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// taxonomy identifier assigned to every record
    #[arg(short = 't', long, default_value = "1")]
    taxid: String,
    /// SEG window size
    #[arg(short = 'W', long)]
    window: Option<i64>,
    /// high complexity cutoff
    #[arg(short = 'H', long)]
    hicut: Option<f64>,
    /// low complexity cutoff
    #[arg(short = 'L', long)]
    locut: Option<f64>,
    /// maximum trimming of a raw segment
    #[arg(short = 'T', long)]
    maxtrim: Option<i64>,
    /// maximum number of ambiguous characters per window
    #[arg(short = 'X', long)]
    maxxs: Option<i64>,
    /// PAM matrix to use: 60/120/250
    #[arg(short = 'P', long)]
    pam: Option<String>,
    /// absolute score cutoff
    #[arg(short = 'S', long)]
    score: Option<i64>,
    /// probability cutoff
    #[arg(short = 'p', long)]
    probability: Option<f64>,
    /// minimum search offset
    #[arg(short = 'm', long)]
    min_search_offset: Option<i64>,
    /// maximum search offset
    #[arg(short = 'M', long)]
    max_search_offset: Option<i64>,
}

pub fn filter_records(args: &FilterArgs) -> Result<()> {
    let mut store = FastaStore::new();
    store.load_file_raw(&args.input, &args.taxid)?;

    let mut seg_params = SegParams::default();
    if let Some(window) = args.window {
        seg_params.window = window;
    }
    if let Some(hicut) = args.hicut {
        seg_params.hicut = hicut;
    }
    if let Some(locut) = args.locut {
        seg_params.locut = locut;
    }
    if let Some(maxtrim) = args.maxtrim {
        seg_params.max_trim = maxtrim;
    }
    if let Some(maxxs) = args.maxxs {
        seg_params.max_x = maxxs;
    }
    let seg = Seg::new(seg_params);

    let mut xnu_params = XnuParams::default();
    if let Some(pam) = &args.pam {
        xnu_params.pam = Pam::parse(pam)?;
    }
    if let Some(score) = args.score {
        xnu_params.scut = score;
    }
    if let Some(probability) = args.probability {
        xnu_params.pcut = probability;
    }
    if let Some(min_offset) = args.min_search_offset {
        xnu_params.mcut = min_offset;
    }
    if let Some(max_offset) = args.max_search_offset {
        xnu_params.ncut = max_offset;
    }
    let xnu = Xnu::new(xnu_params);

    let mut out = open_output(args.output.as_deref())?;
    let seqs = store.get_all();
    for si in store.ids() {
        let Some(body) = seqs.get(si) else { continue };
        let segged = seg.filter(body);
        writeln!(out, ">{}", store.formatted_header(si))?;
        writeln!(out, "RAW:\n{body}")?;
        writeln!(out, "SEG:\n{segged}")?;
        writeln!(out, "XNU:\n{}", xnu.filter(body))?;
        writeln!(out, "SEG+XNU:\n{}", xnu.filter(&segged))?;
    }
    out.flush()?;
    Ok(())
}
