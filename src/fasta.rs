//! FASTA on-disk format: record reader, indexed header form, dumper.
//!
//! A header line starts with `>`; all following non-header lines
//! concatenate into the body until the next header or EOF. The indexed
//! header form is `>si|<SI>|ti|<TI>|ss|<SS>|\t<META>`.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{FastaError, Result};

/// Column width of dumped bodies.
pub const BODY_LINE_WIDTH: usize = 80;

/// The parsed indexed header of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub si: String,
    pub ti: String,
    pub ss: String,
    pub meta: String,
}

impl Header {
    /// Parses the indexed form (with or without the leading `>`). The meta
    /// field is everything after the first tab, verbatim; a header without
    /// a tab has empty meta.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_prefix('>').unwrap_or(line);
        let (fields, meta) = match line.split_once('\t') {
            Some((fields, meta)) => (fields, meta),
            None => (line, ""),
        };
        let parts: Vec<&str> = fields.split('|').collect();
        if parts.len() < 6 || parts[0] != "si" || parts[2] != "ti" || parts[4] != "ss" {
            return Err(FastaError::BadFormat(format!(
                "not an indexed fasta header: {line:?}"
            )));
        }
        let (si, ti, ss) = (parts[1], parts[3], parts[5]);
        if si.is_empty() || ti.is_empty() {
            return Err(FastaError::BadFormat(format!(
                "empty identifier in indexed fasta header: {line:?}"
            )));
        }
        Ok(Self {
            si: si.to_string(),
            ti: ti.to_string(),
            ss: ss.to_string(),
            meta: meta.to_string(),
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "si|{}|ti|{}|ss|{}|\t{}", self.si, self.ti, self.ss, self.meta)
    }
}

/// Streaming `(header, body)` iterator over FASTA text. Header lines are
/// yielded without the leading `>`; body lines are concatenated with blank
/// lines skipped. A final line without a trailing newline still counts.
pub struct FastaReader<R> {
    reader: R,
    pending: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = io::Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut line = String::new();

        // scan forward to the next header, skipping leading junk
        while self.pending.is_none() {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    let text = line.trim_end_matches(['\n', '\r']);
                    if let Some(cap) = text.strip_prefix('>') {
                        self.pending = Some(cap.to_string());
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        let cap = match self.pending.take() {
            Some(cap) => cap,
            None => return None,
        };

        let mut body = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {
                    let text = line.trim_end_matches(['\n', '\r']);
                    if let Some(next_cap) = text.strip_prefix('>') {
                        self.pending = Some(next_cap.to_string());
                        break;
                    }
                    body.push_str(text);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        Some(Ok((cap, body)))
    }
}

/// Opens a FASTA file for reading, decompressing `.gz` inputs
/// transparently.
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|source| FastaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let gz = path.extension().and_then(|e| e.to_str()) == Some("gz");
    Ok(if gz {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}

/// Writes one record: `>` + header line, body at [`BODY_LINE_WIDTH`]
/// columns.
pub fn write_record<W: Write>(w: &mut W, header: &str, body: &str) -> io::Result<()> {
    writeln!(w, ">{header}")?;
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let end = (i + BODY_LINE_WIDTH).min(bytes.len());
        w.write_all(&bytes[i..end])?;
        writeln!(w)?;
        i = end;
    }
    Ok(())
}
