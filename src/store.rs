//! The in-memory FASTA record store.
//!
//! Records are keyed by a synthetic sequence identifier (SI) and indexed by
//! taxonomy identifier (TI) and subsequence identifier (SS). Bodies are
//! normalized on load unless the clean record-import path is used.
//! Retrieval returns fresh `SI -> body` maps so callers never alias store
//! memory; complements are computed over the insertion-order list.

mod caps;
mod corpus;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{FastaError, Result};
use crate::fasta::{open_fasta, write_record, FastaReader, Header};

use caps::HeaderIndex;
use corpus::Corpus;

/// Width of the zero-padded synthetic sequence identifier.
pub const SI_WIDTH: usize = 30;

#[derive(Debug, Default)]
pub struct FastaStore {
    caps: HeaderIndex,
    corpus: Corpus,
    sid: i64,
}

impl FastaStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- loading -----------------------------------------------------------

    /// Parses an indexed header (`si|..|ti|..|ss|..|\tmeta`, `>` optional)
    /// and inserts it into every index. Returns the SI. The store is
    /// untouched on a parse error.
    pub fn load_indexed_header(&mut self, cap: &str) -> Result<String> {
        let header = Header::parse(cap)?;
        let si = header.si.clone();
        self.caps.insert(&header);
        Ok(si)
    }

    /// Synthesizes an SI for a raw header and inserts it. The whole raw
    /// header line becomes the meta field.
    pub fn load_raw_header(&mut self, cap: &str, ti: &str, ss: &str) -> String {
        let header = self.index_raw(cap, ti, ss);
        let si = header.si.clone();
        self.caps.insert(&header);
        si
    }

    /// Stores a body under `si`: verbatim when `clean`, otherwise through
    /// the normalization pipeline.
    pub fn load_body(&mut self, si: &str, body: &str, clean: bool) {
        if clean {
            self.corpus.load_clean(si, body);
        } else {
            self.corpus.load(si, body);
        }
    }

    /// Record import, indexed header form. The body is normalized.
    pub fn load_record(&mut self, cap: &str, body: &str) -> Result<String> {
        let si = self.load_indexed_header(cap)?;
        self.load_body(&si, body, false);
        Ok(si)
    }

    /// Record import, raw header form with the whole-sequence SS. The body
    /// is stored verbatim (in-program records are assumed clean).
    pub fn load_record_raw(&mut self, cap: &str, body: &str, ti: &str) -> String {
        self.load_record_raw_ss(cap, body, ti, "0")
    }

    /// Record import, raw header form with an explicit SS.
    pub fn load_record_raw_ss(&mut self, cap: &str, body: &str, ti: &str, ss: &str) -> String {
        let si = self.load_raw_header(cap, ti, ss);
        self.load_body(&si, body, true);
        si
    }

    /// Loads a (multi-)FASTA file whose headers are already in the indexed
    /// form. All-or-nothing: a malformed header leaves the store untouched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<i64> {
        self.load(path.as_ref(), None)
    }

    /// Loads a (multi-)FASTA file with raw headers, assigning every record
    /// to `ti`.
    pub fn load_file_raw(&mut self, path: impl AsRef<Path>, ti: &str) -> Result<i64> {
        self.load(path.as_ref(), Some(ti))
    }

    fn load(&mut self, path: &Path, ti: Option<&str>) -> Result<i64> {
        let reader = FastaReader::new(open_fasta(path)?);
        let mut raw = Vec::new();
        for item in reader {
            let (cap, body) = item.map_err(|source| FastaError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            raw.push((cap, body));
        }

        let count = raw.len() as i64;
        match ti {
            None => {
                // validate every header before the first insert
                let mut parsed = Vec::with_capacity(raw.len());
                for (cap, body) in &raw {
                    parsed.push((Header::parse(cap)?, body));
                }
                for (header, body) in parsed {
                    self.caps.insert(&header);
                    self.corpus.load(&header.si, body);
                }
            }
            Some(ti) => {
                for (cap, body) in &raw {
                    let header = self.index_raw(cap, ti, "0");
                    self.caps.insert(&header);
                    self.corpus.load(&header.si, body);
                }
            }
        }
        log::debug!("loaded {count} records from {}", path.display());
        Ok(count)
    }

    /// Builds the indexed header for a raw cap line:
    /// `si = pad30("{ti}{counter}/{ss}")`, meta = the raw line.
    fn index_raw(&mut self, cap: &str, ti: &str, ss: &str) -> Header {
        self.sid += 1;
        let compound = format!("{ti}{}/{ss}", self.sid);
        Header {
            si: format!("{:0>width$}", compound, width = SI_WIDTH),
            ti: ti.to_string(),
            ss: ss.to_string(),
            meta: cap.strip_prefix('>').unwrap_or(cap).to_string(),
        }
    }

    // --- retrieval ---------------------------------------------------------

    /// The record bound to `si` as a fresh one-entry map (empty when the SI
    /// is unknown).
    pub fn get_only(&self, si: &str) -> HashMap<String, String> {
        self.corpus.only(std::iter::once(si))
    }

    pub fn get_only_many<S: AsRef<str>>(&self, sis: &[S]) -> HashMap<String, String> {
        self.corpus.only(sis.iter().map(S::as_ref))
    }

    pub fn get_all(&self) -> HashMap<String, String> {
        self.corpus.all()
    }

    pub fn get_all_except(&self, si: &str) -> HashMap<String, String> {
        self.corpus.all_except(&HashSet::from([si]))
    }

    pub fn get_all_except_many<S: AsRef<str>>(&self, sis: &[S]) -> HashMap<String, String> {
        let excluded: HashSet<&str> = sis.iter().map(S::as_ref).collect();
        self.corpus.all_except(&excluded)
    }

    /// Every record filed under `ti`.
    pub fn get_by_ti(&self, ti: &str) -> HashMap<String, String> {
        self.corpus
            .only(self.caps.sis_for_ti(ti).iter().map(String::as_str))
    }

    /// SIs in insertion order.
    pub fn ids(&self) -> &[String] {
        self.corpus.ids()
    }

    pub fn ti_for_si(&self, si: &str) -> Option<&str> {
        self.caps.ti_for_si(si)
    }

    pub fn ss_for_si(&self, si: &str) -> Option<&str> {
        self.caps.ss_for_si(si)
    }

    pub fn meta_for_si(&self, si: &str) -> Option<&str> {
        self.caps.meta_for_si(si)
    }

    /// Last-loaded SI for `ss` (a known limitation: collisions overwrite).
    pub fn si_for_ss(&self, ss: &str) -> Option<&str> {
        self.caps.si_for_ss(ss)
    }

    pub fn sis_for_ti(&self, ti: &str) -> &[String] {
        self.caps.sis_for_ti(ti)
    }

    /// `"TotSeq"` is the record count, `"TotSeqSize"` the total number of
    /// body characters.
    pub fn get_summary(&self, what: &str) -> Result<i64> {
        match what {
            "TotSeq" => Ok(self.corpus.num_records()),
            "TotSeqSize" => Ok(self.corpus.total_size()),
            other => Err(FastaError::BadFormat(format!(
                "unknown summary key {other:?}"
            ))),
        }
    }

    /// 1-indexed inclusive substring of the body bound to `si`.
    pub fn get_substring(&self, si: &str, start: i64, stop: i64) -> Result<String> {
        let body = self.corpus.get(si).ok_or_else(|| {
            FastaError::OutOfRange(format!("unknown sequence identifier {si:?}"))
        })?;
        let len = body.len() as i64;
        if start < 1 || stop < start || stop > len {
            return Err(FastaError::OutOfRange(format!(
                "substring {start}..{stop} outside body of length {len}"
            )));
        }
        Ok(body[(start - 1) as usize..stop as usize].to_string())
    }

    /// The formatted header line for `si` (without the leading `>`).
    pub fn formatted_header(&self, si: &str) -> String {
        Header {
            si: si.to_string(),
            ti: self.caps.ti_for_si(si).unwrap_or("").to_string(),
            ss: self.caps.ss_for_si(si).unwrap_or("").to_string(),
            meta: self.caps.meta_for_si(si).unwrap_or("").to_string(),
        }
        .to_string()
    }

    // --- dumping -----------------------------------------------------------

    pub fn dump_all(&self, path: impl AsRef<Path>) -> Result<()> {
        self.dump(path.as_ref(), self.get_all())
    }

    pub fn dump_by_ti(&self, path: impl AsRef<Path>, ti: &str) -> Result<()> {
        self.dump(path.as_ref(), self.get_by_ti(ti))
    }

    pub fn dump_only<S: AsRef<str>>(&self, path: impl AsRef<Path>, sis: &[S]) -> Result<()> {
        self.dump(path.as_ref(), self.get_only_many(sis))
    }

    pub fn dump_all_except<S: AsRef<str>>(
        &self,
        path: impl AsRef<Path>,
        sis: &[S],
    ) -> Result<()> {
        self.dump(path.as_ref(), self.get_all_except_many(sis))
    }

    /// Writes the selected records in insertion order, indexed headers,
    /// 80-column bodies.
    fn dump(&self, path: &Path, seqs: HashMap<String, String>) -> Result<()> {
        let file = File::create(path).map_err(|source| FastaError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut w = BufWriter::new(file);
        for si in self.corpus.ids() {
            if let Some(body) = seqs.get(si) {
                write_record(&mut w, &self.formatted_header(si), body).map_err(|source| {
                    FastaError::Write {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
            }
        }
        w.flush().map_err(|source| FastaError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Drops every index and resets the SI counter.
    pub fn clear(&mut self) {
        self.caps.clear();
        self.corpus.clear();
        self.sid = 0;
    }
}
