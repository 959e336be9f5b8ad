//! XNU self-similarity filter (Claverie & States, 1993).
//!
//! Scans every off-diagonal of the sequence-against-itself score matrix,
//! accumulating PAM scores with rise/fall cutoffs derived from the
//! Karlin-Altschul statistics, and substitutes the positions of
//! high-scoring self-similar regions.

use crate::filters::pam::{residue_index, Pam, ScoreMatrix, DAYHOFF_FREQ};

/// XNU parameters.
#[derive(Debug, Clone)]
pub struct XnuParams {
    /// Substitution matrix (and its lambda).
    pub pam: Pam,
    /// Absolute score cutoff; non-zero overrides the `pcut`-derived cutoff.
    pub scut: i64,
    /// Desired false-positive probability.
    pub pcut: f64,
    /// Minimum diagonal offset, inclusive.
    pub mcut: i64,
    /// Maximum diagonal offset, inclusive; <= 0 means `length - 1`.
    pub ncut: i64,
    /// Mark the higher-index member of each hit pair.
    pub ascend: bool,
    /// Mark the lower-index member of each hit pair.
    pub descend: bool,
    /// Invert the mask, keeping only the self-similar positions.
    pub repeats: bool,
    /// Substitution character; 0 lowercases instead.
    pub subchar: u8,
}

impl Default for XnuParams {
    fn default() -> Self {
        Self {
            pam: Pam::Pam60,
            scut: 0,
            pcut: 0.01,
            mcut: 1,
            ncut: 4,
            ascend: true,
            descend: true,
            repeats: false,
            subchar: b'X',
        }
    }
}

/// The XNU filter. Immutable after construction; one instance per caller.
#[derive(Debug, Clone)]
pub struct Xnu {
    scut: i64,
    pcut: f64,
    mcut: i64,
    ncut: i64,
    ascend: bool,
    descend: bool,
    repeats: bool,
    subchar: u8,
    k: f64,
    h: f64,
    lambda: f64,
    matrix: &'static ScoreMatrix,
}

impl Default for Xnu {
    fn default() -> Self {
        Self::new(XnuParams::default())
    }
}

impl Xnu {
    pub fn new(params: XnuParams) -> Self {
        let lambda = params.pam.lambda();
        let matrix = params.pam.matrix();
        Self {
            scut: params.scut,
            pcut: params.pcut,
            mcut: params.mcut,
            ncut: params.ncut,
            ascend: params.ascend,
            descend: params.descend,
            repeats: params.repeats,
            subchar: params.subchar,
            k: 0.2,
            h: einfo(matrix, lambda),
            lambda,
            matrix,
        }
    }

    /// Returns `input` uppercased, with every position of a self-similar
    /// region replaced by the substitution character (or lowercased when
    /// the substitution character is 0). With `repeats` set the complement
    /// is substituted instead. The output always has the length of the
    /// input.
    pub fn filter(&self, input: &str) -> String {
        let seq = input.as_bytes();
        let len = seq.len() as i64;
        let iseq: Vec<usize> = seq.iter().map(|&b| residue_index(b)).collect();
        let mut hit = vec![false; seq.len() + 1];

        let mut noff = len - 1;
        if self.ncut > 0 {
            noff = self.ncut;
        }

        let topcut = if self.scut != 0 {
            self.scut
        } else {
            let s0 = -(self.pcut * self.h / (noff as f64 * self.k)).ln() / self.lambda;
            if s0 > 0.0 {
                (s0 + s0.ln() / self.lambda + 0.5).floor() as i64
            } else {
                0
            }
        };
        let fallcut = ((self.k / 0.001).ln() / self.lambda) as i64;

        let mut off = self.mcut;
        while off <= noff {
            let mut sum = 0i64;
            let mut top = 0i64;
            let mut beg = off;
            let mut end = 0i64;

            let mut i = off;
            while i < len {
                sum += self.matrix[iseq[i as usize]][iseq[(i - off) as usize]];
                if sum > top {
                    top = sum;
                    end = i;
                }
                if top >= topcut && top - sum > fallcut {
                    self.mark(&mut hit, beg, end, off);
                    sum = 0;
                    top = 0;
                    beg = i + 1;
                    end = i + 1;
                } else if top - sum > fallcut {
                    sum = 0;
                    top = 0;
                    beg = i + 1;
                    end = i + 1;
                }
                if sum < 0 {
                    beg = i + 1;
                    end = i + 1;
                    sum = 0;
                    top = 0;
                }
                i += 1;
            }
            // trailing region still above the score cutoff
            if top >= topcut {
                self.mark(&mut hit, beg, end, off);
            }
            off += 1;
        }

        let mut out = Vec::with_capacity(seq.len());
        for (i, &b) in seq.iter().enumerate() {
            let mut c = b.to_ascii_uppercase();
            if hit[i] != self.repeats {
                if self.subchar == 0 {
                    c = c.to_ascii_lowercase();
                } else {
                    c = self.subchar;
                }
            }
            out.push(c);
        }
        match String::from_utf8(out) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    fn mark(&self, hit: &mut [bool], beg: i64, end: i64, off: i64) {
        let mut k = beg;
        while k <= end {
            if self.ascend {
                hit[k as usize] = true;
            }
            if self.descend {
                hit[(k - off) as usize] = true;
            }
            k += 1;
        }
    }
}

/// Expected information per aligned pair under the background composition:
/// `lambda * sum_ij f_i f_j s_ij exp(lambda s_ij) / sum_ij f_i f_j`.
fn einfo(matrix: &ScoreMatrix, lambda: f64) -> f64 {
    let mut sum = 0.0;
    let mut tot = 0.0;
    for (i, &fi) in DAYHOFF_FREQ.iter().enumerate() {
        for (j, &fj) in DAYHOFF_FREQ.iter().enumerate() {
            let fij = fi * fj;
            tot += fij;
            let s = matrix[i][j] as f64;
            sum += s * fij * (lambda * s).exp();
        }
    }
    lambda * sum / tot
}
