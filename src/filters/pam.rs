//! Dayhoff PAM scoring matrices and their Karlin-Altschul parameters.
//!
//! The tables are the published 23-letter matrices over
//! `ARNDCQEGHILKMFPSTWYVBZX`; each lambda satisfies
//! `sum_ij f_i f_j exp(lambda * s_ij) = 1` for the Dayhoff composition over
//! the 20 canonical residues.

use crate::error::{FastaError, Result};

/// Column/row order of the scoring matrices.
pub const PAM_ALPHABET: &[u8; 23] = b"ARNDCQEGHILKMFPSTWYVBZX";

/// Index of `X` in [`PAM_ALPHABET`], the sink for unknown characters.
pub const UNKNOWN_INDEX: usize = 22;

/// Dayhoff background composition, ordered as [`PAM_ALPHABET`].
#[rustfmt::skip]
pub const DAYHOFF_FREQ: [f64; 20] = [
    0.087, 0.041, 0.040, 0.047, 0.033, 0.038, 0.050, 0.089, 0.034, 0.037,
    0.085, 0.081, 0.015, 0.040, 0.051, 0.070, 0.058, 0.010, 0.030, 0.065,
];

pub type ScoreMatrix = [[i64; 23]; 23];

const LAMBDA60: f64 = 0.344801;
const LAMBDA120: f64 = 0.345769;
const LAMBDA250: f64 = 0.226972;

#[rustfmt::skip]
const PAM60: ScoreMatrix = [
    [ 5, -5, -2, -2, -5, -3, -1,  0, -5, -3, -4, -5, -3, -6,  0,  1,  1, -9, -5, -1, -2, -2, -2],
    [-5,  8, -3, -6, -6,  0, -6, -7,  0, -4, -6,  2, -2, -7, -2, -2, -4,  0, -8, -5, -5, -2, -4],
    [-2, -3,  6,  2, -7, -2,  0, -1,  1, -4, -5,  0, -6, -6, -4,  1,  0, -6, -3, -5,  5, -1, -2],
    [-2, -6,  2,  7, -9,  0,  3, -2, -2, -5, -8, -2, -7, -9, -5, -2, -3,-10, -7, -6,  5,  2, -3],
    [-5, -6, -7, -9,  9, -9, -9, -6, -5, -4, -9, -9, -9, -8, -6, -1, -5,-11, -2, -4, -8, -9, -6],
    [-3,  0, -2,  0, -9,  7,  2, -5,  2, -5, -3, -1, -2, -9, -1, -3, -3, -8, -8, -4, -1,  5, -2],
    [-1, -6,  0,  3, -9,  2,  7, -2, -2, -4, -6, -2, -4, -9, -3, -2, -3,-11, -7, -4,  2,  5, -3],
    [ 0, -7, -1, -2, -6, -5, -2,  6, -6, -6, -7, -5, -6, -7, -3,  0, -3,-10, -9, -3, -1, -3, -3],
    [-5,  0,  1, -2, -5,  2, -2, -6,  8, -6, -4, -4, -6, -4, -2, -4, -4, -5, -1, -4,  0,  0, -3],
    [-3, -4, -4, -5, -4, -5, -4, -6, -6,  7,  1, -4,  1,  0, -6, -4, -1, -9, -4,  3, -4, -4, -3],
    [-4, -6, -5, -8, -9, -3, -6, -7, -4,  1,  6, -6,  2, -1, -5, -6, -4, -4, -4,  0, -6, -4, -3],
    [-5,  2,  0, -2, -9, -1, -2, -5, -4, -4, -6,  6,  0, -9, -4, -2, -1, -7, -7, -6, -1, -2, -3],
    [-3, -2, -6, -7, -9, -2, -4, -6, -6,  1,  2,  0, 10, -2, -6, -4, -2, -8, -7,  0, -6, -3, -3],
    [-6, -7, -6, -9, -8, -9, -9, -7, -4,  0, -1, -9, -2,  8, -7, -5, -6, -2,  3, -5, -7, -9, -5],
    [ 0, -2, -4, -5, -6, -1, -3, -3, -2, -6, -5, -4, -6, -7,  7,  0, -2, -9, -9, -4, -4, -2, -3],
    [ 1, -2,  1, -2, -1, -3, -2,  0, -4, -4, -6, -2, -4, -5,  0,  5,  1, -3, -5, -4, -1, -3, -2],
    [ 1, -4,  0, -3, -5, -3, -3, -3, -4, -1, -4, -1, -2, -6, -2,  1,  6, -8, -4, -1, -2, -3, -2],
    [-9,  0, -6,-10,-11, -8,-11,-10, -5, -9, -4, -7, -8, -2, -9, -3, -8, 13, -3,-10, -7, -9, -7],
    [-5, -8, -3, -7, -2, -8, -7, -9, -1, -4, -4, -7, -7,  3, -9, -5, -4, -3,  9, -5, -5, -8, -5],
    [-1, -5, -5, -6, -4, -4, -4, -3, -4,  3,  0, -6,  0, -5, -4, -4, -1,-10, -5,  6, -5, -4, -2],
    [-2, -5,  5,  5, -8, -1,  2, -1,  0, -4, -6, -1, -6, -7, -4, -1, -2, -7, -5, -5,  5,  1, -3],
    [-2, -2, -1,  2, -9,  5,  5, -3,  0, -4, -4, -2, -3, -9, -2, -3, -3, -9, -8, -4,  1,  5, -3],
    [-2, -4, -2, -3, -6, -2, -3, -3, -3, -3, -3, -3, -3, -5, -3, -2, -2, -7, -5, -2, -3, -3, -3],
];

#[rustfmt::skip]
const PAM120: ScoreMatrix = [
    [ 3, -3, -1,  0, -3, -1,  0,  1, -3, -1, -3, -2, -2, -4,  1,  1,  1, -7, -4,  0,  0, -1, -1],
    [-3,  6, -1, -3, -4,  1, -3, -4,  1, -2, -4,  2, -1, -5, -1, -1, -2,  1, -5, -3, -2, -1, -2],
    [-1, -1,  4,  2, -5,  0,  1,  0,  2, -2, -4,  1, -3, -4, -2,  1,  0, -4, -2, -3,  3,  0, -1],
    [ 0, -3,  2,  5, -7,  1,  3,  0,  0, -3, -5, -1, -4, -7, -3,  0, -1, -8, -5, -3,  4,  3, -2],
    [-3, -4, -5, -7,  9, -7, -7, -4, -4, -3, -7, -7, -6, -6, -4,  0, -3, -8, -1, -3, -6, -7, -4],
    [-1,  1,  0,  1, -7,  6,  2, -3,  3, -3, -2,  0, -1, -6,  0, -2, -2, -6, -5, -3,  0,  4, -1],
    [ 0, -3,  1,  3, -7,  2,  5, -1, -1, -3, -4, -1, -3, -7, -2, -1, -2, -8, -5, -3,  3,  4, -1],
    [ 1, -4,  0,  0, -4, -3, -1,  5, -4, -4, -5, -3, -4, -5, -2,  1, -1, -8, -6, -2,  0, -2, -2],
    [-3,  1,  2,  0, -4,  3, -1, -4,  7, -4, -3, -2, -4, -3, -1, -2, -3, -3, -1, -3,  1,  1, -2],
    [-1, -2, -2, -3, -3, -3, -3, -4, -4,  6,  1, -3,  1,  0, -3, -2,  0, -6, -2,  3, -3, -3, -1],
    [-3, -4, -4, -5, -7, -2, -4, -5, -3,  1,  5, -4,  3,  0, -3, -4, -3, -3, -2,  1, -4, -3, -2],
    [-2,  2,  1, -1, -7,  0, -1, -3, -2, -3, -4,  5,  0, -7, -2, -1, -1, -5, -5, -4,  0, -1, -2],
    [-2, -1, -3, -4, -6, -1, -3, -4, -4,  1,  3,  0,  8, -1, -3, -2, -1, -6, -4,  1, -4, -2, -2],
    [-4, -5, -4, -7, -6, -6, -7, -5, -3,  0,  0, -7, -1,  8, -5, -3, -4, -1,  4, -3, -5, -6, -3],
    [ 1, -1, -2, -3, -4,  0, -2, -2, -1, -3, -3, -2, -3, -5,  6,  1, -1, -7, -6, -2, -2, -1, -2],
    [ 1, -1,  1,  0,  0, -2, -1,  1, -2, -2, -4, -1, -2, -3,  1,  3,  2, -2, -3, -2,  0, -1, -1],
    [ 1, -2,  0, -1, -3, -2, -2, -1, -3,  0, -3, -1, -1, -4, -1,  2,  4, -6, -3,  0,  0, -2, -1],
    [-7,  1, -4, -8, -8, -6, -8, -8, -3, -6, -3, -5, -6, -1, -7, -2, -6, 12, -2, -8, -6, -7, -5],
    [-4, -5, -2, -5, -1, -5, -5, -6, -1, -2, -2, -5, -4,  4, -6, -3, -3, -2,  8, -3, -3, -5, -3],
    [ 0, -3, -3, -3, -3, -3, -3, -2, -3,  3,  1, -4,  1, -3, -2, -2,  0, -8, -3,  5, -3, -3, -1],
    [ 0, -2,  3,  4, -6,  0,  3,  0,  1, -3, -4,  0, -4, -5, -2,  0,  0, -6, -3, -3,  4,  2, -1],
    [-1, -1,  0,  3, -7,  4,  4, -2,  1, -3, -3, -1, -2, -6, -1, -1, -2, -7, -5, -3,  2,  4, -1],
    [-1, -2, -1, -2, -4, -1, -1, -2, -2, -1, -2, -2, -2, -3, -2, -1, -1, -5, -3, -1, -1, -1, -2],
];

#[rustfmt::skip]
const PAM250: ScoreMatrix = [
    [ 2, -2,  0,  0, -2,  0,  0,  1, -1, -1, -2, -1, -1, -3,  1,  1,  1, -6, -3,  0,  0,  0,  0],
    [-2,  6,  0, -1, -4,  1, -1, -3,  2, -2, -3,  3,  0, -4,  0,  0, -1,  2, -4, -2, -1,  0, -1],
    [ 0,  0,  2,  2, -4,  1,  1,  0,  2, -2, -3,  1, -2, -3,  0,  1,  0, -4, -2, -2,  2,  1,  0],
    [ 0, -1,  2,  4, -5,  2,  3,  1,  1, -2, -4,  0, -3, -6, -1,  0,  0, -7, -4, -2,  3,  3, -1],
    [-2, -4, -4, -5, 12, -5, -5, -3, -3, -2, -6, -5, -5, -4, -3,  0, -2, -8,  0, -2, -4, -5, -3],
    [ 0,  1,  1,  2, -5,  4,  2, -1,  3, -2, -2,  1, -1, -5,  0, -1, -1, -5, -4, -2,  1,  3, -1],
    [ 0, -1,  1,  3, -5,  2,  4,  0,  1, -2, -3,  0, -2, -5, -1,  0,  0, -7, -4, -2,  3,  3, -1],
    [ 1, -3,  0,  1, -3, -1,  0,  5, -2, -3, -4, -2, -3, -5,  0,  1,  0, -7, -5, -1,  0,  0, -1],
    [-1,  2,  2,  1, -3,  3,  1, -2,  6, -2, -2,  0, -2, -2,  0, -1, -1, -3,  0, -2,  1,  2, -1],
    [-1, -2, -2, -2, -2, -2, -2, -3, -2,  5,  2, -2,  2,  1, -2, -1,  0, -5, -1,  4, -2, -2, -1],
    [-2, -3, -3, -4, -6, -2, -3, -4, -2,  2,  6, -3,  4,  2, -3, -3, -2, -2, -1,  2, -3, -3, -1],
    [-1,  3,  1,  0, -5,  1,  0, -2,  0, -2, -3,  5,  0, -5, -1,  0,  0, -3, -4, -2,  1,  0, -1],
    [-1,  0, -2, -3, -5, -1, -2, -3, -2,  2,  4,  0,  6,  0, -2, -2, -1, -4, -2,  2, -2, -2, -1],
    [-3, -4, -3, -6, -4, -5, -5, -5, -2,  1,  2, -5,  0,  9, -5, -3, -3,  0,  7, -1, -4, -5, -2],
    [ 1,  0,  0, -1, -3,  0, -1,  0,  0, -2, -3, -1, -2, -5,  6,  1,  0, -6, -5, -1, -1,  0, -1],
    [ 1,  0,  1,  0,  0, -1,  0,  1, -1, -1, -3,  0, -2, -3,  1,  2,  1, -2, -3, -1,  0,  0,  0],
    [ 1, -1,  0,  0, -2, -1,  0,  0, -1,  0, -2,  0, -1, -3,  0,  1,  3, -5, -3,  0,  0, -1,  0],
    [-6,  2, -4, -7, -8, -5, -7, -7, -3, -5, -2, -3, -4,  0, -6, -2, -5, 17,  0, -6, -5, -6, -4],
    [-3, -4, -2, -4,  0, -4, -4, -5,  0, -1, -1, -4, -2,  7, -5, -3, -3,  0, 10, -2, -3, -4, -2],
    [ 0, -2, -2, -2, -2, -2, -2, -1, -2,  4,  2, -2,  2, -1, -1, -1,  0, -6, -2,  4, -2, -2, -1],
    [ 0, -1,  2,  3, -4,  1,  3,  0,  1, -2, -3,  1, -2, -4, -1,  0,  0, -5, -3, -2,  3,  2, -1],
    [ 0,  0,  1,  3, -5,  3,  3,  0,  2, -2, -3,  0, -2, -5,  0,  0, -1, -6, -4, -2,  2,  3, -1],
    [ 0, -1,  0, -1, -3, -1, -1, -1, -1, -1, -1, -1, -1, -2, -1,  0,  0, -4, -2, -1, -1, -1, -1],
];

/// Matrix selector. `PAM12` is accepted as an alias of `PAM120` (a typo kept
/// alive by existing pipelines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pam {
    #[default]
    Pam60,
    Pam120,
    Pam250,
}

impl Pam {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PAM60" | "60" => Ok(Self::Pam60),
            "PAM120" | "PAM12" | "120" => Ok(Self::Pam120),
            "PAM250" | "250" => Ok(Self::Pam250),
            other => Err(FastaError::BadFormat(format!(
                "unknown PAM matrix {other:?} (expected PAM60, PAM120 or PAM250)"
            ))),
        }
    }

    pub fn matrix(self) -> &'static ScoreMatrix {
        match self {
            Self::Pam60 => &PAM60,
            Self::Pam120 => &PAM120,
            Self::Pam250 => &PAM250,
        }
    }

    pub fn lambda(self) -> f64 {
        match self {
            Self::Pam60 => LAMBDA60,
            Self::Pam120 => LAMBDA120,
            Self::Pam250 => LAMBDA250,
        }
    }
}

/// Index of `b` in [`PAM_ALPHABET`]; unknown characters (lower case is
/// folded first) land on [`UNKNOWN_INDEX`].
#[inline]
pub fn residue_index(b: u8) -> usize {
    let b = b.to_ascii_uppercase();
    PAM_ALPHABET
        .iter()
        .position(|&a| a == b)
        .unwrap_or(UNKNOWN_INDEX)
}
