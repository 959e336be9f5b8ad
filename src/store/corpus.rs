//! Sequence bodies: the SI -> body map, the insertion-order list and the
//! two summary counters.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct Corpus {
    bodies: HashMap<String, String>,
    order: Vec<String>,
    seen: HashSet<String>,
    num_records: i64,
    total_size: i64,
}

impl Corpus {
    /// Normalizing load: upper case, whitespace stripped, non-alphabetic
    /// characters replaced by `X`.
    pub fn load(&mut self, si: &str, body: &str) {
        self.insert(si, normalize(body));
    }

    /// Verbatim load for the record-import path.
    pub fn load_clean(&mut self, si: &str, body: &str) {
        self.insert(si, body.to_string());
    }

    fn insert(&mut self, si: &str, body: String) {
        match self.bodies.get_mut(si) {
            Some(old) => {
                self.total_size += body.len() as i64 - old.len() as i64;
                *old = body;
            }
            None => {
                self.num_records += 1;
                self.total_size += body.len() as i64;
                self.bodies.insert(si.to_string(), body);
            }
        }
        if self.seen.insert(si.to_string()) {
            self.order.push(si.to_string());
        }
    }

    pub fn get(&self, si: &str) -> Option<&str> {
        self.bodies.get(si).map(String::as_str)
    }

    /// SIs in insertion order (first sight).
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn all(&self) -> HashMap<String, String> {
        self.bodies.clone()
    }

    /// The requested SIs; unknown identifiers are skipped.
    pub fn only<'a, I>(&self, sis: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = HashMap::new();
        for si in sis {
            if let Some(body) = self.bodies.get(si) {
                out.insert(si.to_string(), body.clone());
            }
        }
        out
    }

    /// Everything but the excluded SIs, walked in insertion order.
    pub fn all_except(&self, excluded: &HashSet<&str>) -> HashMap<String, String> {
        self.only(
            self.order
                .iter()
                .map(String::as_str)
                .filter(|si| !excluded.contains(si)),
        )
    }

    pub fn num_records(&self) -> i64 {
        self.num_records
    }

    pub fn total_size(&self) -> i64 {
        self.total_size
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.order.clear();
        self.seen.clear();
        self.num_records = 0;
        self.total_size = 0;
    }
}

/// The body normalization pipeline: upper case first, then strip
/// whitespace, then replace what is not an ASCII letter with `X`.
pub(crate) fn normalize(body: &str) -> String {
    body.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            let c = c.to_ascii_uppercase();
            if c.is_ascii_alphabetic() {
                c
            } else {
                'X'
            }
        })
        .collect()
}
