//! Header index: the scalar maps keyed by SI plus the TI and SS inverted
//! indexes.

use std::collections::{HashMap, HashSet};

use crate::fasta::Header;

#[derive(Debug, Default)]
pub(crate) struct HeaderIndex {
    si_to_ti: HashMap<String, String>,
    si_to_meta: HashMap<String, String>,
    si_to_ss: HashMap<String, String>,
    ss_to_si: HashMap<String, String>,
    ti_to_si: HashMap<String, Vec<String>>,
    // SIs already listed in ti_to_si
    listed: HashSet<String>,
}

impl HeaderIndex {
    /// Inserts (or overwrites) a header. A duplicate SI overwrites every
    /// scalar field; the TI inverted index receives an SI on first sight
    /// only, and the SI moves lists if it is re-bound to a different TI.
    /// The SS inverted index is last-loaded-wins.
    pub fn insert(&mut self, header: &Header) {
        if self.listed.insert(header.si.clone()) {
            self.ti_to_si
                .entry(header.ti.clone())
                .or_default()
                .push(header.si.clone());
        } else if let Some(old_ti) = self.si_to_ti.get(&header.si) {
            if *old_ti != header.ti {
                if let Some(list) = self.ti_to_si.get_mut(old_ti) {
                    list.retain(|si| si != &header.si);
                }
                self.ti_to_si
                    .entry(header.ti.clone())
                    .or_default()
                    .push(header.si.clone());
            }
        }
        self.si_to_ti.insert(header.si.clone(), header.ti.clone());
        self.si_to_meta.insert(header.si.clone(), header.meta.clone());
        self.si_to_ss.insert(header.si.clone(), header.ss.clone());
        self.ss_to_si.insert(header.ss.clone(), header.si.clone());
    }

    pub fn ti_for_si(&self, si: &str) -> Option<&str> {
        self.si_to_ti.get(si).map(String::as_str)
    }

    pub fn ss_for_si(&self, si: &str) -> Option<&str> {
        self.si_to_ss.get(si).map(String::as_str)
    }

    pub fn meta_for_si(&self, si: &str) -> Option<&str> {
        self.si_to_meta.get(si).map(String::as_str)
    }

    pub fn si_for_ss(&self, ss: &str) -> Option<&str> {
        self.ss_to_si.get(ss).map(String::as_str)
    }

    pub fn sis_for_ti(&self, ti: &str) -> &[String] {
        self.ti_to_si.get(ti).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.si_to_ti.clear();
        self.si_to_meta.clear();
        self.si_to_ss.clear();
        self.ss_to_si.clear();
        self.ti_to_si.clear();
        self.listed.clear();
    }
}
