//! SEG low-complexity filter (Wootton & Federhen, 1993).
//!
//! Segments are discovered by sliding a Shannon-entropy window over the
//! sequence, extended while the entropy stays under the high cutoff, then
//! refined by searching every sub-window for the composition with the lowest
//! combinatorial probability. Discovered segments are merged and masked
//! with `X`.

use crate::alphabet::Alphabet;
use crate::filters::lnfact::ln_fact;

/// Entropy value for positions without a window and for windows with too
/// many ambiguous characters.
const SENTINEL: f64 = -1.0;
/// Entropy value of a window that does not track entropy at all.
const UNTRACKED: f64 = -2.0;

const LN2: f64 = 0.693_147_180_559_945_3;

/// SEG parameters. Out-of-range values fall back to the published defaults
/// at construction.
#[derive(Debug, Clone)]
pub struct SegParams {
    /// Sliding entropy window length.
    pub window: i64,
    /// Segment-trigger entropy in bits.
    pub locut: f64,
    /// Segment-extension entropy in bits.
    pub hicut: f64,
    /// Windows with more ambiguous characters than this get no entropy.
    pub max_x: i64,
    /// Maximum positions trimmed from either end of a raw segment.
    pub max_trim: i64,
    /// Non-zero merges overlapping segments and masks them.
    pub merge: i64,
}

impl Default for SegParams {
    fn default() -> Self {
        Self {
            window: 12,
            locut: 2.2,
            hicut: 2.5,
            max_x: 0,
            max_trim: 100,
            merge: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    begin: i64,
    end: i64,
}

/// The SEG filter. Immutable after construction; one instance per caller.
#[derive(Debug, Clone)]
pub struct Seg {
    window: i64,
    locut: f64,
    hicut: f64,
    max_x: i64,
    max_trim: i64,
    merge: i64,
    alpha: Alphabet,
}

impl Default for Seg {
    fn default() -> Self {
        Self::new(SegParams::default())
    }
}

impl Seg {
    pub fn new(params: SegParams) -> Self {
        let defaults = SegParams::default();
        let window = if params.window <= 0 { defaults.window } else { params.window };
        let locut = if params.locut < 0.0 { defaults.locut } else { params.locut };
        let mut hicut = if params.hicut < 0.0 { defaults.hicut } else { params.hicut };
        let mut max_x = if params.max_x < 0 { defaults.max_x } else { params.max_x };
        let max_trim = if params.max_trim < 0 { defaults.max_trim } else { params.max_trim };
        if locut > hicut {
            hicut = locut;
        }
        if max_x > window {
            max_x = window;
        }
        Self {
            window,
            locut,
            hicut,
            max_x,
            max_trim,
            merge: params.merge,
            alpha: Alphabet::new(),
        }
    }

    /// Returns a copy of `input` with every low-complexity segment masked by
    /// `X`. The output always has the length of the input; a sequence
    /// shorter than the window is returned unchanged.
    pub fn filter(&self, input: &str) -> String {
        let seq = input.as_bytes();
        let mut segs = Vec::new();
        self.seg_seq(seq, &mut segs, 0);

        let mut out = seq.to_vec();
        if self.merge != 0 {
            merge_segments(&mut segs, seq.len() as i64);
            for seg in &segs {
                for b in &mut out[seg.begin as usize..=seg.end as usize] {
                    *b = b'X';
                }
            }
        }
        match String::from_utf8(out) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Low-complexity segment discovery over `seq`, appending segments in
    /// ascending begin order (recursion into a left gap happens before the
    /// current segment is recorded). `offset` translates window-local
    /// coordinates back into the original sequence.
    fn seg_seq(&self, seq: &[u8], segs: &mut Vec<Segment>, offset: i64) {
        let downset = (self.window + 1) / 2 - 1;
        let upset = self.window - downset;
        let first = downset;
        let last = seq.len() as i64 - upset;
        let mut lowlim = first;

        let h = match self.entropies(seq, first, last) {
            Some(h) => h,
            None => return,
        };

        let mut i = first;
        while i <= last {
            if h[i as usize] <= self.locut && h[i as usize] != SENTINEL {
                let loi = self.loc_low(i, lowlim, &h);
                let hii = self.loc_high(i, last, &h);

                let mut leftend = loi - downset;
                let mut rightend = hii + upset - 1;

                let sub = &seq[leftend as usize..=rightend as usize];
                self.trim(sub, &mut leftend, &mut rightend);

                if i + upset - 1 < leftend {
                    let lend = loi - downset;
                    let rend = leftend - 1;
                    self.seg_seq(
                        &seq[lend as usize..=rend as usize],
                        segs,
                        offset + lend,
                    );
                }

                segs.push(Segment {
                    begin: leftend + offset,
                    end: rightend + offset,
                });
                i = hii.min(rightend + downset);
                lowlim = i + 1;
            }
            i += 1;
        }
    }

    /// Entropy vector over `[first, last]`; `None` when the sequence is
    /// shorter than the window.
    fn entropies(&self, seq: &[u8], first: i64, last: i64) -> Option<Vec<f64>> {
        if self.window > seq.len() as i64 {
            return None;
        }
        let mut h = vec![SENTINEL; seq.len()];
        let mut win = Window::open(seq, &self.alpha, 0, self.window)?;
        win.entropy_on();

        for i in first..=last {
            if win.xes > self.max_x {
                h[i as usize] = SENTINEL;
                win.shift();
                continue;
            }
            h[i as usize] = win.entropy;
            win.shift();
        }
        Some(h)
    }

    fn loc_low(&self, i: i64, limit: i64, h: &[f64]) -> i64 {
        let mut j = i;
        while j >= limit {
            if h[j as usize] == SENTINEL || h[j as usize] > self.hicut {
                break;
            }
            j -= 1;
        }
        j + 1
    }

    fn loc_high(&self, i: i64, limit: i64, h: &[f64]) -> i64 {
        let mut j = i;
        while j <= limit {
            if h[j as usize] == SENTINEL || h[j as usize] > self.hicut {
                break;
            }
            j += 1;
        }
        j - 1
    }

    /// Shrink `[leftend, rightend]` to the sub-window of `seq` with the
    /// minimal composition probability, searching sub-lengths down to
    /// `len - max_trim` at every offset.
    fn trim(&self, seq: &[u8], leftend: &mut i64, rightend: &mut i64) {
        let len = seq.len() as i64;
        let mut minprob = 1.0;
        let mut lend = 0i64;
        let mut rend = len - 1;
        let mut minlen = 1i64;
        if len - self.max_trim > minlen {
            minlen = len - self.max_trim;
        }

        let mut sublen = len;
        while sublen > minlen {
            if let Some(mut win) = Window::open(seq, &self.alpha, 0, sublen) {
                let mut i = 0i64;
                loop {
                    let prob = self.composition_prob(&win.state, sublen);
                    if prob < minprob {
                        minprob = prob;
                        lend = i;
                        rend = sublen + i - 1;
                    }
                    if !win.shift() {
                        break;
                    }
                    i += 1;
                }
            }
            sublen -= 1;
        }

        *leftend += lend;
        *rightend -= len - rend - 1;
    }

    /// `ln K(c) + ln N!/prod(c_i!) - N ln |A|` for the composition state
    /// vector of a sub-window of length `total`.
    fn composition_prob(&self, sv: &[i64; Alphabet::SIZE + 1], total: i64) -> f64 {
        let totseq = total as f64 * Alphabet::LN_SIZE;
        let ans1 = ln_ass(sv);
        let ans2 = if ans1 > -100_000.0 {
            ln_perm(sv, total)
        } else {
            log::warn!("degenerate composition state vector in segment trimming");
            0.0
        };
        ans1 + ans2 - totseq
    }
}

/// A window into a borrowed sequence buffer, keeping residue composition,
/// the sorted state vector and the ambiguous-character count incrementally
/// up to date as it slides.
///
/// Invariant: `state` is weakly decreasing, terminated by 0, and its nonzero
/// prefix is a permutation of the nonzero entries of `comp`.
struct Window<'a> {
    buf: &'a [u8],
    alpha: &'a Alphabet,
    start: i64,
    len: i64,
    comp: [i64; Alphabet::SIZE],
    state: [i64; Alphabet::SIZE + 1],
    xes: i64,
    entropy: f64,
}

impl<'a> Window<'a> {
    fn open(buf: &'a [u8], alpha: &'a Alphabet, start: i64, len: i64) -> Option<Self> {
        if start < 0 || len < 0 || start + len > buf.len() as i64 {
            return None;
        }
        let mut win = Self {
            buf,
            alpha,
            start,
            len,
            comp: [0; Alphabet::SIZE],
            state: [0; Alphabet::SIZE + 1],
            xes: 0,
            entropy: UNTRACKED,
        };
        for &b in &buf[start as usize..(start + len) as usize] {
            if alpha.is_ambiguous(b) {
                win.xes += 1;
            } else {
                win.comp[alpha.index_of(b)] += 1;
            }
        }
        win.rebuild_state();
        Some(win)
    }

    fn rebuild_state(&mut self) {
        let mut nel = 0;
        for letter in 0..Alphabet::SIZE {
            let c = self.comp[letter];
            if c == 0 {
                continue;
            }
            self.state[nel] = c;
            nel += 1;
        }
        for slot in self.state[nel..].iter_mut() {
            *slot = 0;
        }
        self.state[..nel].sort_unstable_by(|a, b| b.cmp(a));
    }

    fn entropy_on(&mut self) {
        self.entropy = entropy(&self.state);
    }

    /// Advance the window by one position. Returns false (without moving)
    /// once the right edge would pass the end of the buffer.
    fn shift(&mut self) -> bool {
        if self.start + 1 + self.len > self.buf.len() as i64 {
            return false;
        }

        let outgoing = self.buf[self.start as usize];
        if self.alpha.is_ambiguous(outgoing) {
            self.xes -= 1;
        } else {
            let idx = self.alpha.index_of(outgoing);
            let class = self.comp[idx];
            self.comp[idx] -= 1;
            decrement_state(&mut self.state, class);
        }

        let incoming = self.buf[(self.start + self.len) as usize];
        self.start += 1;
        if self.alpha.is_ambiguous(incoming) {
            self.xes += 1;
        } else {
            let idx = self.alpha.index_of(incoming);
            let class = self.comp[idx];
            self.comp[idx] += 1;
            increment_state(&mut self.state, class);
        }

        if self.entropy > UNTRACKED {
            self.entropy = entropy(&self.state);
        }
        true
    }
}

/// Decrement the rightmost state entry equal to `class`; sortedness is
/// preserved because only the boundary slot of the class changes.
fn decrement_state(sv: &mut [i64; Alphabet::SIZE + 1], class: i64) {
    for i in 0..Alphabet::SIZE {
        if sv[i] == 0 {
            break;
        }
        if sv[i] == class && sv[i + 1] < class {
            sv[i] = class - 1;
            break;
        }
    }
}

/// Increment the leftmost state entry equal to `class` (the trailing zero
/// when the residue class is new).
fn increment_state(sv: &mut [i64; Alphabet::SIZE + 1], class: i64) {
    for slot in sv.iter_mut() {
        if *slot == class {
            *slot += 1;
            break;
        }
    }
}

/// Shannon entropy in bits of the counts in a state vector, normalized by
/// the window total.
fn entropy(sv: &[i64; Alphabet::SIZE + 1]) -> f64 {
    let mut total = 0i64;
    let mut n = 0;
    while sv[n] != 0 {
        total += sv[n];
        n += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let mut ent = 0.0;
    for &c in &sv[..n] {
        ent += c as f64 * (c as f64 / total as f64).ln() / LN2;
    }
    (ent / total as f64).abs()
}

/// `ln N!/prod(c_i!)`: multinomial permutation count of the window.
fn ln_perm(sv: &[i64; Alphabet::SIZE + 1], window_len: i64) -> f64 {
    let mut ans = ln_fact(window_len);
    let mut i = 0;
    while sv[i] != 0 {
        ans -= ln_fact(sv[i]);
        i += 1;
    }
    ans
}

/// `ln K(c)`: the number of distinct assignments of residue classes to the
/// multiset of counts in `sv`, walking runs of equal counts.
fn ln_ass(sv: &[i64; Alphabet::SIZE + 1]) -> f64 {
    let alphasize = Alphabet::SIZE as i64;
    let mut ans = ln_fact(alphasize);
    if sv[0] == 0 {
        return ans;
    }

    let mut total = alphasize;
    let mut class = 1i64;
    let mut svim1 = sv[0];
    let mut idx = 0usize;
    let mut i = 0i64;
    loop {
        i += 1;
        if i == alphasize {
            ans -= ln_fact(class);
            break;
        }
        idx += 1;
        let svi = sv[idx];
        if svi == svim1 {
            class += 1;
            continue;
        }
        total -= class;
        ans -= ln_fact(class);
        if svi == 0 {
            ans -= ln_fact(total);
            break;
        }
        class = 1;
        svim1 = svi;
    }
    ans
}

/// Fuse adjacent segments whose gap is <= 0, then clamp the outermost
/// bounds to the sequence.
fn merge_segments(segs: &mut Vec<Segment>, len: i64) {
    if segs.is_empty() {
        return;
    }

    let mut merged: Vec<Segment> = Vec::with_capacity(segs.len());
    for seg in segs.drain(..) {
        match merged.last_mut() {
            Some(prev) if seg.begin - prev.end - 1 <= 0 => {
                if seg.end > prev.end {
                    prev.end = seg.end;
                }
                if seg.begin < prev.begin {
                    prev.begin = seg.begin;
                }
            }
            _ => merged.push(seg),
        }
    }

    if let Some(last) = merged.last_mut() {
        if last.end > len - 1 {
            last.end = len - 1;
        }
    }
    if let Some(first) = merged.first_mut() {
        if first.begin < 0 {
            first.begin = 0;
        }
    }
    *segs = merged;
}
