//! Edit-similarity ratio between two normalized forms.
//!
//! `ratio = 2 * M / T` where `M` is the number of characters covered by the
//! matching blocks found by recursive longest-common-block alignment
//! (Ratcliff/Obershelp) and `T` is the combined length of both inputs.
//! Long inputs index only their less frequent characters, as `autojunk`
//! alignment does.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A unit's comparable text with the per-character data the scorer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedForm {
    text: String,
    chars: Vec<char>,
    histogram: HashMap<char, usize>,
}

impl NormalizedForm {
    pub fn new(text: String) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut histogram = HashMap::new();
        for &ch in &chars {
            *histogram.entry(ch).or_insert(0usize) += 1;
        }
        Self {
            text,
            chars,
            histogram,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl From<&str> for NormalizedForm {
    fn from(text: &str) -> Self {
        Self::new(text.to_string())
    }
}

impl From<String> for NormalizedForm {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Similarity of two normalized forms in `0..=1`. Symmetric and deterministic.
pub fn score(a: &NormalizedForm, b: &NormalizedForm) -> f64 {
    ratio_chars(&a.chars, &b.chars)
}

/// Similarity of two raw strings; see [`score`].
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Upper bound of [`score`] from character multiplicities alone.
pub fn quick_ratio(a: &NormalizedForm, b: &NormalizedForm) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let (small, large) = if a.histogram.len() <= b.histogram.len() {
        (&a.histogram, &b.histogram)
    } else {
        (&b.histogram, &a.histogram)
    };
    let common: usize = small
        .iter()
        .map(|(ch, &n)| n.min(large.get(ch).copied().unwrap_or(0)))
        .sum();
    to_ratio(common, total)
}

/// Upper bound of [`score`] from lengths alone.
pub fn real_quick_ratio(a: &NormalizedForm, b: &NormalizedForm) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    to_ratio(a.len().min(b.len()), total)
}

/// Cheapest available upper bound, tightened only when the loose one is not
/// already below `floor`.
pub(crate) fn upper_bound(a: &NormalizedForm, b: &NormalizedForm, floor: f64) -> f64 {
    let loose = real_quick_ratio(a, b);
    if loose < floor {
        return loose;
    }
    quick_ratio(a, b)
}

fn to_ratio(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / total as f64
}

pub(crate) fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    // Alignment is order sensitive on ties; fixing the order keeps the score symmetric.
    let (first, second) = match a.cmp(b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };
    to_ratio(matching_chars(first, second), a.len() + b.len())
}

/// Inputs at least this long drop their most frequent characters from the
/// match index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Positions of each indexed character of `b`, ascending.
///
/// Once `b` reaches [`AUTOJUNK_MIN_LEN`] characters, any character occurring
/// more than `len / 100 + 1` times is left out. Blocks still grow across such
/// characters when they sit next to an indexed match.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }
    if b.len() >= AUTOJUNK_MIN_LEN {
        let popular = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= popular);
    }
    b2j
}

/// Run lengths of the previous and current row of the alignment table.
///
/// Slot `j + 1` holds the length of the common run ending at `b[j]`. Only
/// touched slots are reset between rows, so one allocation serves every
/// `longest_match` call of a comparison.
struct RunTable {
    prev: Vec<usize>,
    next: Vec<usize>,
    prev_touched: Vec<usize>,
    next_touched: Vec<usize>,
}

impl RunTable {
    fn new(b_len: usize) -> Self {
        Self {
            prev: vec![0; b_len + 1],
            next: vec![0; b_len + 1],
            prev_touched: Vec::new(),
            next_touched: Vec::new(),
        }
    }

    fn advance_row(&mut self) {
        for slot in self.prev_touched.drain(..) {
            self.prev[slot] = 0;
        }
        std::mem::swap(&mut self.prev, &mut self.next);
        std::mem::swap(&mut self.prev_touched, &mut self.next_touched);
    }

    fn clear(&mut self) {
        for slot in self.prev_touched.drain(..) {
            self.prev[slot] = 0;
        }
    }
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a == b {
        return a.len();
    }

    let b2j = index_positions(b);
    let mut table = RunTable::new(b.len());

    let mut total = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, &b2j, &mut table, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest block `a[i..i+k] == b[j..j+k]` inside the given bounds; earliest in
/// `a`, then earliest in `b`, on ties. The block found through the index is
/// then widened over equal neighbours the index left out.
fn longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    table: &mut RunTable,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_k = 0usize;

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        if let Some(positions) = b2j.get(ch) {
            let first = positions.partition_point(|&j| j < blo);
            for &j in &positions[first..] {
                if j >= bhi {
                    break;
                }
                let k = table.prev[j] + 1;
                table.next[j + 1] = k;
                table.next_touched.push(j + 1);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        table.advance_row();
    }
    table.clear();

    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_k += 1;
    }
    while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k]
    {
        best_k += 1;
    }

    (best_i, best_j, best_k)
}
