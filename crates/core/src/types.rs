use std::fmt;
use std::str::FromStr;

use crate::error::CompareError;

pub const DEFAULT_THRESHOLD: f64 = 0.9;
pub const DEFAULT_WINDOW: usize = 3;

/// How source text is cut into comparable units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Statement nodes of the parsed syntax tree, identifiers normalized.
    Syntax,
    /// Raw lines; `window` consecutive lines per unit (1 = one unit per line).
    Lines { window: usize },
}

impl Mode {
    pub fn is_syntax(self) -> bool {
        matches!(self, Self::Syntax)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => f.write_str("syntax"),
            Self::Lines { window: 1 } => f.write_str("lines"),
            Self::Lines { window } => write!(f, "lines:{window}"),
        }
    }
}

impl FromStr for Mode {
    type Err = CompareError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "syntax" | "ast" => return Ok(Self::Syntax),
            "lines" | "line" => return Ok(Self::Lines { window: 1 }),
            "windows" | "window" => {
                return Ok(Self::Lines {
                    window: DEFAULT_WINDOW,
                });
            }
            _ => {}
        }
        let Some(window) = normalized.strip_prefix("lines:") else {
            return Err(CompareError::UnknownMode(raw.to_string()));
        };
        let window = window
            .parse::<usize>()
            .map_err(|_| CompareError::UnknownMode(raw.to_string()))?;
        if window == 0 {
            return Err(CompareError::InvalidWindow);
        }
        Ok(Self::Lines { window })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    pub mode: Mode,
    pub threshold: f64,
    /// Grow line-mode matches into maximal contiguous regions.
    pub expand_regions: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Syntax,
            threshold: DEFAULT_THRESHOLD,
            expand_regions: true,
        }
    }
}

impl CompareOptions {
    pub fn validate(&self) -> Result<(), CompareError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(CompareError::InvalidThreshold(self.threshold));
        }
        if let Mode::Lines { window: 0 } = self.mode {
            return Err(CompareError::InvalidWindow);
        }
        Ok(())
    }
}

/// Which of the two compared files something refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A run of lines in one file. `start` is a 0-indexed line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end line index.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start..self.end()).contains(&line)
    }
}

/// One greedy pairing of a unit of file A with a unit of file B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPair {
    pub a: usize,
    pub b: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityReport {
    pub mode: Mode,
    pub threshold: f64,
    pub units_a: usize,
    pub units_b: usize,
    /// Mean best-match similarity of A's units against B's units. `None` when
    /// either file has no comparable units.
    pub overall: Option<f64>,
    /// Syntax mode only: histogram similarity of the two whole trees.
    pub structure_profile: Option<f64>,
    /// Ascending by `a`; every `b` appears at most once.
    pub pairs: Vec<MatchPair>,
    /// Index-aligned with `pairs`.
    pub spans_a: Vec<Span>,
    pub spans_b: Vec<Span>,
    /// Coalesced line ranges to highlight, comment-only lines removed in syntax mode.
    pub marked_a: Vec<Span>,
    pub marked_b: Vec<Span>,
}

impl SimilarityReport {
    pub fn has_comparable_content(&self) -> bool {
        self.overall.is_some()
    }

    pub fn marked(&self, side: Side) -> &[Span] {
        match side {
            Side::A => &self.marked_a,
            Side::B => &self.marked_b,
        }
    }
}
