use crate::types::Side;

/// Errors surfaced by a single comparison.
///
/// Degenerate inputs (a file that yields no comparable units) are not errors;
/// they produce a report whose overall score is `None`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("file {side} is not valid source: syntax error at line {line}, column {column}")]
    Parse {
        side: Side,
        line: usize,
        column: usize,
    },

    #[error("threshold must be a finite number in 0..1, got {0}")]
    InvalidThreshold(f64),

    #[error("line window must be at least 1")]
    InvalidWindow,

    #[error("unknown mode `{0}` (expected syntax, lines or lines:<n>)")]
    UnknownMode(String),

    #[error("failed to load grammar: {0}")]
    Grammar(String),
}

impl CompareError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
