mod error;
mod expand;
mod matcher;
mod normalize;
mod profile;
mod report;
mod similarity;
mod source;
mod types;
mod units;

pub use error::CompareError;

pub use expand::expand_region;
pub use matcher::greedy_match;

pub use report::{compare_sources, marked_line_ranges, overall_similarity};

pub use similarity::{NormalizedForm, quick_ratio, ratio, real_quick_ratio, score};
pub use source::SourceText;

pub use types::{
    CompareOptions, DEFAULT_THRESHOLD, DEFAULT_WINDOW, MatchPair, Mode, Side, SimilarityReport,
    Span,
};
pub use units::StatementKind;
