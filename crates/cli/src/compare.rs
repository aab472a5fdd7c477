use std::io;
use std::path::{Path, PathBuf};

use code_pair_check_core::{CompareError, CompareOptions, Mode, SimilarityReport, compare_sources};
use rayon::prelude::*;

use crate::input::{Loaded, SkipReason, load_source};

#[derive(Debug)]
pub(crate) enum PairOutcome {
    Compared {
        report: SimilarityReport,
        candidate_text: String,
        /// The pair did not parse and was compared line by line instead.
        fallback: bool,
    },
    Skipped(SkipReason),
    Incomparable(CompareError),
}

impl PairOutcome {
    pub(crate) fn is_compared(&self) -> bool {
        matches!(self, Self::Compared { .. })
    }
}

#[derive(Debug)]
pub(crate) struct PairResult {
    pub(crate) candidate: PathBuf,
    pub(crate) outcome: PairOutcome,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PairSettings {
    pub(crate) options: CompareOptions,
    pub(crate) fallback_lines: bool,
    pub(crate) max_file_size: u64,
}

/// Line mode used when a pair does not parse.
const FALLBACK_MODE: Mode = Mode::Lines { window: 1 };

/// Runs one comparison, retrying in line mode on a parse failure when asked.
/// Returns the report and whether the retry was needed.
pub(crate) fn compare_texts(
    base_text: &str,
    candidate_text: &str,
    options: &CompareOptions,
    fallback_lines: bool,
) -> Result<(SimilarityReport, bool), CompareError> {
    match compare_sources(base_text, candidate_text, options) {
        Ok(report) => Ok((report, false)),
        Err(err) if fallback_lines && err.is_parse_error() && options.mode.is_syntax() => {
            tracing::warn!(error = %err, "comparing in line mode instead");
            let options = CompareOptions {
                mode: FALLBACK_MODE,
                ..*options
            };
            compare_sources(base_text, candidate_text, &options).map(|report| (report, true))
        }
        Err(err) => Err(err),
    }
}

fn compare_one(base_text: &str, candidate: &Path, settings: &PairSettings) -> io::Result<PairOutcome> {
    let candidate_text = match load_source(candidate, settings.max_file_size)? {
        Loaded::Text(text) => text,
        Loaded::Skipped(reason) => {
            tracing::warn!(path = %candidate.display(), reason = %reason, "skipping candidate");
            return Ok(PairOutcome::Skipped(reason));
        }
    };

    let outcome = match compare_texts(
        base_text,
        &candidate_text,
        &settings.options,
        settings.fallback_lines,
    ) {
        Ok((report, fallback)) => {
            tracing::info!(
                path = %candidate.display(),
                overall = ?report.overall,
                pairs = report.pairs.len(),
                fallback,
                "compared"
            );
            PairOutcome::Compared {
                report,
                candidate_text,
                fallback,
            }
        }
        Err(err) => {
            tracing::warn!(path = %candidate.display(), error = %err, "could not compare");
            PairOutcome::Incomparable(err)
        }
    };
    Ok(outcome)
}

/// Compares `base_text` against every candidate in parallel. Results keep the
/// candidates' order.
pub(crate) fn compare_all(
    base_text: &str,
    candidates: &[PathBuf],
    settings: &PairSettings,
) -> io::Result<Vec<PairResult>> {
    candidates
        .par_iter()
        .map(|candidate| -> io::Result<PairResult> {
            Ok(PairResult {
                candidate: candidate.clone(),
                outcome: compare_one(base_text, candidate, settings)?,
            })
        })
        .collect()
}
