use std::io;
use std::path::Path;

use code_pair_check_core::{Side, SimilarityReport, Span};
use serde::Serialize;

use crate::compare::{PairOutcome, PairResult};

/// 1-indexed, inclusive line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonLineRange {
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
}

impl From<Span> for JsonLineRange {
    fn from(span: Span) -> Self {
        Self {
            start_line: span.start + 1,
            end_line: span.start + span.len.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonMatch {
    pub(crate) base: JsonLineRange,
    pub(crate) candidate: JsonLineRange,
    pub(crate) score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonComparison {
    pub(crate) mode: String,
    pub(crate) threshold: f64,
    pub(crate) fallback: bool,
    pub(crate) units_base: usize,
    pub(crate) units_candidate: usize,
    pub(crate) overall_similarity: Option<f64>,
    pub(crate) structure_profile: Option<f64>,
    pub(crate) matches: Vec<JsonMatch>,
    pub(crate) highlighted_base: Vec<JsonLineRange>,
    pub(crate) highlighted_candidate: Vec<JsonLineRange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonPairReport {
    pub(crate) base_file: String,
    pub(crate) compare_file: String,
    pub(crate) status: &'static str,
    pub(crate) comparison: Option<JsonComparison>,
    pub(crate) skip_reason: Option<&'static str>,
    pub(crate) error: Option<String>,
}

fn ranges(spans: &[Span]) -> Vec<JsonLineRange> {
    spans.iter().copied().map(JsonLineRange::from).collect()
}

pub(crate) fn map_comparison(report: &SimilarityReport, fallback: bool) -> JsonComparison {
    JsonComparison {
        mode: report.mode.to_string(),
        threshold: report.threshold,
        fallback,
        units_base: report.units_a,
        units_candidate: report.units_b,
        overall_similarity: report.overall,
        structure_profile: report.structure_profile,
        matches: report
            .pairs
            .iter()
            .zip(report.spans_a.iter().zip(&report.spans_b))
            .map(|(pair, (&a, &b))| JsonMatch {
                base: a.into(),
                candidate: b.into(),
                score: pair.score,
            })
            .collect(),
        highlighted_base: ranges(report.marked(Side::A)),
        highlighted_candidate: ranges(report.marked(Side::B)),
    }
}

pub(crate) fn map_results(base: &Path, results: &[PairResult]) -> Vec<JsonPairReport> {
    let base_file = base.display().to_string();
    results
        .iter()
        .map(|result| {
            let mut out = JsonPairReport {
                base_file: base_file.clone(),
                compare_file: result.candidate.display().to_string(),
                status: "compared",
                comparison: None,
                skip_reason: None,
                error: None,
            };
            match &result.outcome {
                PairOutcome::Compared {
                    report, fallback, ..
                } => {
                    out.comparison = Some(map_comparison(report, *fallback));
                }
                PairOutcome::Skipped(reason) => {
                    out.status = "skipped";
                    out.skip_reason = Some(reason.as_str());
                }
                PairOutcome::Incomparable(err) => {
                    out.status = "error";
                    out.error = Some(err.to_string());
                }
            }
            out
        })
        .collect()
}

pub(crate) fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::other(format!("json encode: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use code_pair_check_core::{CompareOptions, Mode, compare_sources};

    #[test]
    fn line_ranges_are_one_indexed_and_inclusive() {
        assert_eq!(
            JsonLineRange::from(Span::new(0, 3)),
            JsonLineRange {
                start_line: 1,
                end_line: 3
            }
        );
        assert_eq!(
            JsonLineRange::from(Span::new(4, 1)),
            JsonLineRange {
                start_line: 5,
                end_line: 5
            }
        );
    }

    #[test]
    fn comparison_serializes_camel_case() {
        let text = "x = 1\ny = 2\n";
        let report = compare_sources(text, text, &CompareOptions::default()).unwrap();
        let value = serde_json::to_value(map_comparison(&report, false)).unwrap();

        assert_eq!(value["overallSimilarity"], 1.0);
        assert_eq!(value["mode"], "syntax");
        assert_eq!(value["matches"][1]["candidate"]["startLine"], 2);
        assert_eq!(value["highlightedBase"][0]["endLine"], 2);
    }

    #[test]
    fn highlights_follow_each_side() {
        let options = CompareOptions {
            mode: Mode::Lines { window: 1 },
            ..CompareOptions::default()
        };
        let base = "x = 1\ny = 2\n";
        let candidate = "z = 9\nx = 1\ny = 2\n";
        let report = compare_sources(base, candidate, &options).unwrap();
        let value = serde_json::to_value(map_comparison(&report, false)).unwrap();

        assert_eq!(value["highlightedBase"][0]["startLine"], 1);
        assert_eq!(value["highlightedBase"][0]["endLine"], 2);
        assert_eq!(value["highlightedCandidate"][0]["startLine"], 2);
        assert_eq!(value["highlightedCandidate"][0]["endLine"], 3);
    }
}
