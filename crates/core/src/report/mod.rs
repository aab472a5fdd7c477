mod aggregate;
mod highlight;

#[cfg(test)]
mod tests;

use std::time::Instant;

use crate::error::CompareError;
use crate::expand::expand_region;
use crate::matcher::greedy_match;
use crate::normalize::normalize_units;
use crate::profile::structure_profile;
use crate::source::SourceText;
use crate::types::{CompareOptions, MatchPair, Mode, Side, SimilarityReport, Span};
use crate::units::{ParsedSource, Unit, extract_units};

pub use aggregate::overall_similarity;
pub use highlight::marked_line_ranges;

/// Compares file A against file B and reports matched units, the line spans
/// they cover and the overall similarity.
///
/// Fails only on invalid options or, in syntax mode, when either file does not
/// parse. Empty files are not an error: the report has no pairs and no
/// overall score.
pub fn compare_sources(
    text_a: &str,
    text_b: &str,
    options: &CompareOptions,
) -> Result<SimilarityReport, CompareError> {
    options.validate()?;
    let started = Instant::now();

    let source_a = SourceText::new(text_a);
    let source_b = SourceText::new(text_b);
    let parsed_a = ParsedSource::parse(&source_a, options.mode, Side::A)?;
    let parsed_b = ParsedSource::parse(&source_b, options.mode, Side::B)?;

    let units_a = extract_units(&parsed_a, &source_a);
    let units_b = extract_units(&parsed_b, &source_b);
    let forms_a = normalize_units(&source_a, &units_a);
    let forms_b = normalize_units(&source_b, &units_b);

    let pairs = greedy_match(&forms_a, &forms_b, options.threshold);
    let (spans_a, spans_b) = pair_spans(&pairs, &units_a, &units_b, &source_a, &source_b, options);

    let overall = overall_similarity(&forms_a, &forms_b);
    let profile = match (parsed_a.tree(), parsed_b.tree()) {
        (Some(tree_a), Some(tree_b)) => structure_profile(tree_a, text_a, tree_b, text_b),
        _ => None,
    };

    let skip_comments = options.mode.is_syntax();
    let marked_a = marked_line_ranges(source_a.lines(), &spans_a, skip_comments);
    let marked_b = marked_line_ranges(source_b.lines(), &spans_b, skip_comments);

    tracing::debug!(
        mode = %options.mode,
        units_a = units_a.len(),
        units_b = units_b.len(),
        pairs = pairs.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "compared sources"
    );

    Ok(SimilarityReport {
        mode: options.mode,
        threshold: options.threshold,
        units_a: units_a.len(),
        units_b: units_b.len(),
        overall,
        structure_profile: profile,
        pairs,
        spans_a,
        spans_b,
        marked_a,
        marked_b,
    })
}

fn pair_spans(
    pairs: &[MatchPair],
    units_a: &[Unit<'_>],
    units_b: &[Unit<'_>],
    source_a: &SourceText<'_>,
    source_b: &SourceText<'_>,
    options: &CompareOptions,
) -> (Vec<Span>, Vec<Span>) {
    let mut spans_a = Vec::with_capacity(pairs.len());
    let mut spans_b = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let span_a = units_a[pair.a].span();
        let span_b = units_b[pair.b].span();
        match options.mode {
            Mode::Syntax => {
                spans_a.push(span_a);
                spans_b.push(span_b);
            }
            Mode::Lines { .. } => {
                let len = if options.expand_regions {
                    let (len_a, len_b) = expand_region(
                        source_a.lines(),
                        source_b.lines(),
                        span_a.start,
                        span_b.start,
                        span_a.len.min(span_b.len),
                        options.threshold,
                    );
                    len_a.min(len_b)
                } else {
                    span_a.len.min(span_b.len)
                };
                spans_a.push(Span::new(span_a.start, len));
                spans_b.push(Span::new(span_b.start, len));
            }
        }
    }

    (spans_a, spans_b)
}
