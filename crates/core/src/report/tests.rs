use std::time::Duration;

use super::*;
use crate::expand::expand_region;
use crate::types::{DEFAULT_THRESHOLD, Mode, Side};

fn lines_options(window: usize, expand_regions: bool) -> CompareOptions {
    CompareOptions {
        mode: Mode::Lines { window },
        threshold: DEFAULT_THRESHOLD,
        expand_regions,
    }
}

fn ten_line_program() -> String {
    numbered_program(10)
}

fn numbered_program(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("value_{i} = {i} * {}\n", i + 7))
        .collect()
}

#[test]
fn identical_files_match_fully_in_syntax_mode() -> Result<(), CompareError> {
    let text = ten_line_program();
    let report = compare_sources(&text, &text, &CompareOptions::default())?;

    assert_eq!(report.overall, Some(1.0));
    assert_eq!(report.units_a, 10);
    assert_eq!(report.pairs.len(), 10);
    assert_eq!(report.marked_a, vec![Span::new(0, 10)]);
    assert_eq!(report.marked_b, vec![Span::new(0, 10)]);
    Ok(())
}

#[test]
fn identical_files_match_fully_in_line_mode() -> Result<(), CompareError> {
    let text = ten_line_program();
    for window in [1, 3] {
        let report = compare_sources(&text, &text, &lines_options(window, true))?;
        assert_eq!(report.overall, Some(1.0));
        assert_eq!(report.marked_a, vec![Span::new(0, 10)]);
        assert_eq!(report.marked_b, vec![Span::new(0, 10)]);
        assert_eq!(report.spans_a[0], Span::new(0, 10));
    }
    Ok(())
}

#[test]
fn renamed_identifiers_only_match_in_syntax_mode() -> Result<(), CompareError> {
    let a = "x = 1\ny = 2\n";
    let b = "a = 1\nb = 2\n";

    let syntax = compare_sources(a, b, &CompareOptions::default())?;
    assert_eq!(syntax.overall, Some(1.0));
    assert_eq!(syntax.pairs.len(), 2);

    let lines = compare_sources(a, b, &lines_options(1, false))?;
    let overall = lines.overall.unwrap_or(1.0);
    assert!(overall < 1.0, "{overall}");
    Ok(())
}

#[test]
fn disjoint_files_share_nothing() -> Result<(), CompareError> {
    let a = "aaaa\nbbbb\ncccc\n";
    let b = "xxxx\nyyyy\nzzzz\n";
    let report = compare_sources(a, b, &lines_options(1, true))?;

    assert_eq!(report.overall, Some(0.0));
    assert!(report.pairs.is_empty());
    assert!(report.marked_a.is_empty());
    assert!(report.marked_b.is_empty());
    Ok(())
}

#[test]
fn single_seed_expands_over_following_identical_lines() -> Result<(), CompareError> {
    let text = "print('start')\nalpha = 1\nbeta = 2\ngamma = 3\ndelta = 4\nepsilon = 5\n";
    let source = SourceText::new(text);
    assert_eq!(
        expand_region(source.lines(), source.lines(), 0, 0, 1, DEFAULT_THRESHOLD),
        (6, 6)
    );

    let report = compare_sources(text, text, &lines_options(1, true))?;
    assert_eq!(report.spans_a[0], Span::new(0, 6));
    assert_eq!(report.spans_b[0], Span::new(0, 6));
    Ok(())
}

#[test]
fn disabling_expansion_keeps_unit_spans() -> Result<(), CompareError> {
    let text = "a = 1\nb = 2\nc = 3\n";
    let report = compare_sources(text, text, &lines_options(1, false))?;
    assert_eq!(
        report.spans_a,
        vec![Span::new(0, 1), Span::new(1, 1), Span::new(2, 1)]
    );
    Ok(())
}

#[test]
fn short_file_in_windowed_mode_is_one_unit() -> Result<(), CompareError> {
    let report = compare_sources("a = 1\nb = 2\n", "a = 1\nb = 2\n", &lines_options(3, true))?;
    assert_eq!(report.units_a, 1);
    assert_eq!(report.spans_a, vec![Span::new(0, 2)]);
    Ok(())
}

#[test]
fn comment_lines_inside_matched_statements_are_not_marked() -> Result<(), CompareError> {
    let text = "def f(x):\n    # double it\n    return x * 2\n";
    let report = compare_sources(text, text, &CompareOptions::default())?;
    assert_eq!(report.marked_a, vec![Span::new(0, 1), Span::new(2, 1)]);
    assert!(report.structure_profile.is_some());
    Ok(())
}

#[test]
fn parse_failure_names_the_side() {
    let err = compare_sources("x = 1\n", "def f(:\n", &CompareOptions::default()).unwrap_err();
    match err {
        CompareError::Parse { side, .. } => assert_eq!(side, Side::B),
        other => panic!("unexpected error: {other:?}"),
    }

    // Line mode never parses.
    assert!(compare_sources("x = 1\n", "def f(:\n", &lines_options(1, true)).is_ok());
}

#[test]
fn empty_files_compare_without_a_score() -> Result<(), CompareError> {
    let report = compare_sources("", "", &CompareOptions::default())?;
    assert!(!report.has_comparable_content());
    assert!(report.pairs.is_empty());
    assert_eq!(report.structure_profile, None);

    let report = compare_sources("x = 1\n", "", &lines_options(3, true))?;
    assert_eq!(report.overall, None);
    Ok(())
}

#[test]
fn invalid_options_are_rejected() {
    let options = CompareOptions {
        threshold: 1.5,
        ..CompareOptions::default()
    };
    assert_eq!(
        compare_sources("x", "x", &options).unwrap_err(),
        CompareError::InvalidThreshold(1.5)
    );
    assert_eq!(
        compare_sources("x", "x", &lines_options(0, true)).unwrap_err(),
        CompareError::InvalidWindow
    );
}

#[test]
fn line_mode_reports_no_structure_profile() -> Result<(), CompareError> {
    let report = compare_sources("x = 1\n", "x = 1\n", &lines_options(1, true))?;
    assert_eq!(report.structure_profile, None);
    assert_eq!(report.mode, Mode::Lines { window: 1 });
    Ok(())
}

#[test]
fn long_renamed_copy_expands_in_bounded_time() -> Result<(), CompareError> {
    let a = numbered_program(200);
    let b = a.replace("value_", "v_");
    let options = CompareOptions {
        threshold: 0.8,
        ..lines_options(1, true)
    };

    let started = Instant::now();
    let report = compare_sources(&a, &b, &options)?;
    let identical = compare_sources(&a, &a, &options)?;
    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_secs(30), "took {elapsed:?}");

    assert_eq!(report.units_a, 200);
    assert!(!report.pairs.is_empty());
    for (span_a, span_b) in report.spans_a.iter().zip(&report.spans_b) {
        assert_eq!(span_a.len, span_b.len);
        assert!(span_a.len >= 1 && span_a.start + span_a.len <= 200);
    }
    assert_eq!(identical.spans_a[0], Span::new(0, 200));
    assert_eq!(identical.overall, Some(1.0));
    Ok(())
}
