use std::path::Path;

use code_pair_check_core::{Side, SimilarityReport, SourceText, Span};

use crate::args::{Localization, tr};
use crate::compare::{PairOutcome, PairResult};

const ANSI_HIGHLIGHT: &str = "\x1b[93m";
const ANSI_RESET: &str = "\x1b[0m";
const HTML_HIGHLIGHT_OPEN: &str = "<span style=\"background-color: yellow\">";
const PREVIEW_CHARS: usize = 60;

pub(crate) fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// One line per pair: "`A` and `B` are `x.xx`% similar", or why not.
pub(crate) fn format_summary_line(
    localization: Localization,
    base: &Path,
    result: &PairResult,
) -> String {
    let a = base.display();
    let b = result.candidate.display();
    match &result.outcome {
        PairOutcome::Compared {
            report, fallback, ..
        } => {
            let mut line = match (report.overall, localization) {
                (Some(value), Localization::En) => {
                    format!("{a} and {b} are {} similar", format_percent(value))
                }
                (Some(value), Localization::Zh) => {
                    format!("{a} 与 {b} 的相似度为 {}", format_percent(value))
                }
                (None, _) => format!(
                    "{a} / {b}: {}",
                    tr(localization, "no comparable content", "没有可比较的内容")
                ),
            };
            if *fallback {
                line.push_str(tr(
                    localization,
                    " (compared line by line: syntax error)",
                    "（语法错误，已按行比较）",
                ));
            }
            line
        }
        PairOutcome::Skipped(reason) => format!(
            "{b}: {} ({reason})",
            tr(localization, "skipped", "已跳过")
        ),
        PairOutcome::Incomparable(err) => format!(
            "{a} / {b}: {} {err}",
            tr(localization, "could not compare:", "无法比较:")
        ),
    }
}

fn line_range(span: Span) -> String {
    format!("{}-{}", span.start + 1, span.start + span.len.max(1))
}

fn is_marked(marked: &[Span], line: usize) -> bool {
    marked.iter().any(|span| span.contains(line))
}

/// A file listing with `>` in the gutter of highlighted lines.
pub(crate) fn format_marked_source(source: &SourceText<'_>, marked: &[Span], color: bool) -> String {
    let width = source.line_count().max(1).to_string().len();
    let mut out = String::new();
    for (idx, line) in source.lines().iter().enumerate() {
        let hit = is_marked(marked, idx);
        let gutter = if hit { '>' } else { ' ' };
        if hit && color {
            out.push_str(&format!(
                "{gutter} {:>width$} | {ANSI_HIGHLIGHT}{line}{ANSI_RESET}\n",
                idx + 1
            ));
        } else {
            out.push_str(&format!("{gutter} {:>width$} | {line}\n", idx + 1));
        }
    }
    out
}

/// Matched regions followed by both files with highlighted lines.
pub(crate) fn format_pair_detail(
    localization: Localization,
    base: (&Path, &str),
    candidate: (&Path, &str),
    report: &SimilarityReport,
    color: bool,
) -> String {
    let source_a = SourceText::new(base.1);
    let source_b = SourceText::new(candidate.1);
    let mut out = String::new();

    out.push_str(&format!(
        "{}: {}\n",
        tr(localization, "matched regions", "匹配区域"),
        report.pairs.len()
    ));
    for ((pair, &span_a), &span_b) in report
        .pairs
        .iter()
        .zip(&report.spans_a)
        .zip(&report.spans_b)
    {
        out.push_str(&format!(
            "- A:{} <-> B:{} score={:.3}\n",
            line_range(span_a),
            line_range(span_b),
            pair.score
        ));
        out.push_str(&format!(
            "  {}\n",
            source_a.excerpt(span_a, PREVIEW_CHARS).replace('\n', " | ")
        ));
    }
    if let Some(profile) = report.structure_profile {
        out.push_str(&format!(
            "{}: {}\n",
            tr(localization, "structure profile", "结构相似度"),
            format_percent(profile)
        ));
    }

    out.push_str(&format!("\n== A: {} ==\n", base.0.display()));
    out.push_str(&format_marked_source(&source_a, report.marked(Side::A), color));
    out.push_str(&format!("\n== B: {} ==\n", candidate.0.display()));
    out.push_str(&format_marked_source(&source_b, report.marked(Side::B), color));
    out.push('\n');
    out
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// File lines joined with `<br>`, highlighted lines wrapped in a yellow span.
pub(crate) fn render_html_source(source: &SourceText<'_>, marked: &[Span]) -> String {
    let lines: Vec<String> = source
        .lines()
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let escaped = escape_html(line).replace(' ', "&nbsp;");
            if is_marked(marked, idx) {
                format!("{HTML_HIGHLIGHT_OPEN}{escaped}</span>")
            } else {
                escaped
            }
        })
        .collect();
    lines.join("<br>")
}

pub(crate) fn render_html_document(
    localization: Localization,
    base: &Path,
    base_text: &str,
    results: &[PairResult],
) -> String {
    let source_a = SourceText::new(base_text);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(&base.display().to_string())
    ));
    out.push_str("</head>\n<body style=\"font-family: monospace\">\n");

    for result in results {
        out.push_str(&format!(
            "<h2>{}</h2>\n",
            escape_html(&format_summary_line(localization, base, result))
        ));
        let PairOutcome::Compared {
            report,
            candidate_text,
            ..
        } = &result.outcome
        else {
            continue;
        };
        let source_b = SourceText::new(candidate_text);
        out.push_str(&format!(
            "<h3>{}</h3>\n<div>{}</div>\n",
            escape_html(&base.display().to_string()),
            render_html_source(&source_a, report.marked(Side::A))
        ));
        out.push_str(&format!(
            "<h3>{}</h3>\n<div>{}</div>\n",
            escape_html(&result.candidate.display().to_string()),
            render_html_source(&source_b, report.marked(Side::B))
        ));
    }

    out.push_str("</body>\n</html>\n");
    out
}
