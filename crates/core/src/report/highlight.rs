use crate::types::Span;

fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Lines covered by `spans`, coalesced into sorted, non-overlapping ranges.
///
/// With `skip_comment_lines`, lines whose first non-blank character is `#`
/// stay unmarked even inside a span. Spans are clipped to the file.
pub fn marked_line_ranges(lines: &[&str], spans: &[Span], skip_comment_lines: bool) -> Vec<Span> {
    let mut marked = vec![false; lines.len()];
    for span in spans {
        let start = span.start.min(lines.len());
        let end = span.end().min(lines.len());
        for (idx, flag) in marked.iter_mut().enumerate().take(end).skip(start) {
            if skip_comment_lines && is_comment_line(lines[idx]) {
                continue;
            }
            *flag = true;
        }
    }

    let mut out: Vec<Span> = Vec::new();
    for (idx, &flag) in marked.iter().enumerate() {
        if !flag {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.end() == idx => last.len += 1,
            _ => out.push(Span::new(idx, 1)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_spans_coalesce() {
        let lines = ["a", "b", "c", "d", "e"];
        let spans = [Span::new(0, 2), Span::new(1, 2), Span::new(4, 1)];
        assert_eq!(
            marked_line_ranges(&lines, &spans, false),
            vec![Span::new(0, 3), Span::new(4, 1)]
        );
    }

    #[test]
    fn comment_lines_split_ranges_when_skipped() {
        let lines = ["def f():", "    # note", "    return 1"];
        let spans = [Span::new(0, 3)];
        assert_eq!(
            marked_line_ranges(&lines, &spans, true),
            vec![Span::new(0, 1), Span::new(2, 1)]
        );
        assert_eq!(
            marked_line_ranges(&lines, &spans, false),
            vec![Span::new(0, 3)]
        );
    }

    #[test]
    fn spans_past_end_are_clipped() {
        let lines = ["only"];
        assert_eq!(
            marked_line_ranges(&lines, &[Span::new(0, 4), Span::new(3, 1)], false),
            vec![Span::new(0, 1)]
        );
    }
}
