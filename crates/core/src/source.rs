use crate::types::Span;

/// Raw file content plus its line-split form. Borrowed from the caller.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: text.lines().collect(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines of `span` joined with `\n`, clipped to the end of the file.
    pub fn block(&self, span: Span) -> String {
        let start = span.start.min(self.lines.len());
        let end = span.end().min(self.lines.len());
        self.lines[start..end].join("\n")
    }

    /// Short preview of `span`, truncated to `max_chars` characters.
    pub fn excerpt(&self, span: Span, max_chars: usize) -> String {
        let mut out = String::new();
        let mut used = 0usize;
        for line in self.lines.iter().skip(span.start).take(span.len) {
            if !out.is_empty() {
                if used >= max_chars {
                    break;
                }
                out.push('\n');
                used += 1;
            }
            for ch in line.chars() {
                if used >= max_chars {
                    return out;
                }
                out.push(ch);
                used += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_drop_trailing_newline_and_carriage_returns() {
        let source = SourceText::new("a\r\nb\n\nc\n");
        assert_eq!(source.lines(), &["a", "b", "", "c"]);
    }

    #[test]
    fn block_is_clipped_to_file_end() {
        let source = SourceText::new("one\ntwo\nthree");
        assert_eq!(source.block(Span::new(1, 5)), "two\nthree");
        assert_eq!(source.block(Span::new(7, 2)), "");
    }

    #[test]
    fn excerpt_respects_char_budget_on_multibyte_text() {
        let source = SourceText::new("héllo wörld\nsecond");
        assert_eq!(source.excerpt(Span::new(0, 2), 4), "héll");
        assert_eq!(source.excerpt(Span::new(0, 2), 100), "héllo wörld\nsecond");
    }
}
