use crate::types::Span;

/// One or more consecutive raw lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineUnit {
    pub(crate) start: usize,
    pub(crate) len: usize,
}

impl LineUnit {
    pub(crate) fn span(&self) -> Span {
        Span::new(self.start, self.len)
    }
}

/// Overlapping windows of `window` lines starting at every line index. A
/// non-empty file shorter than the window yields one unit covering all of it.
pub(crate) fn line_units(line_count: usize, window: usize) -> Vec<LineUnit> {
    let window = window.max(1);
    if line_count == 0 {
        return Vec::new();
    }
    if line_count < window {
        return vec![LineUnit {
            start: 0,
            len: line_count,
        }];
    }
    (0..=line_count - window)
        .map(|start| LineUnit { start, len: window })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_window_yields_one_unit_per_line() {
        let units = line_units(3, 1);
        assert_eq!(
            units.iter().map(|u| u.start).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(units.iter().all(|u| u.len == 1));
    }

    #[test]
    fn windows_overlap_and_stop_at_last_full_window() {
        let units = line_units(5, 3);
        assert_eq!(
            units.iter().map(|u| u.span()).collect::<Vec<_>>(),
            vec![Span::new(0, 3), Span::new(1, 3), Span::new(2, 3)]
        );
    }

    #[test]
    fn short_file_is_a_single_unit() {
        assert_eq!(line_units(2, 3), vec![LineUnit { start: 0, len: 2 }]);
    }

    #[test]
    fn empty_file_has_no_units() {
        assert!(line_units(0, 1).is_empty());
        assert!(line_units(0, 3).is_empty());
    }
}
