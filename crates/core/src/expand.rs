use crate::similarity::ratio_chars;

/// Grows a matched seed forward in both files at once.
///
/// The seed covers `seed_len` lines from `start_a` in A and from `start_b` in
/// B. Each step appends the next line on both sides and rescores the joined
/// blocks; growth stops at the first step below `threshold` or at the end of
/// either file. Returns the lengths reached in A and in B, never shorter than
/// the seed.
pub fn expand_region(
    lines_a: &[&str],
    lines_b: &[&str],
    start_a: usize,
    start_b: usize,
    seed_len: usize,
    threshold: f64,
) -> (usize, usize) {
    let seed_len = seed_len.max(1);
    let mut end_a = start_a + seed_len;
    let mut end_b = start_b + seed_len;
    if end_a >= lines_a.len() || end_b >= lines_b.len() {
        return (seed_len, seed_len);
    }

    let mut block_a = joined_chars(&lines_a[start_a..end_a]);
    let mut block_b = joined_chars(&lines_b[start_b..end_b]);
    while end_a < lines_a.len() && end_b < lines_b.len() {
        push_line(&mut block_a, lines_a[end_a]);
        push_line(&mut block_b, lines_b[end_b]);
        if ratio_chars(&block_a, &block_b) < threshold {
            break;
        }
        end_a += 1;
        end_b += 1;
    }

    (end_a - start_a, end_b - start_b)
}

fn joined_chars(lines: &[&str]) -> Vec<char> {
    let mut block = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            block.push('\n');
        }
        block.extend(line.chars());
    }
    block
}

fn push_line(block: &mut Vec<char>, line: &str) {
    block.push('\n');
    block.extend(line.chars());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_tails_expand_to_end_of_file() {
        let lines = ["a = 1", "b = 2", "c = 3", "d = 4", "e = 5", "f = 6"];
        assert_eq!(expand_region(&lines, &lines, 0, 0, 1, 0.9), (6, 6));
    }

    #[test]
    fn expansion_stops_at_first_divergent_line() {
        let a = ["shared_line_one", "shared_line_two", "qqqqqqqqqqqqqqqqqqqqqqqqqqqqqq"];
        let b = ["shared_line_one", "shared_line_two", "0123456789012345678901234567890"];
        assert_eq!(expand_region(&a, &b, 0, 0, 1, 0.9), (2, 2));
    }

    #[test]
    fn seed_at_last_line_keeps_seed_length() {
        let a = ["x", "y"];
        let b = ["y"];
        assert_eq!(expand_region(&a, &b, 1, 0, 1, 0.9), (1, 1));
    }

    #[test]
    fn windowed_seed_starts_from_window_length() {
        let a = ["p", "q", "r", "s"];
        let b = ["p", "q", "r", "s"];
        assert_eq!(expand_region(&a, &b, 0, 0, 3, 0.9), (4, 4));
        assert_eq!(expand_region(&a, &b, 1, 1, 3, 0.9), (3, 3));
    }

    #[test]
    fn grown_block_scores_like_the_joined_lines() {
        // The last step joins "ab\ncd\nef" against "ab\ncd\nxy": 2 * 6 / 16.
        let a = ["ab", "cd", "ef"];
        let b = ["ab", "cd", "xy"];
        assert_eq!(expand_region(&a, &b, 0, 0, 1, 0.74), (3, 3));
        assert_eq!(expand_region(&a, &b, 0, 0, 1, 0.76), (2, 2));
    }
}
