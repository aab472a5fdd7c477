use crate::similarity::{NormalizedForm, score, upper_bound};
use crate::types::MatchPair;

/// Greedy nearest-match pairing of A's units with B's units.
///
/// Each unit of `a`, in index order, takes its best-scoring unit of `b` among
/// those not taken yet (earliest index on ties) if that score reaches
/// `threshold`. Order dependent and not globally optimal: an early unit of `a`
/// can take a unit of `b` that a later one would have matched better.
pub fn greedy_match(
    a: &[NormalizedForm],
    b: &[NormalizedForm],
    threshold: f64,
) -> Vec<MatchPair> {
    let mut used = vec![false; b.len()];
    let mut pairs = Vec::new();

    for (i, form_a) in a.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (j, form_b) in b.iter().enumerate() {
            if used[j] {
                continue;
            }
            let bound = upper_bound(form_a, form_b, threshold);
            let hopeless = match best {
                None => bound < threshold,
                Some((_, best_score)) => bound <= best_score,
            };
            if hopeless {
                continue;
            }

            let similarity = score(form_a, form_b);
            let better = match best {
                None => similarity >= threshold,
                Some((_, best_score)) => similarity > best_score,
            };
            if better {
                best = Some((j, similarity));
            }
        }

        if let Some((j, similarity)) = best {
            used[j] = true;
            pairs.push(MatchPair {
                a: i,
                b: j,
                score: similarity,
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(items: &[&str]) -> Vec<NormalizedForm> {
        items.iter().copied().map(NormalizedForm::from).collect()
    }

    #[test]
    fn each_b_unit_is_used_at_most_once() {
        let a = forms(&["return total", "return total", "return total"]);
        let b = forms(&["return total", "return total"]);
        let pairs = greedy_match(&a, &b, 0.9);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 0));
        assert_eq!((pairs[1].a, pairs[1].b), (1, 1));
    }

    #[test]
    fn ties_go_to_the_first_b_unit() {
        let a = forms(&["value = 10"]);
        let b = forms(&["value = 11", "value = 12"]);
        let pairs = greedy_match(&a, &b, 0.5);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].b, 0);
    }

    #[test]
    fn earlier_a_units_consume_matches_first() {
        // a[0] is closest to b[0]; a[1] is identical to b[0] but comes later.
        let a = forms(&["abcdefghiX", "abcdefghij"]);
        let b = forms(&["abcdefghij", "zzzzzzzzzz"]);
        let pairs = greedy_match(&a, &b, 0.8);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 0));
    }

    #[test]
    fn scores_below_threshold_are_not_matched() {
        let a = forms(&["while running:"]);
        let b = forms(&["import os"]);
        assert!(greedy_match(&a, &b, 0.9).is_empty());
        assert!(greedy_match(&[], &b, 0.9).is_empty());
        assert!(greedy_match(&a, &[], 0.9).is_empty());
    }

    #[test]
    fn zero_threshold_matches_everything_available() {
        let a = forms(&["aaa", "bbb", "ccc"]);
        let b = forms(&["xyz", "bbb"]);
        let pairs = greedy_match(&a, &b, 0.0);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 0));
        assert_eq!((pairs[1].a, pairs[1].b), (1, 1));
    }
}
