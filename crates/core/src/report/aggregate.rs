use crate::similarity::{NormalizedForm, score, upper_bound};

/// Mean over A's units of the best similarity each reaches against any unit
/// of B, with no threshold applied.
///
/// Asymmetric when the files differ in size. `None` when either side has no
/// units: there is nothing to average, and a zero would read as "entirely
/// different".
pub fn overall_similarity(a: &[NormalizedForm], b: &[NormalizedForm]) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let mut sum = 0.0f64;
    for form_a in a {
        let mut best = 0.0f64;
        for form_b in b {
            if upper_bound(form_a, form_b, best) <= best {
                continue;
            }
            let similarity = score(form_a, form_b);
            if similarity > best {
                best = similarity;
                if best >= 1.0 {
                    break;
                }
            }
        }
        sum += best;
    }
    Some(sum / a.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(items: &[&str]) -> Vec<NormalizedForm> {
        items.iter().copied().map(NormalizedForm::from).collect()
    }

    #[test]
    fn comparing_with_itself_is_one() {
        let a = forms(&["import sys", "x = 1", "", "print(x)"]);
        assert_eq!(overall_similarity(&a, &a), Some(1.0));
    }

    #[test]
    fn disjoint_alphabets_score_zero() {
        let a = forms(&["aaaa", "bbbb"]);
        let b = forms(&["xxxx", "yyyy"]);
        assert_eq!(overall_similarity(&a, &b), Some(0.0));
    }

    #[test]
    fn empty_sides_have_no_score() {
        let a = forms(&["x = 1"]);
        assert_eq!(overall_similarity(&[], &a), None);
        assert_eq!(overall_similarity(&a, &[]), None);
    }

    #[test]
    fn metric_is_asymmetric_in_file_size() {
        let small = forms(&["alpha"]);
        let large = forms(&["alpha", "zzzzz"]);
        assert_eq!(overall_similarity(&small, &large), Some(1.0));
        assert_eq!(overall_similarity(&large, &small), Some(0.5));
    }
}
