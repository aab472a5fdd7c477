//! Whole-file structure profile: how alike the two syntax trees are as bags
//! of node kinds and of normalized leaves, regardless of where they occur.

use std::collections::HashMap;
use std::hash::Hash;

use tree_sitter::Tree;

use crate::normalize::{IdentifierTable, is_renamable, is_trivia};

#[derive(Debug, Default)]
struct Histograms {
    kinds: HashMap<&'static str, usize>,
    leaves: HashMap<(&'static str, String), usize>,
}

fn histograms(tree: &Tree, source: &str) -> Histograms {
    let bytes = source.as_bytes();
    let mut table = IdentifierTable::default();
    let mut out = Histograms::default();

    let mut cursor = tree.walk();
    // The root itself is the same for every file and is left out.
    if !cursor.goto_first_child() {
        return out;
    }
    loop {
        let node = cursor.node();
        let trivia = is_trivia(node.kind());
        if !trivia {
            *out.kinds.entry(node.kind()).or_insert(0) += 1;
            if node.is_named() && node.child_count() == 0 {
                let text = node.utf8_text(bytes).unwrap_or("");
                let label = if is_renamable(node, cursor.field_name()) {
                    table.canonical(text).to_string()
                } else {
                    text.to_string()
                };
                *out.leaves.entry((node.kind(), label)).or_insert(0) += 1;
            }
        }

        if !trivia && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

/// Multiset Jaccard: shared occurrences over combined occurrences.
fn multiset_jaccard<K: Eq + Hash>(a: &HashMap<K, usize>, b: &HashMap<K, usize>) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (key, &count_a) in a {
        let count_b = b.get(key).copied().unwrap_or(0);
        intersection += count_a.min(count_b);
        union += count_a.max(count_b);
    }
    for (key, &count_b) in b {
        if !a.contains_key(key) {
            union += count_b;
        }
    }
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Mean of the node-kind and leaf Jaccard ratios. `None` if both files are
/// empty.
pub(crate) fn structure_profile(
    tree_a: &Tree,
    source_a: &str,
    tree_b: &Tree,
    source_b: &str,
) -> Option<f64> {
    let a = histograms(tree_a, source_a);
    let b = histograms(tree_b, source_b);
    if a.kinds.is_empty() && b.kinds.is_empty() {
        return None;
    }
    let kinds = multiset_jaccard(&a.kinds, &b.kinds);
    let leaves = multiset_jaccard(&a.leaves, &b.leaves);
    Some((kinds + leaves) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceText;
    use crate::types::{Mode, Side};
    use crate::units::ParsedSource;

    fn profile(a: &str, b: &str) -> Option<f64> {
        let source_a = SourceText::new(a);
        let source_b = SourceText::new(b);
        let parsed_a = ParsedSource::parse(&source_a, Mode::Syntax, Side::A).unwrap();
        let parsed_b = ParsedSource::parse(&source_b, Mode::Syntax, Side::B).unwrap();
        structure_profile(parsed_a.tree()?, a, parsed_b.tree()?, b)
    }

    #[test]
    fn renamed_copy_has_identical_profile() {
        let a = "def f(x):\n    return x * 2\n";
        let b = "def f(value):\n    return value * 2\n";
        assert_eq!(profile(a, b), Some(1.0));
    }

    #[test]
    fn different_programs_profile_below_one() {
        let a = "for i in range(10):\n    print(i)\n";
        let b = "import os\nclass Box:\n    pass\n";
        let score = profile(a, b).unwrap();
        assert!((0.0..1.0).contains(&score), "{score}");
    }

    #[test]
    fn empty_files_have_no_profile() {
        assert_eq!(profile("", ""), None);
        assert_eq!(profile("# just a comment\n", ""), None);
    }

    #[test]
    fn jaccard_counts_multiplicity() {
        let a = HashMap::from([("x", 2usize), ("y", 1)]);
        let b = HashMap::from([("x", 1usize), ("z", 1)]);
        // shared: x once; combined: x twice, y, z.
        assert!((multiset_jaccard(&a, &b) - 0.25).abs() < 1e-12);
    }
}
