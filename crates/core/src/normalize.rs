//! Canonical text forms of units.
//!
//! Syntax units are dumped structurally with identifiers replaced by
//! positional names (`var1`, `var2`, ...). The name table lives for one pass
//! over one file and is never shared. Line units are compared raw.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::similarity::NormalizedForm;
use crate::source::SourceText;
use crate::units::{StatementKind, Unit};

/// Node kinds that never take part in a comparison.
pub(crate) fn is_trivia(kind: &str) -> bool {
    matches!(kind, "comment" | "line_continuation")
}

/// Original identifier -> positional canonical name, in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct IdentifierTable {
    names: HashMap<String, String>,
}

impl IdentifierTable {
    pub(crate) fn canonical(&mut self, name: &str) -> &str {
        let next = self.names.len() + 1;
        self.names
            .entry(name.to_string())
            .or_insert_with(|| format!("var{next}"))
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// Whether an `identifier` leaf names a variable binding or reference.
///
/// Attribute names, declared function/class names, keyword-argument names,
/// `global`/`nonlocal` lists and import paths keep their spelling.
pub(crate) fn is_renamable(node: Node<'_>, field: Option<&str>) -> bool {
    if node.kind() != "identifier" {
        return false;
    }
    let Some(parent) = node.parent() else {
        return true;
    };
    match (parent.kind(), field) {
        ("attribute", Some("attribute")) => return false,
        ("function_definition" | "class_definition", Some("name")) => return false,
        ("keyword_argument", Some("name")) => return false,
        ("global_statement" | "nonlocal_statement", _) => return false,
        _ => {}
    }

    let mut current = Some(parent);
    while let Some(ancestor) = current {
        if let Some(kind) = StatementKind::from_node_kind(ancestor.kind()) {
            return !kind.is_import();
        }
        current = ancestor.parent();
    }
    true
}

struct StructuralDump<'s> {
    source: &'s [u8],
    table: IdentifierTable,
}

impl<'s> StructuralDump<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source: source.as_bytes(),
            table: IdentifierTable::default(),
        }
    }

    fn dump(&mut self, node: Node<'_>) -> String {
        let mut out = String::new();
        self.write_node(node, None, &mut out);
        out
    }

    fn write_node(&mut self, node: Node<'_>, field: Option<&str>, out: &mut String) {
        if let Some(field) = field {
            out.push_str(field);
            out.push('=');
        }

        if node.child_count() == 0 {
            out.push_str(node.kind());
            if node.is_named() {
                let text = node.utf8_text(self.source).unwrap_or("");
                out.push(':');
                if is_renamable(node, field) {
                    out.push_str(self.table.canonical(text));
                } else {
                    out.push_str(text);
                }
            }
            return;
        }

        out.push_str(node.kind());
        out.push('(');
        let mut first = true;
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if !is_trivia(child.kind()) {
                    if !first {
                        out.push(' ');
                    }
                    first = false;
                    self.write_node(child, cursor.field_name(), out);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        out.push(')');
    }
}

/// Normalized forms of `units`, index-aligned. All syntax units of one call
/// share one identifier table.
pub(crate) fn normalize_units(
    source: &SourceText<'_>,
    units: &[Unit<'_>],
) -> Vec<NormalizedForm> {
    let mut dump = StructuralDump::new(source.text());
    let forms: Vec<NormalizedForm> = units
        .iter()
        .map(|unit| match unit {
            Unit::Syntax(unit) => NormalizedForm::new(dump.dump(unit.node)),
            Unit::Line(unit) => NormalizedForm::new(source.block(unit.span())),
        })
        .collect();
    tracing::trace!(
        units = forms.len(),
        identifiers = dump.table.len(),
        "normalized units"
    );
    forms
}
