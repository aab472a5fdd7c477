use tree_sitter::{Node, Parser, Point, Tree};

use crate::error::CompareError;
use crate::types::{Side, Span};

/// Closed set of statement node kinds of the Python grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Expression,
    Return,
    Pass,
    Break,
    Continue,
    Delete,
    Raise,
    Global,
    Nonlocal,
    Import,
    ImportFrom,
    FutureImport,
    Assert,
    Print,
    Exec,
    TypeAlias,
    If,
    For,
    While,
    Try,
    With,
    FunctionDef,
    ClassDef,
    Decorated,
    Match,
}

impl StatementKind {
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        Some(match kind {
            "expression_statement" => Self::Expression,
            "return_statement" => Self::Return,
            "pass_statement" => Self::Pass,
            "break_statement" => Self::Break,
            "continue_statement" => Self::Continue,
            "delete_statement" => Self::Delete,
            "raise_statement" => Self::Raise,
            "global_statement" => Self::Global,
            "nonlocal_statement" => Self::Nonlocal,
            "import_statement" => Self::Import,
            "import_from_statement" => Self::ImportFrom,
            "future_import_statement" => Self::FutureImport,
            "assert_statement" => Self::Assert,
            "print_statement" => Self::Print,
            "exec_statement" => Self::Exec,
            "type_alias_statement" => Self::TypeAlias,
            "if_statement" => Self::If,
            // Each `elif` branch is a conditional statement of its own.
            "elif_clause" => Self::If,
            "for_statement" => Self::For,
            "while_statement" => Self::While,
            "try_statement" => Self::Try,
            "with_statement" => Self::With,
            "function_definition" => Self::FunctionDef,
            "class_definition" => Self::ClassDef,
            "decorated_definition" => Self::Decorated,
            "match_statement" => Self::Match,
            _ => return None,
        })
    }

    pub fn is_import(self) -> bool {
        matches!(self, Self::Import | Self::ImportFrom | Self::FutureImport)
    }
}

/// A statement node and the lines it covers (1-indexed, both inclusive).
#[derive(Debug, Clone, Copy)]
pub(crate) struct SyntaxUnit<'t> {
    pub(crate) start_line: usize,
    pub(crate) end_line: usize,
    pub(crate) node: Node<'t>,
}

impl SyntaxUnit<'_> {
    pub(crate) fn span(&self) -> Span {
        Span::new(
            self.start_line - 1,
            self.end_line.saturating_sub(self.start_line) + 1,
        )
    }
}

pub(crate) fn parse(text: &str, side: Side) -> Result<Tree, CompareError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| CompareError::Grammar(e.to_string()))?;
    let Some(tree) = parser.parse(text, None) else {
        return Err(CompareError::Grammar("parser produced no tree".to_string()));
    };

    let root = tree.root_node();
    if root.has_error() {
        let point = first_error_point(root).unwrap_or(Point::new(0, 0));
        return Err(CompareError::Parse {
            side,
            line: point.row + 1,
            column: char_column(text, point),
        });
    }
    Ok(tree)
}

fn first_error_point(root: Node<'_>) -> Option<Point> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position());
        }
        // Subtrees without errors are skipped entirely.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// 1-indexed character column of a byte position reported by the parser.
fn char_column(text: &str, point: Point) -> usize {
    let Some(line) = text.split('\n').nth(point.row) else {
        return point.column + 1;
    };
    let prefix = point.column.min(line.len());
    let chars = line.get(..prefix).map_or(prefix, |p| p.chars().count());
    chars + (point.column - prefix) + 1
}

/// Every statement of the tree in pre-order, outer statements before the
/// statements nested in them.
pub(crate) fn statement_units(tree: &Tree) -> Vec<SyntaxUnit<'_>> {
    let mut out = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        if let Some(kind) = StatementKind::from_node_kind(node.kind()) {
            // A decorated definition is one statement together with its definition.
            let wrapped = matches!(kind, StatementKind::FunctionDef | StatementKind::ClassDef)
                && cursor.field_name() == Some("definition");
            if !wrapped {
                out.push(SyntaxUnit {
                    start_line: node.start_position().row + 1,
                    end_line: node.end_position().row + 1,
                    node,
                });
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}
