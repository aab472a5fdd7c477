mod lines;
mod syntax;

use tree_sitter::Tree;

use crate::error::CompareError;
use crate::source::SourceText;
use crate::types::{Mode, Side, Span};

pub(crate) use lines::LineUnit;
pub use syntax::StatementKind;
pub(crate) use syntax::SyntaxUnit;

/// The per-file state units are cut from: a syntax tree, or nothing beyond
/// the line split.
pub(crate) enum ParsedSource {
    Tree(Tree),
    Lines { window: usize },
}

impl ParsedSource {
    pub(crate) fn parse(
        source: &SourceText<'_>,
        mode: Mode,
        side: Side,
    ) -> Result<Self, CompareError> {
        match mode {
            Mode::Syntax => Ok(Self::Tree(syntax::parse(source.text(), side)?)),
            Mode::Lines { window } => Ok(Self::Lines { window }),
        }
    }

    pub(crate) fn tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Lines { .. } => None,
        }
    }
}

/// A comparable fragment of one file. Its index in the extracted sequence is
/// its identity for the rest of the comparison.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Unit<'t> {
    Syntax(SyntaxUnit<'t>),
    Line(LineUnit),
}

impl Unit<'_> {
    pub(crate) fn span(&self) -> Span {
        match self {
            Self::Syntax(unit) => unit.span(),
            Self::Line(unit) => unit.span(),
        }
    }
}

/// Units of one file in document order.
pub(crate) fn extract_units<'t>(
    parsed: &'t ParsedSource,
    source: &SourceText<'_>,
) -> Vec<Unit<'t>> {
    match parsed {
        ParsedSource::Tree(tree) => syntax::statement_units(tree)
            .into_iter()
            .map(Unit::Syntax)
            .collect(),
        ParsedSource::Lines { window } => lines::line_units(source.line_count(), *window)
            .into_iter()
            .map(Unit::Line)
            .collect(),
    }
}
