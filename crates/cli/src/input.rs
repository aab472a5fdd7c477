use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Why a file was left out of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    NotFound,
    PermissionDenied,
    TooLarge,
    Binary,
    NotUtf8,
}

impl SkipReason {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::TooLarge => "too_large",
            Self::Binary => "binary",
            Self::NotUtf8 => "not_utf8",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub(crate) enum Loaded {
    Text(String),
    Skipped(SkipReason),
}

fn skip_for(err: &io::Error) -> Option<SkipReason> {
    match err.kind() {
        io::ErrorKind::NotFound => Some(SkipReason::NotFound),
        io::ErrorKind::PermissionDenied => Some(SkipReason::PermissionDenied),
        _ => None,
    }
}

/// Reads one source file. Unreadable, oversized, binary and non-UTF-8 files
/// are reported as skipped; any other I/O failure is an error.
pub(crate) fn load_source(path: &Path, max_file_size: u64) -> io::Result<Loaded> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => match skip_for(&err) {
            Some(reason) => return Ok(Loaded::Skipped(reason)),
            None => return Err(err),
        },
    };
    if metadata.len() > max_file_size {
        return Ok(Loaded::Skipped(SkipReason::TooLarge));
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(err) => match skip_for(&err) {
            Some(reason) => return Ok(Loaded::Skipped(reason)),
            None => return Err(err),
        },
    };
    if bytes.contains(&0) {
        return Ok(Loaded::Skipped(SkipReason::Binary));
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Loaded::Text(text)),
        Err(_) => Ok(Loaded::Skipped(SkipReason::NotUtf8)),
    }
}

fn has_selected_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|wanted| *wanted == ext)
        })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Expands candidate arguments into files to compare against `base`.
///
/// Files named directly are kept as given, whatever their extension.
/// Directories are walked (sorted by name) for files with a selected
/// extension; the base file itself is never its own candidate.
pub(crate) fn expand_candidates(
    base: &Path,
    candidates: &[PathBuf],
    extensions: &[String],
    respect_gitignore: bool,
) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if !candidate.is_dir() {
            if !same_file(base, candidate) {
                out.push(candidate.clone());
            }
            continue;
        }

        let mut builder = WalkBuilder::new(candidate);
        builder
            .hidden(true)
            .ignore(false)
            .git_ignore(respect_gitignore)
            .git_global(respect_gitignore)
            .git_exclude(respect_gitignore)
            .parents(respect_gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        root = %candidate.display(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if !has_selected_extension(path, extensions) || same_file(base, path) {
                continue;
            }
            out.push(path.to_path_buf());
        }
    }
    tracing::debug!(candidates = out.len(), "expanded candidates");
    out
}
