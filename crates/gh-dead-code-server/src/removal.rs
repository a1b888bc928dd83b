//! Removing dead definitions from file contents
//!
//! Each symbol carries the line it starts on and its full source text. A
//! span is only removed when the file still holds exactly that text at that
//! line; spans are cut bottom-to-top so earlier line numbers stay valid.

use crate::schema::DeadSymbol;
use log::warn;

/// Result of editing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRemoval {
    /// File content after all removable spans were cut
    pub content: String,
    /// Indices (into the input slice) of the symbols that were removed
    pub removed: Vec<usize>,
    /// Indices of the symbols left in place
    pub skipped: Vec<usize>,
}

impl FileRemoval {
    pub fn changed(&self) -> bool {
        !self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    index: usize,
    start: usize,
    len: usize,
}

/// Cut the definitions of `symbols` out of `content`
///
/// All symbols are expected to belong to the same file.
pub fn remove_symbols(content: &str, symbols: &[&DeadSymbol]) -> FileRemoval {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut skipped = Vec::new();
    let mut spans = Vec::new();

    for (index, symbol) in symbols.iter().enumerate() {
        match locate(&lines, symbol) {
            Some((start, len)) => spans.push(Span { index, start, len }),
            None => {
                warn!(
                    "Skipping {}: definition not found at line {}",
                    symbol.describe(),
                    symbol.line_number
                );
                skipped.push(index);
            }
        }
    }

    spans.sort_by(|a, b| b.start.cmp(&a.start));

    let mut cut = vec![false; lines.len()];
    let mut floor = lines.len();
    let mut removed = Vec::new();
    for span in spans {
        if span.start + span.len > floor {
            warn!(
                "Skipping {}: overlaps another removed definition",
                symbols[span.index].describe()
            );
            skipped.push(span.index);
            continue;
        }
        cut[span.start..span.start + span.len].fill(true);
        floor = span.start;
        removed.push(span.index);
    }

    removed.sort_unstable();
    skipped.sort_unstable();

    let content = if removed.is_empty() {
        content.to_string()
    } else {
        rebuild(&lines, &cut, content.ends_with('\n'))
    };

    FileRemoval {
        content,
        removed,
        skipped,
    }
}

/// Start index and line count of the symbol's definition, if it still matches
fn locate(lines: &[&str], symbol: &DeadSymbol) -> Option<(usize, usize)> {
    let source = symbol.source_text.as_deref()?;
    let expected: Vec<&str> = source.lines().collect();
    if expected.is_empty() || symbol.line_number == 0 {
        return None;
    }

    let start = symbol.line_number as usize - 1;
    let actual = lines.get(start..start + expected.len())?;
    let matches = actual
        .iter()
        .zip(&expected)
        .all(|(have, want)| have.trim() == want.trim());

    matches.then_some((start, expected.len()))
}

fn rebuild(lines: &[&str], cut: &[bool], trailing_newline: bool) -> String {
    let mut out = String::new();
    let mut last_blank = true;
    let mut after_cut = false;

    for (line, &is_cut) in lines.iter().zip(cut) {
        if is_cut {
            after_cut = true;
            continue;
        }

        let blank = line.trim().is_empty();
        if after_cut && blank && last_blank {
            continue;
        }

        after_cut = false;
        out.push_str(line);
        last_blank = blank;
    }

    // a cut at the end of the file leaves its separating blank lines behind
    if after_cut {
        let kept = out.trim_end().len();
        out.truncate(kept);
        if trailing_newline && !out.is_empty() {
            out.push('\n');
        }
    }

    out
}
