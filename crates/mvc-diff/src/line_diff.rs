//! Line-level diff: comparison of two file contents.
//!
//! [`line_diff`] uses the `similar` crate (Myers diff) so insertions and
//! deletions come out interleaved in document order. [`aligned_diff`] walks
//! both line lists index by index. [`diff_hunks`] groups the `similar` diff
//! into display hunks with context.

use similar::{ChangeTag, TextDiff};

/// One line of a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffOp {
    /// A line present on both sides.
    Equal(String),
    /// A line only in the new content.
    Added(String),
    /// A line only in the old content.
    Removed(String),
}

impl DiffOp {
    pub fn text(&self) -> &str {
        match self {
            Self::Equal(t) | Self::Added(t) | Self::Removed(t) => t,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Equal(_))
    }
}

/// The diff of one file: an ordered sequence of line operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineDiff {
    pub ops: Vec<DiffOp>,
}

impl LineDiff {
    /// Returns `true` if no line was added or removed.
    pub fn is_empty(&self) -> bool {
        !self.ops.iter().any(DiffOp::is_change)
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// Line number in the old content where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of lines from the old content in this hunk.
    pub old_count: usize,
    /// Line number in the new content where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of lines from the new content in this hunk.
    pub new_count: usize,
    /// The individual diff lines in this hunk.
    pub lines: Vec<DiffOp>,
}

/// Compute an LCS-grouped line diff from `old` to `new`.
///
/// Line terminators are stripped from the reported text.
pub fn line_diff(old: &str, new: &str) -> LineDiff {
    if old == new {
        return LineDiff {
            ops: old.lines().map(|l| DiffOp::Equal(l.to_string())).collect(),
        };
    }

    let text_diff = TextDiff::from_lines(old, new);
    let ops = text_diff
        .iter_all_changes()
        .map(|change| {
            let text = strip_terminator(change.value());
            match change.tag() {
                ChangeTag::Equal => DiffOp::Equal(text),
                ChangeTag::Delete => DiffOp::Removed(text),
                ChangeTag::Insert => DiffOp::Added(text),
            }
        })
        .collect();
    LineDiff { ops }
}

/// Diff `old` against `new` and group the changes into hunks carrying
/// `context` equal lines on each side.
///
/// Changes closer than `2 * context` lines share a hunk.
pub fn diff_hunks(old: &str, new: &str, context: usize) -> Vec<DiffHunk> {
    if old == new {
        return Vec::new();
    }

    let text_diff = TextDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(context) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut hunk = DiffHunk {
            old_start: first.old_range().start + 1,
            old_count: 0,
            new_start: first.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = strip_terminator(change.value());
                match change.tag() {
                    ChangeTag::Equal => {
                        hunk.lines.push(DiffOp::Equal(text));
                        hunk.old_count += 1;
                        hunk.new_count += 1;
                    }
                    ChangeTag::Delete => {
                        hunk.lines.push(DiffOp::Removed(text));
                        hunk.old_count += 1;
                    }
                    ChangeTag::Insert => {
                        hunk.lines.push(DiffOp::Added(text));
                        hunk.new_count += 1;
                    }
                }
            }
        }
        hunks.push(hunk);
    }
    hunks
}

/// Compare `current` and `target` line by line at equal indices.
///
/// Both sides are split on `'\n'`; a side that runs out of lines reads as
/// empty. At each index where the lines differ, the current line is emitted
/// as removed followed by the target line as added.
pub fn aligned_diff(current: &str, target: &str) -> LineDiff {
    let current_lines: Vec<&str> = current.split('\n').collect();
    let target_lines: Vec<&str> = target.split('\n').collect();
    let max = current_lines.len().max(target_lines.len());

    let mut ops = Vec::new();
    for i in 0..max {
        let cur = current_lines.get(i).copied().unwrap_or("");
        let tgt = target_lines.get(i).copied().unwrap_or("");
        if cur == tgt {
            ops.push(DiffOp::Equal(cur.to_string()));
        } else {
            ops.push(DiffOp::Removed(cur.to_string()));
            ops.push(DiffOp::Added(tgt.to_string()));
        }
    }
    LineDiff { ops }
}

fn strip_terminator(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line).to_string()
}
