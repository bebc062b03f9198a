//! Conversion from `similar` diff operations to coalesced line edits.

use revdiff_algorithm_api::{split_lines, Edit};
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Run `algorithm` over the line slices and fold its operations into edits.
pub(crate) fn capture_edits(algorithm: Algorithm, old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
    let ops = capture_diff_slices(algorithm, old, new);
    coalesce(&ops)
}

fn coalesce(ops: &[DiffOp]) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut pending: Option<Edit> = None;

    for op in ops {
        if matches!(op, DiffOp::Equal { .. }) {
            if let Some(edit) = pending.take() {
                edits.push(edit);
            }
            continue;
        }

        let old_range = op.old_range();
        let new_range = op.new_range();
        let next = Edit::new(
            to_line(old_range.start),
            to_line(old_range.end),
            to_line(new_range.start),
            to_line(new_range.end),
        );

        pending = Some(match pending {
            Some(mut edit) if edit.end_old == next.begin_old && edit.end_new == next.begin_new => {
                edit.end_old = next.end_old;
                edit.end_new = next.end_new;
                edit
            }
            Some(edit) => {
                edits.push(edit);
                next
            }
            None => next,
        });
    }

    if let Some(edit) = pending {
        edits.push(edit);
    }

    edits
}

fn to_line(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Line-based similarity of two contents as a percentage.
///
/// Identical contents score 100; two empty contents are identical.
#[must_use]
pub fn similarity_percent(old: &[u8], new: &[u8]) -> u8 {
    if old == new {
        return 100;
    }
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let total = old_lines.len() + new_lines.len();
    let matched: usize = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines)
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum();
    let percent = (matched * 200 + total / 2) / total.max(1);
    u8::try_from(percent).unwrap_or(100)
}
