//! Line-state resolution for diff rows
//!
//! This is the heart of the subsystem: given the numbering cells of one
//! rendered row, recover the pre/post-image line numbers and classify
//! each displayed line as added, deleted or unmodified. All functions
//! here are pure; the scan driver in `annotate` feeds them rows.

use serde::Serialize;
use std::fmt;

use crate::page::{ChangeMarker, CodeCell, NumberCell, RowModel};

/// Classified state of one displayed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineState {
    Added,
    Deleted,
    Unmodified,
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "ADDED",
            Self::Deleted => "DELETED",
            Self::Unmodified => "UNMODIFIED",
        };
        write!(f, "{}", s)
    }
}

/// Resolved 0-based line number plus its classified state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    pub line_number: u32,
    pub state: LineState,
}

/// Classify a single numbering cell. Total and mutually exclusive:
/// exactly one of the three states always applies.
pub fn classify(cell: &NumberCell) -> LineState {
    match cell.marker {
        Some(ChangeMarker::Addition) => LineState::Added,
        Some(ChangeMarker::Deletion) => LineState::Deleted,
        None => LineState::Unmodified,
    }
}

/// Rendered numbers are 1-based; records store the 0-based equivalent.
/// This is the only place indices are rebased.
fn rebase(rendered: u32) -> u32 {
    rendered.saturating_sub(1)
}

/// The first two numbering cells of a row, in document order: old side
/// first, new side second. Both are present in markup in both modes;
/// fewer than two means the row violates the page contract.
pub fn number_cells(row: &RowModel) -> Option<(&NumberCell, &NumberCell)> {
    match row.number_cells.as_slice() {
        [old, new, ..] => Some((old, new)),
        _ => None,
    }
}

/// Resolve a split-mode row into its two line records.
///
/// Each side has its own numbering and code cell:
///
/// ```text
///   old cell                new cell
///   v                       v
/// | 8 | - some old code   | 8 | + some new code
/// ```
///
/// The sides are derived independently from their own cell; they never
/// share a state or number.
pub fn resolve_split(old: &NumberCell, new: &NumberCell) -> (LineRecord, LineRecord) {
    (
        LineRecord {
            line_number: rebase(old.line_number),
            state: classify(old),
        },
        LineRecord {
            line_number: rebase(new.line_number),
            state: classify(new),
        },
    )
}

/// Resolve a unified-mode row into its single line record.
///
/// The two numbering cells sit side by side and only one is populated
/// for added/deleted lines:
///
/// ```text
///   old cell
///       new cell
///   v   v
/// | 8 |   | - some old code
/// |   | 8 | + some new code
/// ```
///
/// The old-side cell is the one whose marker distinguishes "deleted"
/// from "not deleted", so the state always comes from it; a deleted
/// line keeps the old-side number, anything else takes the new-side
/// number (an added line has no meaningful old-side number).
pub fn resolve_unified(old: &NumberCell, new: &NumberCell) -> LineRecord {
    let state = classify(old);
    let line_number = if state == LineState::Deleted {
        rebase(old.line_number)
    } else {
        rebase(new.line_number)
    };
    LineRecord { state, line_number }
}

/// Locate the rendered code cells of a split-mode row by position:
/// first is the old side, second the new side. Both are supposed to
/// exist; a missing side is reported as `None` and handled as a
/// line-local miss by the binder.
pub fn code_nodes_split(row: &RowModel) -> (Option<&CodeCell>, Option<&CodeCell>) {
    let mut cells = row.code_cells.iter();
    (cells.next(), cells.next())
}

/// Locate the single code cell of a unified-mode row
pub fn code_node_unified(row: &RowModel) -> Option<&CodeCell> {
    row.code_cells.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(line_number: u32, marker: Option<ChangeMarker>) -> NumberCell {
        NumberCell {
            line_number,
            marker,
        }
    }

    // --- classify ---

    #[test]
    fn classify_is_total_and_exclusive() {
        assert_eq!(
            classify(&cell(1, Some(ChangeMarker::Addition))),
            LineState::Added
        );
        assert_eq!(
            classify(&cell(1, Some(ChangeMarker::Deletion))),
            LineState::Deleted
        );
        assert_eq!(classify(&cell(1, None)), LineState::Unmodified);
    }

    // --- resolve_split ---

    #[test]
    fn split_resolves_both_sides_independently() {
        // old 5 deleted, new 5 added (scenario B)
        let (old, new) = resolve_split(
            &cell(5, Some(ChangeMarker::Deletion)),
            &cell(5, Some(ChangeMarker::Addition)),
        );
        assert_eq!(
            old,
            LineRecord {
                line_number: 4,
                state: LineState::Deleted
            }
        );
        assert_eq!(
            new,
            LineRecord {
                line_number: 4,
                state: LineState::Added
            }
        );
    }

    #[test]
    fn split_rebases_each_side_from_its_own_cell() {
        let (old, new) = resolve_split(&cell(10, None), &cell(12, None));
        assert_eq!(old.line_number, 9);
        assert_eq!(new.line_number, 11);
        assert_eq!(old.state, LineState::Unmodified);
        assert_eq!(new.state, LineState::Unmodified);
    }

    // --- resolve_unified ---

    #[test]
    fn unified_deletion_keeps_old_number() {
        // scenario A: old attr 9 with deletion marker, new attr 9 unmarked
        let record = resolve_unified(&cell(9, Some(ChangeMarker::Deletion)), &cell(9, None));
        assert_eq!(
            record,
            LineRecord {
                line_number: 8,
                state: LineState::Deleted
            }
        );
    }

    #[test]
    fn unified_unmodified_takes_new_number() {
        let record = resolve_unified(&cell(3, None), &cell(7, None));
        assert_eq!(
            record,
            LineRecord {
                line_number: 6,
                state: LineState::Unmodified
            }
        );
    }

    #[test]
    fn unified_addition_takes_new_number() {
        let record = resolve_unified(&cell(0, Some(ChangeMarker::Addition)), &cell(42, None));
        assert_eq!(
            record,
            LineRecord {
                line_number: 41,
                state: LineState::Added
            }
        );
    }

    // --- number_cells ---

    #[test]
    fn number_cells_requires_two() {
        let row = RowModel {
            hunk: true,
            number_cells: vec![cell(1, None)],
            code_cells: Vec::new(),
        };
        assert!(number_cells(&row).is_none());
    }

    #[test]
    fn number_cells_takes_first_two_in_document_order() {
        let row = RowModel {
            hunk: true,
            number_cells: vec![cell(4, None), cell(9, None)],
            code_cells: Vec::new(),
        };
        let (old, new) = number_cells(&row).unwrap();
        assert_eq!(old.line_number, 4);
        assert_eq!(new.line_number, 9);
    }

    // --- code node location ---

    fn code(html: &str) -> CodeCell {
        CodeCell {
            html: html.to_string(),
        }
    }

    #[test]
    fn code_nodes_split_positional() {
        let row = RowModel {
            hunk: true,
            number_cells: Vec::new(),
            code_cells: vec![code("<td>a</td>"), code("<td>b</td>")],
        };
        let (old, new) = code_nodes_split(&row);
        assert_eq!(old.unwrap().html, "<td>a</td>");
        assert_eq!(new.unwrap().html, "<td>b</td>");
    }

    #[test]
    fn code_nodes_split_reports_missing_side() {
        let row = RowModel {
            hunk: true,
            number_cells: Vec::new(),
            code_cells: vec![code("<td>a</td>")],
        };
        let (old, new) = code_nodes_split(&row);
        assert!(old.is_some());
        assert!(new.is_none());
    }

    #[test]
    fn code_node_unified_takes_first_only() {
        let row = RowModel {
            hunk: true,
            number_cells: Vec::new(),
            code_cells: vec![code("<td>only</td>"), code("<td>ignored</td>")],
        };
        assert_eq!(code_node_unified(&row).unwrap().html, "<td>only</td>");
    }

    #[test]
    fn code_node_unified_missing() {
        let row = RowModel {
            hunk: true,
            number_cells: Vec::new(),
            code_cells: Vec::new(),
        };
        assert!(code_node_unified(&row).is_none());
    }
}
