//! In-memory model of a rendered diff page
//!
//! The host adapter walks the real page and emits a snapshot of the
//! structures this subsystem cares about: diff containers, their hunk
//! rows, and the numbering/code cells inside each row. Everything here
//! mirrors the page-structure contract; nothing here touches a live
//! rendering engine, so tests can build these models directly.

use serde::Deserialize;

/// How a container's diff table is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Separate old/new columns per row
    Split,
    /// One shared column, old and new interleaved as separate rows
    Unified,
}

/// Change marker carried by a numbering cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMarker {
    Addition,
    Deletion,
}

/// One numbering cell (`td.blob-num` in the rendered page)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberCell {
    /// 1-based line number as rendered (`data-line-number`)
    pub line_number: u32,
    /// Addition/deletion marker class, if any
    #[serde(default)]
    pub marker: Option<ChangeMarker>,
}

/// One code-content cell (`td.blob-code`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCell {
    /// Rendered markup of the cell, handed through to the payload
    pub html: String,
}

/// One rendered row of a diff table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel {
    /// True if the row carries the hunk marker attribute
    #[serde(default)]
    pub hunk: bool,
    /// Numbering cells in document order (old first, new second)
    #[serde(default)]
    pub number_cells: Vec<NumberCell>,
    /// Code cells in document order (old/only first, new second)
    #[serde(default)]
    pub code_cells: Vec<CodeCell>,
}

/// One file's diff block
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerModel {
    /// File-kind marker (`data-file-type`), e.g. ".hs"
    pub file_type: String,
    /// Header link text; absent when the page structure is unexpected
    #[serde(default)]
    pub file_path: Option<String>,
    /// True if the table carries the split-layout marker
    #[serde(default)]
    pub split_table: bool,
    #[serde(default)]
    pub rows: Vec<RowModel>,
}

/// Snapshot of the whole page, containers in document order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    #[serde(default)]
    pub containers: Vec<ContainerModel>,
}

impl PageModel {
    /// All containers whose file-kind marker matches the target kind.
    /// An empty result is not an error; the caller logs and moves on.
    pub fn containers(&self, file_kind: &str) -> Vec<&ContainerModel> {
        self.containers
            .iter()
            .filter(|c| c.file_type == file_kind)
            .collect()
    }
}

impl ContainerModel {
    /// Split if the split-layout marker is present, unified otherwise
    pub fn mode(&self) -> RenderMode {
        if self.split_table {
            RenderMode::Split
        } else {
            RenderMode::Unified
        }
    }

    /// File path from the container header link text.
    /// `None` means the page is not structured as expected; the caller
    /// treats that as fatal for the whole scan.
    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Qualifying rows (those carrying the hunk marker), document order
    pub fn hunk_rows(&self) -> impl Iterator<Item = &RowModel> {
        self.rows.iter().filter(|r| r.hunk)
    }
}
