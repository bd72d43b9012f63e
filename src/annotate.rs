//! Scan driver and annotation binding
//!
//! Walks the page snapshot container by container, row by row, in
//! document order: resolve each row's line records, pick the content
//! side for each classified line, join it with the module info and
//! hand the payload to the rendering sink. Misses are strictly local
//! to one line; only a missing file path aborts the pass.

use serde::Serialize;
use thiserror::Error;

use crate::moduleinfo::{content_side, ContentSide, ModuleLookup, PackageInfoResponse};
use crate::page::{CodeCell, PageModel, RenderMode};
use crate::resolve::{self, LineRecord, LineState};

/// Fatal conditions: these stop the annotation pass for the whole page
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not resolve a file path for diff container #{index}")]
    PathResolution { index: usize },
}

/// Why one line could not be matched to annotation content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// No module info for the file on the selected side
    UntrackedFile,
    /// The content sequence has no entry at the resolved index
    MissingContent,
    /// No code cell resolved for that side of the row
    MissingCodeNode,
    /// Qualifying row without the two expected numbering cells
    MalformedRow,
}

/// One recoverable, line-local resolution miss
#[derive(Debug, Clone)]
pub struct LineMiss {
    pub file_path: String,
    /// Absent for malformed rows, where no record could be formed
    pub line: Option<LineRecord>,
    pub reason: MissReason,
}

/// The unit handed to the rendering collaborator for one annotated line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPayload {
    pub file_path: String,
    pub state: LineState,
    /// Resolved 0-based line number
    pub line_number: u32,
    pub source_line_content: String,
    #[serde(rename = "renderedLineHTML")]
    pub rendered_line_html: String,
}

/// Rendering collaborator boundary: one initialization call per
/// annotated line, anchored to that side's code cell
pub trait AnnotationSink {
    fn init(&mut self, anchor: &CodeCell, payload: AnnotationPayload);
}

/// Sink that records payloads in scan order (CLI output and tests)
#[derive(Debug, Default)]
pub struct CollectSink {
    pub payloads: Vec<AnnotationPayload>,
}

impl AnnotationSink for CollectSink {
    fn init(&mut self, _anchor: &CodeCell, payload: AnnotationPayload) {
        self.payloads.push(payload);
    }
}

/// Outcome of one annotation pass
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Containers of the target kind that were scanned
    pub containers: usize,
    /// Containers skipped because neither side had module info
    pub skipped_files: usize,
    /// Containers with zero qualifying rows
    pub empty_containers: usize,
    /// Lines successfully annotated
    pub annotated: usize,
    pub misses: Vec<LineMiss>,
}

/// Drives one synchronous annotation pass over a page snapshot
pub struct Annotator<'a> {
    info: &'a PackageInfoResponse,
    file_kind: &'a str,
}

impl<'a> Annotator<'a> {
    pub fn new(info: &'a PackageInfoResponse, file_kind: &'a str) -> Self {
        Self { info, file_kind }
    }

    /// Scan the page and emit payloads through the sink. Recomputes
    /// everything from the snapshot; nothing is cached between calls.
    pub fn scan(
        &self,
        page: &PageModel,
        sink: &mut dyn AnnotationSink,
    ) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();

        let containers = page.containers(self.file_kind);
        if containers.is_empty() {
            log::info!(
                "no {} diff containers found on this page, nothing to annotate",
                self.file_kind
            );
            return Ok(report);
        }

        // Resolve every container's path up front: a missing path is
        // fatal for the whole page, and nothing may have been
        // annotated by the time it is detected.
        let mut resolved = Vec::with_capacity(containers.len());
        for (index, container) in containers.iter().enumerate() {
            let file_path = container
                .file_path()
                .ok_or(ScanError::PathResolution { index })?;
            resolved.push((*container, file_path));
        }

        for (container, file_path) in resolved {
            let mode = container.mode();
            report.containers += 1;

            let old_info = self.info.old_module(file_path);
            let new_info = self.info.new_module(file_path);
            if !old_info.is_tracked() && !new_info.is_tracked() {
                log::debug!("no module info for {} on either side, skipping", file_path);
                report.skipped_files += 1;
                continue;
            }

            let mut saw_row = false;
            for row in container.hunk_rows() {
                saw_row = true;

                let Some((old_cell, new_cell)) = resolve::number_cells(row) else {
                    log::error!(
                        "row without two numbering cells in {}, skipping row",
                        file_path
                    );
                    report.misses.push(LineMiss {
                        file_path: file_path.to_string(),
                        line: None,
                        reason: MissReason::MalformedRow,
                    });
                    continue;
                };

                match mode {
                    RenderMode::Split => {
                        let (old, new) = resolve::resolve_split(old_cell, new_cell);
                        let (old_node, new_node) = resolve::code_nodes_split(row);
                        self.bind(file_path, old, old_node, old_info, new_info, sink, &mut report);
                        self.bind(file_path, new, new_node, old_info, new_info, sink, &mut report);
                    }
                    RenderMode::Unified => {
                        let record = resolve::resolve_unified(old_cell, new_cell);
                        let node = resolve::code_node_unified(row);
                        self.bind(file_path, record, node, old_info, new_info, sink, &mut report);
                    }
                }
            }

            if !saw_row {
                log::warn!(
                    "could not find any diff rows for {}, annotation skipped for this file",
                    file_path
                );
                report.empty_containers += 1;
            }
        }

        Ok(report)
    }

    /// Join one resolved line with its content source and hand it off,
    /// or record a line-local miss and leave the rendered line alone.
    #[allow(clippy::too_many_arguments)]
    fn bind(
        &self,
        file_path: &str,
        record: LineRecord,
        node: Option<&CodeCell>,
        old_info: ModuleLookup<'_>,
        new_info: ModuleLookup<'_>,
        sink: &mut dyn AnnotationSink,
        report: &mut ScanReport,
    ) {
        let lookup = match content_side(record.state) {
            ContentSide::Old => old_info,
            ContentSide::New => new_info,
        };

        let reason = match (node, &lookup) {
            (None, _) => Some(MissReason::MissingCodeNode),
            (Some(_), ModuleLookup::Untracked) => Some(MissReason::UntrackedFile),
            (Some(_), ModuleLookup::Tracked(_)) => match lookup.line(record.line_number) {
                Some(_) => None,
                None => Some(MissReason::MissingContent),
            },
        };

        if let Some(reason) = reason {
            // Rendered line number, for log readability
            log::error!(
                "could not fetch {} line {} for file {}, keeping the rendered content",
                record.state,
                record.line_number + 1,
                file_path
            );
            report.misses.push(LineMiss {
                file_path: file_path.to_string(),
                line: Some(record),
                reason,
            });
            return;
        }

        // Checked above; both lookups hold
        let (Some(node), Some(content)) = (node, lookup.line(record.line_number)) else {
            return;
        };

        sink.init(
            node,
            AnnotationPayload {
                file_path: file_path.to_string(),
                state: record.state,
                line_number: record.line_number,
                source_line_content: content.to_string(),
                rendered_line_html: node.html.clone(),
            },
        );
        report.annotated += 1;
    }
}
