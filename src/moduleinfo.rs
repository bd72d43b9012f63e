//! Module-info data contract
//!
//! The retrieval collaborator answers one request with per-file,
//! line-indexed annotation content for both images of the diff. This
//! module mirrors that wire shape and gives lookups an explicit
//! tracked/untracked result so call sites never test for absent
//! properties ad hoc.

use serde::Deserialize;
use std::collections::HashMap;

use crate::resolve::LineState;

/// Per-file annotation source, indexed 0-based by line number
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    /// Sparse sequence: `null` at an index means that line carries no
    /// annotation
    #[serde(default)]
    pub file_content: Vec<Option<String>>,
}

impl ModuleInfo {
    /// Annotation content for a 0-based line number, if present
    pub fn line(&self, line_number: u32) -> Option<&str> {
        self.file_content.get(line_number as usize)?.as_deref()
    }
}

/// Response of the module-info retrieval collaborator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfoResponse {
    /// Pre-image info, keyed by file path
    #[serde(default)]
    pub old_package_info: HashMap<String, ModuleInfo>,
    /// Post-image info, keyed by file path
    #[serde(default)]
    pub new_package_info: HashMap<String, ModuleInfo>,
}

/// Lookup result for one file path on one side of the diff
#[derive(Debug, Clone, Copy)]
pub enum ModuleLookup<'a> {
    Tracked(&'a ModuleInfo),
    /// The file is not part of that image's package info
    Untracked,
}

impl<'a> ModuleLookup<'a> {
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked(_))
    }

    /// Annotation content at a 0-based line number; untracked files
    /// have none
    pub fn line(&self, line_number: u32) -> Option<&'a str> {
        match self {
            Self::Tracked(info) => info.line(line_number),
            Self::Untracked => None,
        }
    }
}

impl PackageInfoResponse {
    /// Pre-image lookup for a file path
    pub fn old_module(&self, file_path: &str) -> ModuleLookup<'_> {
        match self.old_package_info.get(file_path) {
            Some(info) => ModuleLookup::Tracked(info),
            None => ModuleLookup::Untracked,
        }
    }

    /// Post-image lookup for a file path
    pub fn new_module(&self, file_path: &str) -> ModuleLookup<'_> {
        match self.new_package_info.get(file_path) {
            Some(info) => ModuleLookup::Tracked(info),
            None => ModuleLookup::Untracked,
        }
    }
}

/// Which image a classified line is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSide {
    /// Pre-image (old file)
    Old,
    /// Post-image (new file)
    New,
}

/// Deleted and unmodified lines are matched against the old file's
/// content table, added lines against the new file's.
pub fn content_side(state: LineState) -> ContentSide {
    match state {
        LineState::Added => ContentSide::New,
        LineState::Deleted | LineState::Unmodified => ContentSide::Old,
    }
}
