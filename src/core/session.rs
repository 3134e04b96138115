//! An open document together with its tree projection

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::FileSettings;
use super::document;
use super::model::Document;
use super::process::{self, Cleanup, ProcessReport};
use crate::tree::{Column, Handle, TreeError, TreeProjection, TypeFilter};

/// State behind one file page
#[derive(Debug)]
pub struct FileSession {
    /// File the document was loaded from
    pub path: PathBuf,
    pub document: Document,
    pub projection: TreeProjection,
    pub settings: FileSettings,
    /// Unsaved changes
    pub modified: bool,
    /// Groups currently expanded in the tree
    pub expanded: HashSet<Handle>,
}

impl FileSession {
    /// Load a document and project it with the system type filter
    pub fn open(path: &Path, settings: FileSettings) -> Result<Self> {
        let document = document::read_file(path)
            .with_context(|| format!("Failed to open document: {}", path.display()))?;
        Ok(Self::from_document(path.to_path_buf(), document, settings))
    }

    pub fn from_document(path: PathBuf, document: Document, settings: FileSettings) -> Self {
        let projection = TreeProjection::new(&document, TypeFilter::system());
        Self {
            path,
            document,
            projection,
            settings,
            modified: false,
            expanded: HashSet::new(),
        }
    }

    /// Tab title: file name, with `*` when there are unsaved changes
    pub fn title(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.modified {
            format!("{name}*")
        } else {
            name
        }
    }

    pub fn is_expanded(&self, handle: Handle) -> bool {
        self.expanded.contains(&handle)
    }

    /// Expand or collapse a group
    pub fn toggle(&mut self, handle: Handle) {
        if !self.expanded.remove(&handle) {
            self.expanded.insert(handle);
        }
    }

    /// Rename an object through the tree's name column
    pub fn rename(&mut self, handle: Handle, name: &str) -> Result<(), TreeError> {
        let col = Column::Name as usize;
        let current = self.projection.get_value(&self.document, handle, col)?;
        if current == name {
            return Ok(());
        }
        self.projection
            .set_value(&mut self.document, handle, col, name)?;
        self.modified = true;
        Ok(())
    }

    /// Run the cleanup pass. Re-projects the document if its structure
    /// changed, which drops every outstanding handle.
    pub fn process(&mut self) -> ProcessReport {
        let report = process::process(&mut self.document, &Cleanup);

        if !self.projection.is_current(&self.document) {
            self.projection.rebuild(&self.document);
            self.expanded.clear();
        }
        if !report.is_noop() {
            self.modified = true;
        }
        report
    }

    /// Save with this page's settings. Returns the path written.
    pub fn save(&mut self) -> Result<PathBuf> {
        let written = document::save_file(
            &self.document,
            &self.path,
            self.settings.overwrite,
            self.settings.backup,
        )?;
        self.modified = false;
        Ok(written)
    }
}
