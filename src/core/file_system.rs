//! Workspace folder scanning for configuration documents

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

const MAX_DEPTH: usize = 10;

/// File extensions recognised as configuration documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["json"];

/// Whether `path` looks like a configuration document
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// A directory or document file in the workspace
#[derive(Debug, Clone)]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub children: Vec<FileNode>,
    pub expanded: bool,
}

impl FileNode {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            name,
            path,
            is_dir,
            children: Vec::new(),
            expanded: false,
        }
    }

    /// Sort children: directories first, then files, alphabetically
    pub fn sort_children(&mut self) {
        self.children.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });
        for child in &mut self.children {
            child.sort_children();
        }
    }

    /// Number of document files below this node
    pub fn document_count(&self) -> usize {
        if self.is_dir {
            self.children.iter().map(FileNode::document_count).sum()
        } else {
            1
        }
    }
}

/// Documents under a workspace folder
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    pub root: Option<FileNode>,
    pub root_path: Option<PathBuf>,
    /// Every document below the root, sorted by path
    pub documents: Vec<PathBuf>,
}

impl FileTree {
    /// Scan a folder for documents
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut root = FileNode::new(path.to_path_buf(), true);
        root.expanded = true;

        Self::build_tree(&mut root, path, 0)
            .with_context(|| format!("Failed to scan folder: {}", path.display()))?;
        root.sort_children();

        tracing::info!(
            "Found {} documents under {}",
            root.document_count(),
            path.display()
        );

        let mut documents = find_documents(path);
        documents.sort();

        Ok(Self {
            root: Some(root),
            root_path: Some(path.to_path_buf()),
            documents,
        })
    }

    fn build_tree(node: &mut FileNode, path: &Path, depth: usize) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Ok(());
        }

        for entry in std::fs::read_dir(path)?.flatten() {
            let entry_path = entry.path();
            let hidden = entry_path
                .file_name()
                .map(|s| s.to_string_lossy().starts_with('.'))
                .unwrap_or(false);
            if hidden {
                continue;
            }

            if entry_path.is_dir() {
                let mut child = FileNode::new(entry_path.clone(), true);
                Self::build_tree(&mut child, &entry_path, depth + 1)?;
                // Folders without documents only add noise
                if child.document_count() > 0 {
                    node.children.push(child);
                }
            } else if is_document(&entry_path) {
                node.children.push(FileNode::new(entry_path, false));
            }
        }

        Ok(())
    }

    /// Re-scan the folder
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(root_path) = self.root_path.clone() {
            *self = Self::from_path(&root_path)?;
        }
        Ok(())
    }

    /// Documents whose file name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Path> {
        let query = query.to_lowercase();
        self.documents
            .iter()
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_lowercase().contains(&query))
                    .unwrap_or(false)
            })
            .map(PathBuf::as_path)
            .collect()
    }

    /// Toggle expansion state of a directory
    pub fn toggle_expanded(&mut self, path: &Path) {
        if let Some(ref mut root) = self.root {
            Self::toggle_in_node(root, path);
        }
    }

    fn toggle_in_node(node: &mut FileNode, path: &Path) {
        if node.path == path {
            node.expanded = !node.expanded;
            return;
        }

        for child in &mut node.children {
            Self::toggle_in_node(child, path);
        }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// All documents under `path`, in walk order, skipping hidden entries
pub fn find_documents(path: &Path) -> Vec<PathBuf> {
    WalkDir::new(path)
        .max_depth(MAX_DEPTH)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_document(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}
