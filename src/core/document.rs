//! Loading and saving configuration documents

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::model::{Document, DocumentError, Header, Item};

/// On-disk layout: header plus a flat object list
#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    header: Header,
    #[serde(default)]
    objects: Vec<Item>,
}

/// Read and parse a document from a file
pub fn read_file(path: &Path) -> Result<Document, DocumentError> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let doc = parse(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Loaded document {} ({} objects in {} groups)",
        path.display(),
        doc.item_count(),
        doc.groups().len()
    );
    Ok(doc)
}

/// Parse a document from its JSON text
pub fn parse(content: &str) -> Result<Document, serde_json::Error> {
    let file: DocumentFile = serde_json::from_str(content)?;
    Ok(Document::from_items(file.header, file.objects))
}

/// Serialize a document to JSON text, group by group
pub fn to_json(doc: &Document) -> Result<String, serde_json::Error> {
    let file = DocumentFile {
        header: doc.header().clone(),
        objects: doc.items().cloned().collect(),
    };
    serde_json::to_string_pretty(&file)
}

/// Save a document.
///
/// Without `overwrite`, an existing `path` is left alone and the document goes
/// to the first free `<stem>_new.<ext>`, `<stem>_new2.<ext>`, ... sibling.
/// With `backup`, a file about to be replaced is first copied to `<file>.bak`.
///
/// Returns the path that was written.
pub fn save_file(
    doc: &Document,
    path: &Path,
    overwrite: bool,
    backup: bool,
) -> Result<PathBuf, DocumentError> {
    let target = if overwrite || !path.exists() {
        path.to_path_buf()
    } else {
        free_sibling(path)
    };

    let save_err = |source| DocumentError::Save {
        path: target.clone(),
        source,
    };

    if backup && target.exists() {
        let backup_path = backup_path(&target);
        fs::copy(&target, &backup_path).map_err(save_err)?;
        tracing::info!("Backed up {} to {}", target.display(), backup_path.display());
    }

    let content = to_json(doc).map_err(|e| save_err(e.into()))?;
    fs::write(&target, content).map_err(save_err)?;

    tracing::info!("Saved document: {}", target.display());
    Ok(target)
}

/// `<file>.bak` next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

fn free_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().to_string());

    let mut n = 1usize;
    loop {
        let suffix = if n == 1 { "_new".to_string() } else { format!("_new{n}") };
        let name = match &ext {
            Some(ext) => format!("{stem}{suffix}.{ext}"),
            None => format!("{stem}{suffix}"),
        };
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
