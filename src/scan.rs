//! Filesystem scanning and index document generation.
//!
//! Walks a collection root and produces an [`IndexNode`] tree: one node per
//! folder, holding the image file names that live directly in it and the
//! child folders keyed by name.
//!
//! ## Directory Structure
//!
//! Any nesting works. Folders become navigable groups, image files become
//! photos, everything else is ignored:
//!
//! ```text
//! photos/                          # Collection root
//! ├── config.toml                  # Display config (ignored by the scan)
//! ├── hero.jpg                     # Root-level photo
//! ├── Fauna/
//! │   ├── fox.jpg
//! │   └── Birds/
//! │       ├── heron.png
//! │       └── notes.txt            # Not an image, skipped
//! └── Empty/                       # Kept as an empty node
//! ```
//!
//! ## Output
//!
//! The index document is JSON, recursively:
//!
//! ```json
//! { "photos": ["hero.jpg"], "folders": { "Fauna": { "photos": [...], "folders": {...} } } }
//! ```
//!
//! ## Failure Policy
//!
//! Scanning never fails. A missing root yields an empty node. A directory
//! that cannot be read (permissions, concurrent deletion) becomes an empty
//! node and the scan carries on with its siblings; the condition is logged.
//!
//! Symbolic links are followed and there is no cycle detection, so a link
//! pointing back up the tree recurses until the stack runs out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid index document: {0}")]
    Json(#[from] serde_json::Error),
}

/// File extensions (lowercase, without the dot) that count as photos.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// One folder level of the collection.
///
/// `photos` is sorted by ordinal string comparison. `folders` iterates in
/// ordinal key order, which makes every traversal of the tree deterministic
/// regardless of the order the filesystem returned entries in.
///
/// Nodes are rebuilt from scratch on every scan and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexNode {
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub folders: BTreeMap<String, IndexNode>,
}

impl IndexNode {
    /// Child folder by name.
    pub fn folder(&self, name: &str) -> Option<&IndexNode> {
        self.folders.get(name)
    }

    /// True when the node holds neither photos nor sub-folders.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.folders.is_empty()
    }

    /// Number of photos in this node and all of its descendants.
    pub fn photo_count(&self) -> usize {
        self.photos.len()
            + self
                .folders
                .values()
                .map(IndexNode::photo_count)
                .sum::<usize>()
    }

    /// Number of folders below this node, at any depth.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
            + self
                .folders
                .values()
                .map(IndexNode::folder_count)
                .sum::<usize>()
    }

    pub fn to_json_pretty(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an index document. Missing `photos`/`folders` keys read as empty.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write an index document to disk as pretty-printed JSON.
pub fn write_index(path: &Path, node: &IndexNode) -> Result<(), IndexError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, node.to_json_pretty()?)?;
    Ok(())
}

/// Read an index document previously written by [`write_index`] (or by any
/// other producer of the same shape).
pub fn read_index(path: &Path) -> Result<IndexNode, IndexError> {
    let content = fs::read_to_string(path)?;
    IndexNode::from_json(&content)
}

/// Scan a collection root into an index tree.
///
/// A root that does not exist is a valid, empty collection.
pub fn scan(root: &Path) -> IndexNode {
    if !root.exists() {
        debug!(root = %root.display(), "collection root does not exist, indexing as empty");
        return IndexNode::default();
    }
    scan_directory(root)
}

/// Scan one directory, degrading to an empty node when it cannot be read.
fn scan_directory(dir: &Path) -> IndexNode {
    match read_directory(dir) {
        Ok(node) => node,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "cannot read directory, indexing it as empty");
            IndexNode::default()
        }
    }
}

fn read_directory(dir: &Path) -> io::Result<IndexNode> {
    let mut node = IndexNode::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // fs::metadata follows symlinks; a dangling link is neither file nor dir
        let Ok(meta) = fs::metadata(&path) else {
            debug!(path = %path.display(), "skipping entry without readable metadata");
            continue;
        };

        if meta.is_dir() {
            node.folders.insert(name, scan_directory(&path));
        } else if meta.is_file() && is_image_name(&name) {
            node.photos.push(name);
        }
    }

    node.photos.sort();
    Ok(node)
}

/// Whether a file name carries one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
