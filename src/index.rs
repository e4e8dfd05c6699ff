//! Photo listings derived from an index tree.
//!
//! Two views exist over the same [`IndexNode`]:
//!
//! - [`flatten`] — every photo in the collection, depth-first: a folder's own
//!   photos come before anything in its sub-folders. Feeds the "all photos"
//!   home view.
//! - [`resolve_folder`] — the photos directly inside one folder, without
//!   descending. Feeds the per-folder gallery view.
//!
//! Both are pure and return fully materialized lists; calling them twice on
//! the same tree gives the same result.
//!
//! ## Path semantics
//!
//! Every [`PhotoRef`] carries an absolute, slash-separated `path` from the
//! collection root (`/Fauna/Birds/heron.png`), the file `name`, and the
//! `full_path` of the containing folder (`/Fauna/Birds`, or `/` for the root).
//! `path` is always `full_path` with its trailing slash removed, then `/`, then
//! `name`.

use crate::scan::IndexNode;
use serde::{Deserialize, Serialize};

/// A resolved, addressable photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub path: String,
    pub name: String,
    pub full_path: String,
}

impl PhotoRef {
    /// Build a reference from a normalized folder path (`""` for the root).
    fn in_folder(folder: &str, name: &str) -> Self {
        Self {
            path: format!("{folder}/{name}"),
            name: name.to_string(),
            full_path: if folder.is_empty() {
                "/".to_string()
            } else {
                folder.to_string()
            },
        }
    }

    /// Containing folder without a trailing slash (`""` for the root).
    pub fn folder_prefix(&self) -> &str {
        self.full_path.trim_end_matches('/')
    }
}

/// Every photo in the tree, in depth-first pre-order.
///
/// Within a node the stored (sorted) photo order is kept; sub-folders are
/// visited in the node's folder iteration order.
pub fn flatten(root: &IndexNode) -> Vec<PhotoRef> {
    let mut photos = Vec::with_capacity(root.photo_count());
    collect(root, "", &mut photos);
    photos
}

fn collect(node: &IndexNode, folder: &str, out: &mut Vec<PhotoRef>) {
    out.extend(node.photos.iter().map(|name| PhotoRef::in_folder(folder, name)));

    for (name, child) in &node.folders {
        collect(child, &format!("{folder}/{name}"), out);
    }
}

/// Photos stored directly in the folder at `folder_path`.
///
/// `""` and `"/"` address the root. A path naming a folder that does not
/// exist yields an empty list.
pub fn resolve_folder(root: &IndexNode, folder_path: &str) -> Vec<PhotoRef> {
    let mut node = root;
    for segment in segments(folder_path) {
        match node.folders.get(segment) {
            Some(child) => node = child,
            None => return Vec::new(),
        }
    }

    let folder = normalize_folder_path(folder_path);
    node.photos
        .iter()
        .map(|name| PhotoRef::in_folder(&folder, name))
        .collect()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Canonical form of a folder path: leading `/`, no trailing `/`, no empty
/// segments. The root normalizes to `""`.
///
/// ```text
/// "Fauna//Birds/" → "/Fauna/Birds"
/// "/"             → ""
/// ```
pub fn normalize_folder_path(path: &str) -> String {
    segments(path).fold(String::new(), |mut acc, segment| {
        acc.push('/');
        acc.push_str(segment);
        acc
    })
}

/// URL under which a photo is served.
///
/// `base_path` is the site prefix (`/` or `/gallery/`), `photos_dir` the
/// serving segment that mirrors the collection root.
pub fn photo_url(base_path: &str, photos_dir: &str, photo_path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    format!("{base}/{photos_dir}{photo_path}")
}

/// Display title for a folder: its last segment, or `"Photos"` for the root.
pub fn folder_title(folder_path: &str) -> &str {
    segments(folder_path).last().unwrap_or("Photos")
}

/// Top-level folder a photo belongs to. Root-level photos have none.
pub fn category(photo: &PhotoRef) -> Option<&str> {
    let mut parts = segments(&photo.path);
    let first = parts.next()?;
    parts.next().map(|_| first)
}

/// Pick one photo using caller-supplied entropy.
pub fn pick(photos: &[PhotoRef], seed: usize) -> Option<&PhotoRef> {
    if photos.is_empty() {
        None
    } else {
        photos.get(seed % photos.len())
    }
}

/// `"1 photo"`, `"3 photos"`.
pub fn photo_count_label(count: usize) -> String {
    if count == 1 {
        "1 photo".to_string()
    } else {
        format!("{count} photos")
    }
}
