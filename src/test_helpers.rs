//! Shared test utilities for the photo-gallery test suite.
//!
//! Provides a throwaway on-disk collection, an in-memory index tree with a
//! known shape, tiny encoded images, and a recording [`PhotoSource`] mock.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_collection();
//! let index = scan(tmp.path());
//! assert_eq!(paths(&resolve_folder(&index, "/Fauna")), vec!["/Fauna/cat.webp", "/Fauna/fox.jpg"]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

use crate::index::PhotoRef;
use crate::metadata::{MetadataError, PhotoSource};
use crate::scan::IndexNode;

// =========================================================================
// Fixtures
// =========================================================================

/// Build a small collection in a temp directory.
///
/// ```text
/// a.png  B.JPG  notes.txt
/// Fauna/  cat.webp  fox.jpg
///   Birds/  heron.png  robin.gif  notes.txt
/// Flora/  fern.svg
/// Empty/
/// ```
///
/// `a.png` and `Fauna/Birds/heron.png` are real PNGs; every other image is
/// placeholder bytes (the scan only looks at extensions).
pub fn setup_collection() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::create_dir_all(root.join("Fauna/Birds")).unwrap();
    fs::create_dir_all(root.join("Flora")).unwrap();
    fs::create_dir_all(root.join("Empty")).unwrap();

    fs::write(root.join("a.png"), solid_png(8, 8, [200, 100, 50, 255])).unwrap();
    fs::write(root.join("B.JPG"), "fake image").unwrap();
    fs::write(root.join("notes.txt"), "not a photo").unwrap();
    fs::write(root.join("Fauna/fox.jpg"), "fake image").unwrap();
    fs::write(root.join("Fauna/cat.webp"), "fake image").unwrap();
    fs::write(
        root.join("Fauna/Birds/heron.png"),
        solid_png(4, 6, [10, 20, 30, 255]),
    )
    .unwrap();
    fs::write(root.join("Fauna/Birds/robin.gif"), "fake image").unwrap();
    fs::write(root.join("Fauna/Birds/notes.txt"), "not a photo").unwrap();
    fs::write(root.join("Flora/fern.svg"), "<svg/>").unwrap();

    tmp
}

/// In-memory tree:
///
/// ```text
/// cover.jpg
/// Fauna/  fox.jpg  lynx.webp
///   Birds/  heron.png  robin.gif
/// Flora/  fern.svg
/// ```
pub fn sample_index() -> IndexNode {
    let birds = node(&["heron.png", "robin.gif"], vec![]);
    let fauna = node(&["fox.jpg", "lynx.webp"], vec![("Birds", birds)]);
    let flora = node(&["fern.svg"], vec![]);
    node(&["cover.jpg"], vec![("Fauna", fauna), ("Flora", flora)])
}

pub fn node(photos: &[&str], folders: Vec<(&str, IndexNode)>) -> IndexNode {
    IndexNode {
        photos: photos.iter().map(|p| p.to_string()).collect(),
        folders: folders
            .into_iter()
            .map(|(name, child)| (name.to_string(), child))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// `n` root-level photos named `photo-0.jpg`, `photo-1.jpg`, ...
pub fn photo_refs(n: usize) -> Vec<PhotoRef> {
    let index = IndexNode {
        photos: (0..n).map(|i| format!("photo-{i}.jpg")).collect(),
        folders: BTreeMap::new(),
    };
    crate::index::flatten(&index)
}

/// Encode a single-colour RGBA image as PNG.
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn paths(photos: &[PhotoRef]) -> Vec<&str> {
    photos.iter().map(|p| p.path.as_str()).collect()
}

pub fn names(photos: &[PhotoRef]) -> Vec<&str> {
    photos.iter().map(|p| p.name.as_str()).collect()
}

// =========================================================================
// Mock photo source
// =========================================================================

/// In-memory [`PhotoSource`] that records every call.
///
/// Paths without registered bytes fail to fetch with `NotFound`; paths
/// without a registered size report an unknown length. A per-path delay
/// lets tests force runs to finish out of order.
#[derive(Default)]
pub struct MockSource {
    pub bytes: HashMap<String, Vec<u8>>,
    pub sizes: HashMap<String, u64>,
    pub delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.sizes.insert(path.to_string(), bytes.len() as u64);
        self.bytes.insert(path.to_string(), bytes);
        self
    }

    pub fn with_size(mut self, path: &str, size: u64) -> Self {
        self.sizes.insert(path.to_string(), size);
        self
    }

    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PhotoSource for MockSource {
    fn content_length(&self, path: &str) -> Result<Option<u64>, MetadataError> {
        self.calls.lock().unwrap().push(format!("head {path}"));
        if let Some(delay) = self.delays.get(path) {
            std::thread::sleep(*delay);
        }
        Ok(self.sizes.get(path).copied())
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, MetadataError> {
        self.calls.lock().unwrap().push(format!("get {path}"));
        self.bytes
            .get(path)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(path.to_string()))
    }
}
