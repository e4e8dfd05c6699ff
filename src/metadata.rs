//! Per-photo display metadata, derived in the background.
//!
//! Whenever the viewer selects a photo, a pipeline run derives:
//!
//! 1. **Byte size** — a metadata-only lookup on the photo resource, formatted
//!    by [`format_file_size`]. An unknown length is not an error.
//! 2. **Pixel dimensions** — from a full decode.
//! 3. **Dominant colour** — sampled from the decoded pixels
//!    (see [`imaging::dominant_color`]).
//! 4. **Capture tags** — camera, lens, exposure... from embedded EXIF.
//!
//! Each step fails on its own: a failed step leaves its field unset, is
//! logged, and never stops the others. Nothing here can make the viewer
//! unusable.
//!
//! ## Stale-result suppression
//!
//! Runs execute off the viewer's thread and may finish in any order. Every
//! run carries a [`Ticket`] from [`MetadataSlot::select`]; the slot bumps its
//! generation on each selection and [`MetadataSlot::publish`] drops results
//! whose ticket is no longer current. In-flight work is never cancelled, only
//! ignored.
//!
//! ```text
//! select(0) → ticket g1 ──run──────────────────────▶ publish(g1) ✗ stale
//! select(1) → ticket g2 ──run────▶ publish(g2) ✓
//! ```

use crate::imaging::{self, CaptureInfo, DEFAULT_ACCENT, Dimensions};
use crate::index::PhotoRef;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Photo not found: {0}")]
    NotFound(String),
}

/// Where photo bytes come from.
///
/// `path` is a [`PhotoRef::path`]: absolute and slash-separated from the
/// collection root.
pub trait PhotoSource: Send + Sync {
    /// Size of the resource without reading it. `Ok(None)` when the source
    /// cannot tell.
    fn content_length(&self, path: &str) -> Result<Option<u64>, MetadataError>;

    /// The full encoded photo.
    fn fetch(&self, path: &str) -> Result<Vec<u8>, MetadataError>;
}

/// Serves photos straight from the collection directory.
#[derive(Debug, Clone)]
pub struct LocalPhotoSource {
    root: PathBuf,
}

impl LocalPhotoSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a photo path onto the filesystem. Paths that try to step outside
    /// the root do not resolve.
    fn resolve(&self, path: &str) -> Result<PathBuf, MetadataError> {
        let mut resolved = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(MetadataError::NotFound(path.to_string()));
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }
}

impl PhotoSource for LocalPhotoSource {
    fn content_length(&self, path: &str) -> Result<Option<u64>, MetadataError> {
        let meta = fs::metadata(self.resolve(path)?)?;
        Ok(Some(meta.len()))
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, MetadataError> {
        Ok(fs::read(self.resolve(path)?)?)
    }
}

/// Display metadata for one photo. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoMetadata {
    pub dimensions: Option<Dimensions>,
    pub file_size: Option<String>,
    pub dominant_color: Option<String>,
    pub capture: Option<CaptureInfo>,
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-scaled byte count: 1024-based, two decimals at most.
///
/// ```
/// use photo_gallery::metadata::format_file_size;
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Run every derivation step for `photo`.
pub fn derive_metadata(source: &dyn PhotoSource, photo: &PhotoRef) -> PhotoMetadata {
    let mut metadata = PhotoMetadata {
        file_size: match source.content_length(&photo.path) {
            Ok(length) => length.map(format_file_size),
            Err(e) => {
                debug!(path = %photo.path, error = %e, "size lookup failed");
                None
            }
        },
        ..Default::default()
    };

    let bytes = match source.fetch(&photo.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %photo.path, error = %e, "fetch failed");
            return metadata;
        }
    };

    match decode_step(&bytes) {
        Ok((dimensions, color)) => {
            metadata.dimensions = Some(dimensions);
            metadata.dominant_color = color;
        }
        Err(e) => debug!(path = %photo.path, error = %e, "decode failed"),
    }

    metadata.capture = imaging::read_capture_info(&bytes);
    metadata
}

fn decode_step(bytes: &[u8]) -> Result<(Dimensions, Option<String>), MetadataError> {
    let image = imaging::decode(bytes)?;
    Ok((Dimensions::from(&image), imaging::dominant_color(&image)))
}

/// Identifies one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    index: usize,
}

impl Ticket {
    /// Index of the photo the run was started for.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Holds the metadata of the currently selected photo.
#[derive(Debug, Clone)]
pub struct MetadataSlot {
    generation: u64,
    current: Option<PhotoMetadata>,
    accent: String,
}

impl Default for MetadataSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataSlot {
    pub fn new() -> Self {
        Self {
            generation: 0,
            current: None,
            accent: DEFAULT_ACCENT.to_string(),
        }
    }

    /// A new photo became current: discard the old metadata and issue the
    /// ticket its run must present.
    pub fn select(&mut self, index: usize) -> Ticket {
        self.generation += 1;
        self.current = None;
        Ticket {
            generation: self.generation,
            index,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Store a finished run's result if its ticket is still current.
    ///
    /// The accent colour only changes when the result carries a dominant
    /// colour; otherwise the previous one stays.
    pub fn publish(&mut self, ticket: Ticket, metadata: PhotoMetadata) -> bool {
        if !self.is_current(ticket) {
            debug!(index = ticket.index, "dropping metadata for a photo no longer shown");
            return false;
        }
        if let Some(color) = &metadata.dominant_color {
            self.accent.clone_from(color);
        }
        self.current = Some(metadata);
        true
    }

    /// Metadata of the current photo, once its run has published.
    pub fn current(&self) -> Option<&PhotoMetadata> {
        self.current.as_ref()
    }

    pub fn accent_color(&self) -> &str {
        &self.accent
    }

    fn has_published(&self, ticket: Ticket) -> bool {
        self.is_current(ticket) && self.current.is_some()
    }
}

struct Completed {
    ticket: Ticket,
    metadata: PhotoMetadata,
}

/// Runs derivations on worker threads and applies results to a
/// [`MetadataSlot`] on the owning thread.
pub struct MetadataPipeline {
    source: Arc<dyn PhotoSource>,
    slot: MetadataSlot,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
}

impl MetadataPipeline {
    pub fn new(source: Arc<dyn PhotoSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            slot: MetadataSlot::new(),
            tx,
            rx,
        }
    }

    /// Start a run for the photo now at `index`. Earlier runs keep going but
    /// their results will be dropped.
    pub fn trigger(&mut self, index: usize, photo: &PhotoRef) -> Ticket {
        let ticket = self.slot.select(index);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let photo = photo.clone();

        thread::spawn(move || {
            let metadata = derive_metadata(source.as_ref(), &photo);
            // Receiver gone means the viewer closed; nothing left to update
            let _ = tx.send(Completed { ticket, metadata });
        });

        ticket
    }

    /// Apply every run that has finished so far without blocking. Returns
    /// how many results were published.
    pub fn poll(&mut self) -> usize {
        let mut published = 0;
        while let Ok(done) = self.rx.try_recv() {
            if self.slot.publish(done.ticket, done.metadata) {
                published += 1;
            }
        }
        published
    }

    /// Block until the run for `ticket` publishes, applying (and dropping)
    /// anything else that finishes meanwhile. Returns false on timeout or if
    /// the ticket has been superseded.
    pub fn wait(&mut self, ticket: Ticket, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.slot.has_published(ticket) {
            if !self.slot.is_current(ticket) {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    self.slot.publish(done.ticket, done.metadata);
                }
                Err(_) => return false,
            }
        }
        true
    }

    pub fn current(&self) -> Option<&PhotoMetadata> {
        self.slot.current()
    }

    pub fn accent_color(&self) -> &str {
        self.slot.accent_color()
    }
}
