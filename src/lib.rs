//! # Photo Gallery
//!
//! Browse a folder tree of photos: the filesystem is the data source,
//! directories become folders, image files become photos.
//!
//! # Architecture
//!
//! ```text
//! 1. Scan       photos/    →  IndexNode / photos.json   (filesystem → tree)
//! 2. Index      IndexNode  →  Vec<PhotoRef>             (flatten / folder listing)
//! 3. Navigate   Vec<PhotoRef> + events → current photo  (viewer session)
//! 4. Metadata   current photo → PhotoMetadata           (background, per selection)
//! ```
//!
//! The index document written by the scan is plain JSON you can inspect or
//! serve. Everything after it is pure data transformation, except the
//! metadata pipeline, which reads photo bytes through a [`metadata::PhotoSource`]
//! so it can be tested without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the collection directory into an [`scan::IndexNode`] tree; reads and writes the index document |
//! | [`index`] | Flattens the tree into [`index::PhotoRef`]s, lists single folders, builds photo URLs |
//! | [`navigation`] | Viewer state machine: circular stepping, keys, clicks, drags, fullscreen |
//! | [`metadata`] | Per-photo size, dimensions, dominant colour and capture tags, with stale-result suppression |
//! | [`imaging`] | Pure-Rust decode, colour sampling and EXIF projection used by [`metadata`] |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Deterministic Folder Order
//!
//! Folder children are kept in a `BTreeMap`, so a tree built by scanning and
//! the same tree read back from JSON flatten to the same sequence on every
//! platform. Photos within a folder are sorted by name at scan time and kept
//! in document order afterwards.
//!
//! ## Generations, Not Cancellation
//!
//! Metadata runs are never cancelled. Each selection bumps a generation
//! counter and results from older generations are dropped on arrival, which
//! keeps the worker code free of cancellation points.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding uses the `image` crate and EXIF parsing uses `kamadak-exif`, both
//! pure Rust. The binary has no system library dependencies.

pub mod config;
pub mod imaging;
pub mod index;
pub mod metadata;
pub mod navigation;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
