//! Image inspection — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / dimensions** | `image::load_from_memory` |
//! | **Dominant colour** | `image::imageops::resize` onto a 150×150 canvas, strided RGB average |
//! | **Capture tags** | `kamadak-exif` container reader |
//!
//! Everything here works on in-memory bytes so the metadata pipeline can
//! fetch a photo once and hand the same buffer to every step.

pub mod capture;
mod color;

pub use capture::{CaptureInfo, CaptureTags, read_capture_info};
pub use color::{
    DEFAULT_ACCENT, Dimensions, MIN_ALPHA, SAMPLE_EDGE, SAMPLE_STRIDE, decode, dominant_color,
};
