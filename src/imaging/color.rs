//! Decoding and dominant colour sampling.

use image::imageops::FilterType;
use image::{DynamicImage, ImageError};
use serde::Serialize;

/// Edge length of the square canvas the photo is squashed onto before sampling.
pub const SAMPLE_EDGE: u32 = 150;
/// Only every `SAMPLE_STRIDE`-th pixel of the canvas is read.
pub const SAMPLE_STRIDE: usize = 4;
/// Samples with alpha at or below this value are skipped.
pub const MIN_ALPHA: u8 = 128;
/// Accent colour used until a photo yields a dominant colour.
pub const DEFAULT_ACCENT: &str = "#ffffff";

/// Natural pixel size of a decoded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<&DynamicImage> for Dimensions {
    fn from(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Fully decode an encoded photo (format is sniffed from the bytes).
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}

/// Average colour of the photo's sufficiently opaque pixels, as `#rrggbb`.
///
/// The photo is resized (ignoring aspect ratio) to a
/// [`SAMPLE_EDGE`]×[`SAMPLE_EDGE`] canvas, then every [`SAMPLE_STRIDE`]-th
/// pixel with alpha above [`MIN_ALPHA`] contributes to a per-channel mean.
/// Returns `None` when no sample passes the alpha filter.
pub fn dominant_color(image: &DynamicImage) -> Option<String> {
    let canvas = image::imageops::resize(
        &image.to_rgba8(),
        SAMPLE_EDGE,
        SAMPLE_EDGE,
        FilterType::Triangle,
    );

    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for pixel in canvas.pixels().step_by(SAMPLE_STRIDE) {
        let [pr, pg, pb, pa] = pixel.0;
        if pa <= MIN_ALPHA {
            continue;
        }
        r += u64::from(pr);
        g += u64::from(pg);
        b += u64::from(pb);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let mean = |sum: u64| (sum as f64 / count as f64).round() as u8;
    Some(format!("#{:02x}{:02x}{:02x}", mean(r), mean(g), mean(b)))
}
