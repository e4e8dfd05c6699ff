//! Capture metadata from embedded EXIF tags.
//!
//! Reading is split in two so the display rules can be tested without
//! crafting EXIF containers:
//!
//! 1. [`CaptureTags::read`] — raw tag values pulled out of the container
//!    (make, model, lens, focal length, f-number, exposure time, ISO, capture
//!    timestamp). Every tag is optional and read independently.
//! 2. [`CaptureInfo::from_tags`] — display strings:
//!
//! | Field | Source | Example |
//! |---|---|---|
//! | camera | Make + Model, else Model | `Canon Canon EOS R5` |
//! | lens | LensModel | `RF24-70mm F2.8 L IS USM` |
//! | focal_length | FocalLength | `50mm` |
//! | aperture | FNumber | `f/2.8` |
//! | shutter | ExposureTime | `1/250s`, `2s` |
//! | iso | PhotographicSensitivity (first value) | `ISO 400` |
//! | date | DateTimeOriginal | `Jan 15, 2024, 10:30 AM` |

use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use serde::Serialize;
use std::io::Cursor;

/// EXIF writes timestamps as `YYYY:MM:DD HH:MM:SS`.
const EXIF_DATETIME: &str = "%Y:%m:%d %H:%M:%S";
const DISPLAY_DATETIME: &str = "%b %-d, %Y, %I:%M %p";

/// Raw capture tags as stored in the photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureTags {
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens_model: Option<String>,
    pub focal_length: Option<f64>,
    pub f_number: Option<f64>,
    pub exposure_time: Option<f64>,
    pub iso: Option<u32>,
    pub date_time_original: Option<String>,
}

impl CaptureTags {
    /// Parse the EXIF block of an encoded photo.
    ///
    /// Returns `None` when the container has no EXIF data or cannot be parsed.
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(bytes))
            .ok()?;
        Some(Self::from_exif(&exif))
    }

    fn from_exif(exif: &Exif) -> Self {
        let field = |tag: Tag| exif.get_field(tag, In::PRIMARY).map(|f| &f.value);

        Self {
            make: field(Tag::Make).and_then(ascii_value),
            model: field(Tag::Model).and_then(ascii_value),
            lens_model: field(Tag::LensModel).and_then(ascii_value),
            focal_length: field(Tag::FocalLength).and_then(rational_value),
            f_number: field(Tag::FNumber).and_then(rational_value),
            exposure_time: field(Tag::ExposureTime).and_then(rational_value),
            iso: field(Tag::PhotographicSensitivity).and_then(first_integer),
            date_time_original: field(Tag::DateTimeOriginal).and_then(ascii_value),
        }
    }
}

fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|s| {
                String::from_utf8_lossy(s)
                    .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn rational_value(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(v) => v
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| f64::from(r.num) / f64::from(r.denom)),
        _ => None,
    }
}

fn first_integer(value: &Value) -> Option<u32> {
    match value {
        Value::Short(v) => v.first().map(|n| u32::from(*n)),
        Value::Long(v) => v.first().copied(),
        _ => None,
    }
}

/// Display-ready capture metadata. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CaptureInfo {
    pub fn from_tags(tags: &CaptureTags) -> Self {
        let camera = match (&tags.make, &tags.model) {
            (Some(make), Some(model)) => Some(format!("{make} {model}")),
            (None, Some(model)) => Some(model.clone()),
            _ => None,
        };

        Self {
            camera,
            lens: tags.lens_model.clone(),
            focal_length: tags.focal_length.map(|f| format!("{f}mm")),
            aperture: tags.f_number.map(|f| format!("f/{f}")),
            shutter: tags.exposure_time.and_then(format_exposure),
            iso: tags.iso.map(|iso| format!("ISO {iso}")),
            date: tags.date_time_original.as_deref().map(format_capture_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Sub-second exposures as a reciprocal fraction, longer ones in seconds.
fn format_exposure(seconds: f64) -> Option<String> {
    if seconds <= 0.0 {
        None
    } else if seconds < 1.0 {
        Some(format!("1/{}s", (1.0 / seconds).round()))
    } else {
        Some(format!("{seconds}s"))
    }
}

/// `2024:01:15 10:30:45` → `Jan 15, 2024, 10:30 AM`. Unparseable values are
/// shown as stored.
fn format_capture_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, EXIF_DATETIME)
        .map(|dt| dt.format(DISPLAY_DATETIME).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Parse and project capture metadata in one go.
///
/// `None` when the photo carries no EXIF block, the block is unreadable, or
/// none of the projected tags are present.
pub fn read_capture_info(bytes: &[u8]) -> Option<CaptureInfo> {
    let info = CaptureInfo::from_tags(&CaptureTags::read(bytes)?);
    (!info.is_empty()).then_some(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid_png;

    fn full_tags() -> CaptureTags {
        CaptureTags {
            make: Some("Canon".into()),
            model: Some("Canon EOS R5".into()),
            lens_model: Some("RF24-70mm F2.8 L IS USM".into()),
            focal_length: Some(50.0),
            f_number: Some(2.8),
            exposure_time: Some(0.004),
            iso: Some(400),
            date_time_original: Some("2024:01:15 10:30:45".into()),
        }
    }

    #[test]
    fn full_projection() {
        let info = CaptureInfo::from_tags(&full_tags());
        assert_eq!(info.camera.as_deref(), Some("Canon Canon EOS R5"));
        assert_eq!(info.lens.as_deref(), Some("RF24-70mm F2.8 L IS USM"));
        assert_eq!(info.focal_length.as_deref(), Some("50mm"));
        assert_eq!(info.aperture.as_deref(), Some("f/2.8"));
        assert_eq!(info.shutter.as_deref(), Some("1/250s"));
        assert_eq!(info.iso.as_deref(), Some("ISO 400"));
        assert_eq!(info.date.as_deref(), Some("Jan 15, 2024, 10:30 AM"));
    }

    #[test]
    fn camera_falls_back_to_model() {
        let tags = CaptureTags {
            model: Some("X100V".into()),
            ..Default::default()
        };
        assert_eq!(CaptureInfo::from_tags(&tags).camera.as_deref(), Some("X100V"));
    }

    #[test]
    fn make_alone_is_not_a_camera() {
        let tags = CaptureTags {
            make: Some("FUJIFILM".into()),
            ..Default::default()
        };
        assert!(CaptureInfo::from_tags(&tags).is_empty());
    }

    #[test]
    fn missing_tags_leave_other_fields_intact() {
        let tags = CaptureTags {
            f_number: Some(8.0),
            iso: Some(100),
            ..Default::default()
        };
        let info = CaptureInfo::from_tags(&tags);
        assert_eq!(info.aperture.as_deref(), Some("f/8"));
        assert_eq!(info.iso.as_deref(), Some("ISO 100"));
        assert_eq!(info.camera, None);
        assert_eq!(info.shutter, None);
    }

    #[test]
    fn long_exposures_in_seconds() {
        assert_eq!(format_exposure(2.0).as_deref(), Some("2s"));
        assert_eq!(format_exposure(1.5).as_deref(), Some("1.5s"));
        assert_eq!(format_exposure(1.0).as_deref(), Some("1s"));
    }

    #[test]
    fn short_exposures_as_fraction() {
        assert_eq!(format_exposure(0.5).as_deref(), Some("1/2s"));
        assert_eq!(format_exposure(1.0 / 60.0).as_deref(), Some("1/60s"));
        assert_eq!(format_exposure(0.0), None);
    }

    #[test]
    fn afternoon_date_uses_pm() {
        assert_eq!(format_capture_date("2023:07:04 21:05:00"), "Jul 4, 2023, 09:05 PM");
    }

    #[test]
    fn unparseable_date_is_kept_verbatim() {
        assert_eq!(format_capture_date("sometime in 2020"), "sometime in 2020");
    }

    #[test]
    fn photo_without_exif_has_no_capture_info() {
        assert_eq!(read_capture_info(&solid_png(4, 4, [0, 0, 0, 255])), None);
    }

    #[test]
    fn garbage_has_no_capture_info() {
        assert_eq!(read_capture_info(b"\xff\xd8\xff\xe1 truncated"), None);
        assert_eq!(read_capture_info(&[]), None);
    }

    #[test]
    fn value_helpers_pick_first_element() {
        assert_eq!(first_integer(&Value::Short(vec![200, 400])), Some(200));
        assert_eq!(first_integer(&Value::Long(vec![6400])), Some(6400));
        assert_eq!(first_integer(&Value::Short(vec![])), None);
        assert_eq!(
            ascii_value(&Value::Ascii(vec![b"NIKON\0".to_vec()])),
            Some("NIKON".to_string())
        );
        assert_eq!(ascii_value(&Value::Ascii(vec![b"  ".to_vec()])), None);
    }

    #[test]
    fn zero_denominator_is_ignored() {
        let value = Value::Rational(vec![exif::Rational { num: 1, denom: 0 }]);
        assert_eq!(rational_value(&value), None);
    }
}
