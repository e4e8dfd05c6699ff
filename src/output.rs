//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Every entity (folder, photo) leads with its positional index and its name.
//! Secondary facts such as the serving URL, byte size or camera are shown as
//! indented `Key: value` context lines underneath, so the output reads as an
//! inventory of the collection.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Photos (2 photos)
//!     001 B.JPG
//!     002 a.png
//! 001 Fauna (2 photos)
//!     001 cat.webp
//!     002 fox.jpg
//!     001 Birds (1 photo)
//!         001 heron.png
//!
//! 5 photos in 2 folders
//! ```
//!
//! ## Info
//!
//! ```text
//! fox.jpg
//!     Path: /Fauna/fox.jpg
//!     URL: /photos/Fauna/fox.jpg
//!     Category: Fauna
//!     Dimensions: 4000 × 3000
//!     Size: 2.4 MB
//!     Color: #6a7b3c
//!     Camera: Canon EOS R5
//!     Exposure: 35mm · f/2.8 · 1/250s · ISO 200
//! ```
//!
//! ## View
//!
//! ```text
//! [2 / 5] fox.jpg (fullscreen)
//!     Path: /Fauna/fox.jpg
//!     ...
//!     Accent: #6a7b3c
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability. Output meant for stdout also gets a `print_*` wrapper; the
//! scan summary goes to stderr, so the CLI writes those lines itself. Format
//! functions are pure — no I/O, no side effects.

use crate::index::{self, PhotoRef};
use crate::metadata::PhotoMetadata;
use crate::navigation::NavigationState;
use crate::scan::IndexNode;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + name + photo count.
///
/// ```text
/// 001 Fauna (2 photos)
/// ```
fn entity_header(index: usize, name: &str, count: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        name,
        index::photo_count_label(count)
    )
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the scanned tree: root photos first, then each folder with its
/// photos and subfolders, followed by a totals line.
pub fn format_scan_output(root: &IndexNode) -> Vec<String> {
    let mut lines = vec![format!(
        "Photos ({})",
        index::photo_count_label(root.photos.len())
    )];
    push_photo_lines(&root.photos, 1, &mut lines);
    push_folder_lines(root, 0, &mut lines);

    lines.push(String::new());
    lines.push(format!(
        "{} in {} folders",
        index::photo_count_label(root.photo_count()),
        root.folder_count()
    ));
    lines
}

fn push_photo_lines(photos: &[String], depth: usize, lines: &mut Vec<String>) {
    for (i, photo) in photos.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(depth), format_index(i + 1), photo));
    }
}

fn push_folder_lines(node: &IndexNode, depth: usize, lines: &mut Vec<String>) {
    for (i, (name, child)) in node.folders.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(depth),
            entity_header(i + 1, name, child.photos.len())
        ));
        push_photo_lines(&child.photos, depth + 1, lines);
        push_folder_lines(child, depth + 1, lines);
    }
}

// ============================================================================
// List output
// ============================================================================

/// Format a photo list, one `position path` line per photo, under a header
/// naming the folder (or the whole collection for `None`).
pub fn format_photo_list(folder: Option<&str>, photos: &[PhotoRef]) -> Vec<String> {
    let title = folder.map(index::folder_title).unwrap_or("Photos");
    let mut lines = vec![format!(
        "{} ({})",
        title,
        index::photo_count_label(photos.len())
    )];
    for (i, photo) in photos.iter().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), photo.path));
    }
    lines
}

/// Print a photo list to stdout.
pub fn print_photo_list(folder: Option<&str>, photos: &[PhotoRef]) {
    for line in format_photo_list(folder, photos) {
        println!("{}", line);
    }
}

// ============================================================================
// Info output
// ============================================================================

/// Shown once metadata has arrived but the byte size could not be determined.
const UNKNOWN_SIZE: &str = "Unknown";

/// Context lines describing one photo. `metadata` is `None` while the
/// pipeline run for it is still in flight.
fn photo_context(photo: &PhotoRef, url: &str, metadata: Option<&PhotoMetadata>) -> Vec<String> {
    let mut lines = vec![
        format!("    Path: {}", photo.path),
        format!("    URL: {}", url),
    ];
    if let Some(category) = index::category(photo) {
        lines.push(format!("    Category: {}", category));
    }

    let Some(metadata) = metadata else {
        lines.push("    Metadata: loading".to_string());
        return lines;
    };

    if let Some(d) = metadata.dimensions {
        lines.push(format!("    Dimensions: {} × {}", d.width, d.height));
    }
    lines.push(format!(
        "    Size: {}",
        metadata.file_size.as_deref().unwrap_or(UNKNOWN_SIZE)
    ));
    if let Some(color) = &metadata.dominant_color {
        lines.push(format!("    Color: {}", color));
    }
    if let Some(capture) = &metadata.capture {
        if let Some(camera) = &capture.camera {
            lines.push(format!("    Camera: {}", camera));
        }
        if let Some(lens) = &capture.lens {
            lines.push(format!("    Lens: {}", lens));
        }
        let exposure: Vec<&str> = [
            &capture.focal_length,
            &capture.aperture,
            &capture.shutter,
            &capture.iso,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
        if !exposure.is_empty() {
            lines.push(format!("    Exposure: {}", exposure.join(" · ")));
        }
        if let Some(date) = &capture.date {
            lines.push(format!("    Taken: {}", date));
        }
    }
    lines
}

/// Format the full metadata report for a single photo.
pub fn format_metadata(photo: &PhotoRef, url: &str, metadata: Option<&PhotoMetadata>) -> Vec<String> {
    let mut lines = vec![photo.name.clone()];
    lines.extend(photo_context(photo, url, metadata));
    lines
}

/// Print a photo's metadata report to stdout.
pub fn print_metadata(photo: &PhotoRef, url: &str, metadata: Option<&PhotoMetadata>) {
    for line in format_metadata(photo, url, metadata) {
        println!("{}", line);
    }
}

// ============================================================================
// Viewer output
// ============================================================================

/// Everything one rendered viewer frame shows.
pub struct ViewerFrame<'a> {
    pub state: NavigationState,
    pub photo: &'a PhotoRef,
    pub url: &'a str,
    pub metadata: Option<&'a PhotoMetadata>,
    pub accent: &'a str,
}

/// Format one frame of the viewer: position, photo, freshest metadata and
/// the current accent colour.
pub fn format_viewer_frame(frame: &ViewerFrame) -> Vec<String> {
    let state = &frame.state;
    let mut header = format!(
        "[{} / {}] {}",
        state.current_index + 1,
        state.len,
        frame.photo.name
    );
    if state.is_fullscreen {
        header.push_str(" (fullscreen)");
    }
    if state.is_dragging {
        header.push_str(&format!(" (dragging {:+})", state.drag_offset));
    }

    let mut lines = vec![header];
    lines.extend(photo_context(frame.photo, frame.url, frame.metadata));
    lines.push(format!("    Accent: {}", frame.accent));
    lines
}

/// Print a viewer frame to stdout.
pub fn print_viewer_frame(frame: &ViewerFrame) {
    for line in format_viewer_frame(frame) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{CaptureInfo, Dimensions};
    use crate::test_helpers::*;

    fn fox() -> PhotoRef {
        index::flatten(&sample_index())
            .into_iter()
            .find(|p| p.name == "fox.jpg")
            .unwrap()
    }

    fn state(current_index: usize, len: usize) -> NavigationState {
        NavigationState {
            current_index,
            len,
            drag_offset: 0.0,
            is_dragging: false,
            is_fullscreen: false,
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_uses_count_label() {
        assert_eq!(entity_header(1, "Fauna", 1), "001 Fauna (1 photo)");
        assert_eq!(entity_header(12, "Flora", 0), "012 Flora (0 photos)");
    }

    // =========================================================================
    // Scan output tests
    // =========================================================================

    #[test]
    fn scan_output_lists_tree() {
        let lines = format_scan_output(&sample_index());
        assert_eq!(
            lines,
            vec![
                "Photos (1 photo)",
                "    001 cover.jpg",
                "001 Fauna (2 photos)",
                "    001 fox.jpg",
                "    002 lynx.webp",
                "    001 Birds (2 photos)",
                "        001 heron.png",
                "        002 robin.gif",
                "002 Flora (1 photo)",
                "    001 fern.svg",
                "",
                "6 photos in 3 folders",
            ]
        );
    }

    #[test]
    fn scan_output_empty_collection() {
        let lines = format_scan_output(&IndexNode::default());
        assert_eq!(lines, vec!["Photos (0 photos)", "", "0 photos in 0 folders"]);
    }

    // =========================================================================
    // List output tests
    // =========================================================================

    #[test]
    fn photo_list_for_collection() {
        let photos = index::flatten(&sample_index());
        let lines = format_photo_list(None, &photos);
        assert_eq!(lines[0], "Photos (6 photos)");
        assert_eq!(lines[1], "    001 /cover.jpg");
        assert_eq!(lines[6], "    006 /Flora/fern.svg");
    }

    #[test]
    fn photo_list_for_folder_uses_last_segment() {
        let photos = index::resolve_folder(&sample_index(), "/Fauna/Birds");
        let lines = format_photo_list(Some("/Fauna/Birds"), &photos);
        assert_eq!(
            lines,
            vec![
                "Birds (2 photos)",
                "    001 /Fauna/Birds/heron.png",
                "    002 /Fauna/Birds/robin.gif",
            ]
        );
    }

    // =========================================================================
    // Metadata output tests
    // =========================================================================

    #[test]
    fn metadata_pending_shows_loading() {
        let lines = format_metadata(&fox(), "/photos/Fauna/fox.jpg", None);
        assert_eq!(
            lines,
            vec![
                "fox.jpg",
                "    Path: /Fauna/fox.jpg",
                "    URL: /photos/Fauna/fox.jpg",
                "    Category: Fauna",
                "    Metadata: loading",
            ]
        );
    }

    #[test]
    fn metadata_shows_only_present_fields() {
        let metadata = PhotoMetadata {
            dimensions: Some(Dimensions {
                width: 30,
                height: 20,
            }),
            file_size: Some("1.5 KB".into()),
            dominant_color: None,
            capture: Some(CaptureInfo {
                camera: Some("Canon EOS R5".into()),
                aperture: Some("f/2.8".into()),
                iso: Some("ISO 200".into()),
                ..Default::default()
            }),
        };
        let lines = format_metadata(&fox(), "/photos/Fauna/fox.jpg", Some(&metadata));
        assert_eq!(
            &lines[4..],
            &[
                "    Dimensions: 30 × 20",
                "    Size: 1.5 KB",
                "    Camera: Canon EOS R5",
                "    Exposure: f/2.8 · ISO 200",
            ]
        );
    }

    #[test]
    fn unknown_size_is_reported_as_unknown() {
        let cover = index::flatten(&sample_index()).remove(0);
        let lines = format_metadata(&cover, "/photos/cover.jpg", Some(&PhotoMetadata::default()));
        // Root photo: no category line either
        assert_eq!(
            lines,
            vec![
                "cover.jpg",
                "    Path: /cover.jpg",
                "    URL: /photos/cover.jpg",
                "    Size: Unknown",
            ]
        );
    }

    // =========================================================================
    // Viewer output tests
    // =========================================================================

    #[test]
    fn viewer_frame_header_and_accent() {
        let photo = fox();
        let frame = ViewerFrame {
            state: state(1, 6),
            photo: &photo,
            url: "/photos/Fauna/fox.jpg",
            metadata: None,
            accent: "#ffffff",
        };
        let lines = format_viewer_frame(&frame);
        assert_eq!(lines[0], "[2 / 6] fox.jpg");
        assert_eq!(lines.last().unwrap(), "    Accent: #ffffff");
    }

    #[test]
    fn viewer_frame_marks_fullscreen_and_drag() {
        let photo = fox();
        let mut s = state(0, 1);
        s.is_fullscreen = true;
        s.is_dragging = true;
        s.drag_offset = -12.5;
        let frame = ViewerFrame {
            state: s,
            photo: &photo,
            url: "/photos/Fauna/fox.jpg",
            metadata: Some(&PhotoMetadata::default()),
            accent: "#123456",
        };
        assert_eq!(
            format_viewer_frame(&frame)[0],
            "[1 / 1] fox.jpg (fullscreen) (dragging -12.5)"
        );
    }
}
