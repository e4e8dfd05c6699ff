//! Single-photo viewer navigation.
//!
//! [`NavigationController`] owns one viewing session over a fixed, non-empty
//! list of photos. It is driven by discrete events from the presentation
//! surface and never does work on its own:
//!
//! | Channel | Entry point | Effect |
//! |---|---|---|
//! | Keyboard | [`NavigationController::handle_key`] | ← previous, → next, `f` toggle fullscreen, `Esc` exit fullscreen or close |
//! | Click | [`NavigationController::click`] | left 30% previous, right 30% next, middle ignored |
//! | Drag | [`NavigationController::gesture_start`] / `gesture_move` / `gesture_end` | damped offset while dragging, step on release past 50 units |
//! | Host | [`NavigationController::fullscreen_changed`] | mirrors the surface's real fullscreen state |
//!
//! Stepping is circular: `next` on the last photo selects the first and
//! `previous` on the first selects the last.
//!
//! ## Fullscreen
//!
//! The controller never assumes a fullscreen request was granted. Toggling
//! returns a [`FullscreenRequest`] for the host to act on; `is_fullscreen`
//! only changes when the host reports back through
//! [`NavigationController::fullscreen_changed`].
//!
//! Drag state and fullscreen state are independent of each other.

use crate::index::PhotoRef;
use thiserror::Error;

/// Release distance (in pointer units) beyond which a drag navigates.
pub const SWIPE_THRESHOLD: f64 = 50.0;
/// Fraction of the pointer displacement shown while dragging.
pub const DRAG_DAMPING: f64 = 0.5;
/// Width fraction of each click zone at the photo's left and right edges.
pub const CLICK_ZONE: f64 = 0.3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Cannot open a viewer over an empty photo list")]
    EmptyCollection,
    #[error("Start index {index} is out of range for {len} photos")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Keys the viewer reacts to. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Parse a key name as reported by a host surface (`"ArrowLeft"`,
    /// `"left"`, `"Escape"`, `"esc"`, `"f"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "left" => Key::ArrowLeft,
            "ArrowRight" | "right" => Key::ArrowRight,
            "Escape" | "Esc" | "esc" => Key::Escape,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// What the host surface should do about fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

/// Result of handling a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A step was taken; carries the new current index.
    Navigated(usize),
    /// The host should enter or leave fullscreen.
    Fullscreen(FullscreenRequest),
    /// The caller should end the viewing session.
    Close,
    Ignored,
}

/// Snapshot of the session state, for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    pub current_index: usize,
    pub len: usize,
    pub drag_offset: f64,
    pub is_dragging: bool,
    pub is_fullscreen: bool,
}

/// Navigation state machine for one viewing session.
#[derive(Debug, Clone)]
pub struct NavigationController {
    photos: Vec<PhotoRef>,
    current_index: usize,
    drag_start: Option<f64>,
    drag_offset: f64,
    is_dragging: bool,
    is_fullscreen: bool,
    pending_fullscreen: Option<FullscreenRequest>,
}

impl NavigationController {
    /// Open a session at `start`.
    ///
    /// # Errors
    ///
    /// Fails for an empty list or a start index outside it.
    pub fn new(photos: Vec<PhotoRef>, start: usize) -> Result<Self, NavigationError> {
        if photos.is_empty() {
            return Err(NavigationError::EmptyCollection);
        }
        if start >= photos.len() {
            return Err(NavigationError::IndexOutOfRange {
                index: start,
                len: photos.len(),
            });
        }
        Ok(Self {
            photos,
            current_index: start,
            drag_start: None,
            drag_offset: 0.0,
            is_dragging: false,
            is_fullscreen: false,
            pending_fullscreen: None,
        })
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Always false: sessions cannot be opened over an empty list.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &PhotoRef {
        &self.photos[self.current_index]
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Fullscreen request issued but not yet confirmed by the host.
    pub fn pending_fullscreen(&self) -> Option<FullscreenRequest> {
        self.pending_fullscreen
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_index: self.current_index,
            len: self.photos.len(),
            drag_offset: self.drag_offset,
            is_dragging: self.is_dragging,
            is_fullscreen: self.is_fullscreen,
        }
    }

    /// `"3 / 12"`, one-based.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.photos.len())
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Select the following photo, wrapping to the first. Returns the new index.
    pub fn next(&mut self) -> usize {
        self.current_index = (self.current_index + 1) % self.photos.len();
        self.current_index
    }

    /// Select the preceding photo, wrapping to the last. Returns the new index.
    pub fn previous(&mut self) -> usize {
        let len = self.photos.len();
        self.current_index = (self.current_index + len - 1) % len;
        self.current_index
    }

    pub fn step(&mut self, step: Step) -> usize {
        match step {
            Step::Next => self.next(),
            Step::Previous => self.previous(),
        }
    }

    /// Select `index` directly. Out-of-range indices are ignored; returns
    /// whether the selection was applied.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.photos.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Drag gesture
    // =========================================================================

    pub fn gesture_start(&mut self, x: f64) {
        self.drag_start = Some(x);
        self.is_dragging = true;
        self.drag_offset = 0.0;
    }

    /// Update the damped drag offset. Ignored when no drag is in progress.
    pub fn gesture_move(&mut self, x: f64) {
        if !self.is_dragging {
            return;
        }
        if let Some(start) = self.drag_start {
            self.drag_offset = (x - start) * DRAG_DAMPING;
        }
    }

    /// Finish the drag at `x`. Steps forward when the pointer travelled more
    /// than [`SWIPE_THRESHOLD`] to the left, backward when it travelled that
    /// far to the right. Drag state is always reset.
    pub fn gesture_end(&mut self, x: f64) -> Option<Step> {
        let start = self.drag_start.take();
        self.is_dragging = false;
        self.drag_offset = 0.0;

        let distance = start? - x;
        let step = if distance > SWIPE_THRESHOLD {
            Step::Next
        } else if distance < -SWIPE_THRESHOLD {
            Step::Previous
        } else {
            return None;
        };
        self.step(step);
        Some(step)
    }

    // =========================================================================
    // Click zones
    // =========================================================================

    /// Handle a press at `x` pixels from the photo's left edge, on a photo
    /// displayed `width` pixels wide.
    pub fn click(&mut self, x: f64, width: f64) -> Option<Step> {
        if width <= 0.0 {
            return None;
        }
        let fraction = x / width;
        let step = if fraction < CLICK_ZONE {
            Step::Previous
        } else if fraction > 1.0 - CLICK_ZONE {
            Step::Next
        } else {
            return None;
        };
        self.step(step);
        Some(step)
    }

    // =========================================================================
    // Keyboard and fullscreen
    // =========================================================================

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::ArrowLeft => KeyOutcome::Navigated(self.previous()),
            Key::ArrowRight => KeyOutcome::Navigated(self.next()),
            Key::Char('f' | 'F') => KeyOutcome::Fullscreen(self.toggle_fullscreen()),
            Key::Escape => match self.exit_fullscreen() {
                Some(request) => KeyOutcome::Fullscreen(request),
                None => KeyOutcome::Close,
            },
            Key::Char(_) | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Ask for the opposite of the current fullscreen state.
    pub fn toggle_fullscreen(&mut self) -> FullscreenRequest {
        let request = if self.is_fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        };
        self.pending_fullscreen = Some(request);
        request
    }

    /// Ask to leave fullscreen; `None` when not fullscreen.
    pub fn exit_fullscreen(&mut self) -> Option<FullscreenRequest> {
        if !self.is_fullscreen {
            return None;
        }
        self.pending_fullscreen = Some(FullscreenRequest::Exit);
        self.pending_fullscreen
    }

    /// Host notification of the surface's actual fullscreen state.
    pub fn fullscreen_changed(&mut self, is_fullscreen: bool) {
        self.is_fullscreen = is_fullscreen;
        self.pending_fullscreen = None;
    }
}
