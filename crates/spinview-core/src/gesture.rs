//! Gesture tracking: pointer normalization and drag-to-index conversion.
//!
//! A drag session lives from pointer-down to pointer-up (and on through
//! deceleration, which replays synthetic points through the same math).
//! Horizontal movement is converted into index deltas against a rotate
//! threshold derived from the viewport width; vertically dominated
//! movement is left unconsumed so the host can scroll.

use std::time::Instant;

use tracing::trace;

use crate::path::MotionPath;

/// A pointer position in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One raw pointer event from the host.
///
/// Mirrors the shape of browser-style input where a single event may
/// carry both touch and mouse coordinates; the touch point wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub touch: Option<Point>,
    pub mouse: Option<Point>,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            touch: None,
            mouse: Some(Point::new(x, y)),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            touch: Some(Point::new(x, y)),
            mouse: None,
        }
    }

    /// Normalized point: touch capability takes precedence over mouse.
    pub fn point(&self) -> Option<Point> {
        self.touch.or(self.mouse)
    }
}

/// What one drag sample amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Vertical scroll intent; not consumed, the host must not suppress
    /// its default scrolling behavior.
    VerticalScroll,
    /// Consumed, but still under the rotate threshold.
    Tracked,
    /// Consumed; rotate to the carried raw index.
    Rotate(i64),
}

impl DragOutcome {
    /// Whether the sample was consumed by the gesture.
    #[inline]
    pub fn consumed(&self) -> bool {
        !matches!(self, DragOutcome::VerticalScroll)
    }
}

/// Transient state for one pointer interaction.
#[derive(Debug, Clone)]
pub struct DragSession {
    down: Point,
    down_index: usize,
    rotate_threshold: f64,
    vertical_scroll_ratio: f64,
    path: MotionPath,
}

impl DragSession {
    /// Start a session at the given down point.
    ///
    /// The rotate threshold is how many pixels of horizontal travel equal
    /// one index step: a full viewport sweep covers every frame once.
    pub fn begin(
        down: Point,
        down_index: usize,
        viewport_width: f64,
        frame_count: usize,
        vertical_scroll_ratio: f64,
    ) -> Self {
        let rotate_threshold = viewport_width / frame_count as f64;
        trace!(down_index, rotate_threshold, "drag session started");

        Self {
            down,
            down_index,
            rotate_threshold,
            vertical_scroll_ratio,
            path: MotionPath::new(),
        }
    }

    /// Feed one pointer sample through the session.
    pub fn track(&mut self, point: Point, now: Instant) -> DragOutcome {
        let delta_x = point.x - self.down.x;
        let delta_y = point.y - self.down.y;

        // Axis dominance: when Y movement dominates X this is a scroll,
        // not a rotation. A zero delta_x drives the ratio to infinity or
        // NaN; both count as vertical so a pure-vertical drag can never
        // divide its way into a rotation.
        let ratio = delta_y.abs() / delta_x.abs();
        if ratio.is_nan() || ratio >= self.vertical_scroll_ratio {
            return DragOutcome::VerticalScroll;
        }

        // Only consumed samples feed the velocity estimate.
        self.path.record(point.x, point.y, now);

        if delta_x.abs() >= self.rotate_threshold {
            let index_delta = (delta_x / self.rotate_threshold).round() as i64;
            // Subtraction, not addition: dragging right walks the frames
            // as if rotating the object leftward.
            DragOutcome::Rotate(self.down_index as i64 - index_delta)
        } else {
            DragOutcome::Tracked
        }
    }

    #[inline]
    pub fn down_index(&self) -> usize {
        self.down_index
    }

    #[inline]
    pub fn rotate_threshold(&self) -> f64 {
        self.rotate_threshold
    }

    #[inline]
    pub fn path(&self) -> &MotionPath {
        &self.path
    }
}
