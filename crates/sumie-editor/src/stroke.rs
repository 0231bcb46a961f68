//! Freehand gesture capture.
//!
//! [`StrokeRecorder`] is a two-state machine (`Idle` / `Drawing`) that
//! turns a pointer gesture — start, n moves, end — into one [`Stroke`].
//! Gesture guards that depend on session state (no image loaded, for
//! example) live in the session; the recorder only owns the state
//! machine itself.

use crate::types::{Point, Stroke, ToolMode};

/// Captures one continuous pointer gesture into an ordered point
/// sequence.
///
/// Only a single gesture can be active at a time; a second
/// [`begin`](Self::begin) while drawing is ignored (single-pointer
/// assumption).
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    current: Option<Stroke>,
}

impl StrokeRecorder {
    /// Create an idle recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Returns `true` while a gesture is active.
    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Start a new stroke at `at` (stage-local), seeded with the start
    /// point duplicated so a tap with no movement still renders a dot.
    ///
    /// Ignored if a gesture is already active.
    pub fn begin(&mut self, tool: ToolMode, width: f64, at: Point) {
        if self.current.is_some() {
            return;
        }
        self.current = Some(Stroke {
            tool,
            width,
            points: vec![at, at],
        });
    }

    /// Append one stage-local point to the active stroke.
    ///
    /// Returns `true` if a point was recorded, `false` while idle —
    /// pointer moves without a preceding gesture-start are no-ops.
    pub fn extend(&mut self, at: Point) -> bool {
        match self.current.as_mut() {
            Some(stroke) => {
                stroke.points.push(at);
                true
            }
            None => false,
        }
    }

    /// Borrow the in-progress stroke for live preview rendering.
    #[must_use]
    pub const fn preview(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// End the gesture and return the completed stroke, which is
    /// immutable from here on. Returns `None` while idle.
    pub fn finish(&mut self) -> Option<Stroke> {
        self.current.take()
    }
}
