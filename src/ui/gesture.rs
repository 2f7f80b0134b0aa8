// SPDX-License-Identifier: MPL-2.0
//! Swipe gesture state
//!
//! Maps a horizontal touch drag onto a navigation intent: a leftward swipe
//! beyond the threshold means "next", a rightward one means "previous",
//! and sub-threshold motion is a no-op.

use crate::media::NavIntent;

/// Minimum horizontal travel, in screen coordinates, for a drag to count as
/// a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Tracks one touch interaction from start to end.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    /// X coordinate where the touch started, while a touch is in progress
    start_x: Option<f32>,
}

impl SwipeTracker {
    /// Creates a tracker with a specific threshold.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    /// Records the X coordinate where the touch started.
    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Completes the touch and returns the resulting intent, if the travel
    /// exceeded the threshold.
    ///
    /// Returns `None` for sub-threshold motion or when no touch was in
    /// progress. The tracker is ready for the next touch afterwards either
    /// way.
    pub fn touch_end(&mut self, x: f32) -> Option<NavIntent> {
        let start = self.start_x.take()?;
        let travel = start - x;

        if travel.abs() <= self.threshold {
            return None;
        }
        if travel > 0.0 {
            // Swiped left - show next
            Some(NavIntent::Next)
        } else {
            // Swiped right - show previous
            Some(NavIntent::Previous)
        }
    }

    /// Checks if a touch is currently in progress.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}
