// SPDX-License-Identifier: MPL-2.0
//! Lightbox navigation state machine.
//!
//! The navigator is either `Closed` or `Open` on a logical index. While
//! open, `next`/`previous` step through the full collection with modular
//! wraparound: one step past the last item lands on the first, one step
//! before the first lands on the last. The logical index is the sole
//! identifier used here; display positions of filtered views never enter
//! the navigator.

use crate::error::NavigationError;

/// A navigation intent emitted by viewer chrome (buttons, key presses,
/// swipe gestures).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    /// Advance to the next item (wrapping).
    Next,
    /// Step back to the previous item (wrapping).
    Previous,
    /// Dismiss the lightbox.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavState {
    Closed,
    Open { index: usize },
}

/// Maintains the "current item" state for the lightbox viewer.
///
/// Constructed against a fixed item count (the gallery is immutable once
/// built); a rebuilt gallery gets a fresh navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxNavigator {
    item_count: usize,
    state: NavState,
}

impl LightboxNavigator {
    /// Creates a closed navigator over a collection of `item_count` items.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            state: NavState::Closed,
        }
    }

    /// Opens the lightbox on the given logical index.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyGallery`] when there are no items
    /// (wraparound over zero items is undefined, so an empty gallery can
    /// never be opened), or [`NavigationError::OutOfRange`] when the index
    /// does not exist. Both are defensive guards; callers passing indices
    /// sourced from existing items never hit them.
    pub fn open(&mut self, logical_index: usize) -> Result<(), NavigationError> {
        if self.item_count == 0 {
            return Err(NavigationError::EmptyGallery);
        }
        if logical_index >= self.item_count {
            return Err(NavigationError::OutOfRange {
                index: logical_index,
                count: self.item_count,
            });
        }
        self.state = NavState::Open {
            index: logical_index,
        };
        Ok(())
    }

    /// Advances to the next item, wrapping from last to first.
    ///
    /// Returns the new current index, or `None` when the lightbox is
    /// closed.
    pub fn next(&mut self) -> Option<usize> {
        match self.state {
            NavState::Open { index } => {
                let next = (index + 1) % self.item_count;
                self.state = NavState::Open { index: next };
                Some(next)
            }
            NavState::Closed => None,
        }
    }

    /// Steps back to the previous item, wrapping from first to last.
    ///
    /// Returns the new current index, or `None` when the lightbox is
    /// closed.
    pub fn previous(&mut self) -> Option<usize> {
        match self.state {
            NavState::Open { index } => {
                let previous = (index + self.item_count - 1) % self.item_count;
                self.state = NavState::Open { index: previous };
                Some(previous)
            }
            NavState::Closed => None,
        }
    }

    /// Closes the lightbox, discarding the current index.
    pub fn close(&mut self) {
        self.state = NavState::Closed;
    }

    /// Returns the current logical index while open.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        match self.state {
            NavState::Open { index } => Some(index),
            NavState::Closed => None,
        }
    }

    /// Checks if the lightbox is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, NavState::Open { .. })
    }

    /// Returns the number of items the navigator wraps over.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }
}
