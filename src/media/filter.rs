// SPDX-License-Identifier: MPL-2.0
//! Category filtering for the gallery grid.
//!
//! A [`FilteredView`] is a read-only projection of the gallery for the
//! active category. It borrows the items, preserves their relative order,
//! and keeps every item's original logical index, so a click in a filtered
//! grid still identifies the item within the full collection.

use crate::media::{Gallery, MediaItem, MediaKind};

/// The active display filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Show all media (photos and videos).
    #[default]
    All,
    /// Show only photos.
    Photos,
    /// Show only videos.
    Videos,
}

impl Category {
    /// Returns `true` if this category matches the given media kind.
    #[must_use]
    pub fn matches(self, kind: MediaKind) -> bool {
        match self {
            Self::All => true,
            Self::Photos => matches!(kind, MediaKind::Photo),
            Self::Videos => matches!(kind, MediaKind::Video),
        }
    }

    /// Returns `true` if this category is active (not `All`).
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::All)
    }
}

/// An ordered, borrowed subsequence of a gallery matching one category.
///
/// Invariant: iteration order is a strict suborder of the gallery's order;
/// the view never reorders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    items: Vec<&'a MediaItem>,
    category: Category,
}

impl<'a> FilteredView<'a> {
    /// Projects the gallery through the category's predicate.
    ///
    /// Pure and idempotent: applying the same category to the same gallery
    /// always yields the same view, and `All` yields the identity order.
    #[must_use]
    pub fn apply(gallery: &'a Gallery, category: Category) -> Self {
        let items = gallery
            .iter()
            .filter(|item| category.matches(item.kind))
            .collect();
        Self { items, category }
    }

    /// Returns the category this view was projected with.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the item at the given display position.
    #[must_use]
    pub fn get(&self, display_position: usize) -> Option<&'a MediaItem> {
        self.items.get(display_position).copied()
    }

    /// Returns the display position of the item with the given logical
    /// index, if it is part of this view.
    #[must_use]
    pub fn display_position(&self, logical_index: usize) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.logical_index == logical_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MediaItem> + '_ {
        self.items.iter().copied()
    }

    /// Returns the displayed items in order.
    #[must_use]
    pub fn items(&self) -> &[&'a MediaItem] {
        &self.items
    }

    /// Returns the number of displayed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the view displays no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
