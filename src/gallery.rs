// SPDX-License-Identifier: MPL-2.0
//! Gallery controller: one object owning the collection, the active
//! category, and the lightbox navigator.
//!
//! All interaction state lives here rather than at module scope, so several
//! independent galleries can coexist and tests can drive one
//! deterministically. The rendering layer reads [`view`](GalleryController::view)
//! for the grid and calls back into [`open`](GalleryController::open) with
//! the logical index of a clicked item; viewer chrome feeds
//! [`NavIntent`]s from its buttons, key handling, and swipe gestures.

use crate::config::GalleryConfig;
use crate::error::Result;
use crate::media::{
    Category, ExistenceProber, FilteredView, Gallery, GalleryBuilder, LightboxNavigator,
    MediaItem, NavIntent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Viewer-chrome collaborator: the visual lightbox shell.
///
/// The controller tells the chrome what to display; the chrome reports user
/// intents back as [`NavIntent`] values through
/// [`GalleryController::dispatch`].
pub trait ViewerChrome {
    /// Displays an item together with its 1-based position label
    /// (`"3 / 12"`).
    fn show(&mut self, item: &MediaItem, position_label: &str);

    /// Hides the lightbox.
    fn hide(&mut self);
}

/// Owns the built gallery and all interaction state.
pub struct GalleryController {
    gallery: Gallery,
    category: Category,
    navigator: LightboxNavigator,
}

impl GalleryController {
    /// Wraps an already-built gallery.
    #[must_use]
    pub fn new(gallery: Gallery) -> Self {
        let navigator = LightboxNavigator::new(gallery.len());
        Self {
            gallery,
            category: Category::default(),
            navigator,
        }
    }

    /// Builds the gallery from configuration and wraps it.
    ///
    /// Uses an entropy-seeded random source for the shuffle; tests that
    /// need a reproducible order should build through [`GalleryBuilder`]
    /// with a seeded rng and pass the result to [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Config`] if the configuration fails
    /// validation. Unresolvable slots are not errors; they are simply
    /// absent from the result.
    pub async fn build<P: ExistenceProber>(
        config: &GalleryConfig,
        prober: &P,
    ) -> Result<Self> {
        let gallery = GalleryBuilder::new(config, prober)
            .resolve_slots()
            .await
            .map(|resolved| {
                let mut rng = StdRng::from_entropy();
                Gallery::from_resolved(resolved, &mut rng)
            })?;
        Ok(Self::new(gallery))
    }

    /// Returns the full collection.
    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Returns the active category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Switches the active category. The next [`view`](Self::view) call
    /// reflects it; the open lightbox, if any, is unaffected.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Projects the gallery through the active category.
    ///
    /// Recomputed on each call (it borrows the gallery), so it is always
    /// consistent with the current category.
    #[must_use]
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::apply(&self.gallery, self.category)
    }

    /// Opens the lightbox on a logical index and returns the item.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Navigation`] for an empty gallery or
    /// an out-of-range index.
    pub fn open(&mut self, logical_index: usize) -> Result<&MediaItem> {
        self.navigator.open(logical_index)?;
        Ok(&self.gallery.items()[logical_index])
    }

    /// Advances to the next item and returns it, or `None` while closed.
    ///
    /// Navigation traverses the complete gallery regardless of the active
    /// category: stepping from an item opened out of a filtered grid still
    /// visits the filtered-out items.
    pub fn next(&mut self) -> Option<&MediaItem> {
        let index = self.navigator.next()?;
        self.gallery.get(index)
    }

    /// Steps back to the previous item and returns it, or `None` while
    /// closed.
    ///
    /// Like [`next`](Self::next), this traverses the complete gallery
    /// regardless of the active category.
    pub fn previous(&mut self) -> Option<&MediaItem> {
        let index = self.navigator.previous()?;
        self.gallery.get(index)
    }

    /// Closes the lightbox.
    pub fn close(&mut self) {
        self.navigator.close();
    }

    /// Returns the item the lightbox is showing, if open.
    #[must_use]
    pub fn current(&self) -> Option<&MediaItem> {
        self.gallery.get(self.navigator.current()?)
    }

    /// Checks if the lightbox is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.navigator.is_open()
    }

    /// Returns the 1-based counter label for the open lightbox
    /// (`"3 / 12"`).
    #[must_use]
    pub fn position_label(&self) -> Option<String> {
        let index = self.navigator.current()?;
        Some(format!("{} / {}", index + 1, self.gallery.len()))
    }

    /// Applies a navigation intent and returns the newly current item
    /// (`None` for `Close`, and for `Next`/`Previous` while closed).
    pub fn apply_intent(&mut self, intent: NavIntent) -> Option<&MediaItem> {
        match intent {
            NavIntent::Next => self.next(),
            NavIntent::Previous => self.previous(),
            NavIntent::Close => {
                self.close();
                None
            }
        }
    }

    /// Opens the lightbox on a logical index and paints the chrome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Navigation`] for an empty gallery or
    /// an out-of-range index; the chrome is left untouched in that case.
    pub fn open_in<C: ViewerChrome>(&mut self, logical_index: usize, chrome: &mut C) -> Result<()> {
        self.navigator.open(logical_index)?;
        self.refresh_chrome(chrome);
        Ok(())
    }

    /// Applies a navigation intent and updates the chrome to match.
    pub fn dispatch<C: ViewerChrome>(&mut self, intent: NavIntent, chrome: &mut C) {
        match intent {
            NavIntent::Next => {
                if self.navigator.next().is_some() {
                    self.refresh_chrome(chrome);
                }
            }
            NavIntent::Previous => {
                if self.navigator.previous().is_some() {
                    self.refresh_chrome(chrome);
                }
            }
            NavIntent::Close => {
                self.close();
                chrome.hide();
            }
        }
    }

    fn refresh_chrome<C: ViewerChrome>(&self, chrome: &mut C) {
        if let (Some(item), Some(label)) = (self.current(), self.position_label()) {
            chrome.show(item, &label);
        }
    }
}
