// SPDX-License-Identifier: MPL-2.0
//! Unified media handling for the gallery: item and collection types,
//! extension classification, probing, resolution, and navigation.

pub mod builder;
pub mod filter;
pub mod navigator;
pub mod probe;
pub mod resolver;

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

// Re-export commonly used types
pub use builder::GalleryBuilder;
pub use filter::{Category, FilteredView};
pub use navigator::{LightboxNavigator, NavIntent};
pub use probe::{DecodeProber, ExistenceProber, HttpProber};
pub use resolver::{AssetResolver, SlotPattern};

/// Represents the two kinds of gallery media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

/// One resolved asset, as produced by the resolver before the gallery is
/// assembled: it has a location and a label but no logical index yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub kind: MediaKind,
    /// Resolved content address (path or URL). Never empty.
    pub location: String,
    /// Human-readable description derived from the slot number.
    pub label: String,
}

/// One item of the built gallery.
///
/// `logical_index` is assigned once, after the final (shuffled) ordering,
/// and is the sole identifier used for navigation. It is independent of any
/// filtered view's display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub location: String,
    pub label: String,
    pub logical_index: usize,
}

/// The built gallery: an ordered collection of [`MediaItem`]s, assembled
/// once per build and immutable thereafter.
///
/// Invariant: `logical_index` values are exactly `0..len()`, with no gaps or
/// duplicates, in iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    items: Vec<MediaItem>,
}

impl Gallery {
    /// Creates an empty gallery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a gallery from resolved assets: shuffles them in place with
    /// the supplied random source, then assigns each item its final position
    /// as the logical index.
    ///
    /// The shuffle (`SliceRandom::shuffle`, an unbiased Fisher–Yates) is the
    /// only source of interleaving; callers hand in the assets with all
    /// photos in slot order followed by all videos in slot order. Passing a
    /// seeded [`rand::rngs::StdRng`] makes the ordering reproducible.
    #[must_use]
    pub fn from_resolved<R: Rng + ?Sized>(mut resolved: Vec<ResolvedAsset>, rng: &mut R) -> Self {
        resolved.shuffle(rng);
        let items = resolved
            .into_iter()
            .enumerate()
            .map(|(logical_index, asset)| MediaItem {
                kind: asset.kind,
                location: asset.location,
                label: asset.label,
                logical_index,
            })
            .collect();
        Self { items }
    }

    /// Returns the item with the given logical index.
    #[must_use]
    pub fn get(&self, logical_index: usize) -> Option<&MediaItem> {
        self.items.get(logical_index)
    }

    /// Returns all items in logical-index order.
    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaItem> {
        self.items.iter()
    }

    /// Returns the total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the gallery holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Gallery {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A decoded image retained from a successful probe.
///
/// Pixels are stored in an `Arc` so the display layer can share them without
/// re-reading the file the probe already fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Creates a new `DecodedImage` from dimensions and RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if the pixel data length doesn't match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Self {
        let expected_len = (width as usize) * (height as usize) * 4;
        assert_eq!(
            rgba_bytes.len(),
            expected_len,
            "RGBA data length mismatch: expected {expected_len}, got {}",
            rgba_bytes.len()
        );
        Self {
            width,
            height,
            rgba_bytes: Arc::new(rgba_bytes),
        }
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns the shared reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }

    /// Returns the size of the pixel buffer in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.rgba_bytes.len()
    }
}

/// Container metadata retained from a successful video probe.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Frames per second.
    pub fps: f64,
    /// Whether the video has an audio track.
    pub has_audio: bool,
}

/// Supported media extensions
pub mod extensions {
    /// Photo file extensions (lowercase; classification is case-insensitive)
    pub const PHOTO_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "heic", "png", "webp", "gif", "bmp", "tiff", "tif", "ico", "svg",
    ];

    /// Video file extensions
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "avi", "mkv"];
}

/// Classifies a location by its file extension.
///
/// Returns `None` when the extension is missing or matches neither table;
/// the prober treats an unclassifiable location as definitively absent.
#[must_use]
pub fn classify_kind(location: &str) -> Option<MediaKind> {
    let extension = Path::new(location)
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)?;

    if extensions::PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Photo)
    } else if extensions::VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}
