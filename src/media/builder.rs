// SPDX-License-Identifier: MPL-2.0
//! Gallery assembly: slot enumeration, concurrent resolution, shuffle.
//!
//! The builder enumerates the configured photo and video slots, resolves
//! them through the prober, and assembles the result into a [`Gallery`].
//! Photo and video resolution run as two concurrent batches, but the
//! pre-shuffle order is always all photos in slot order followed by all
//! videos in slot order, so the shuffle's randomness is the only source of
//! interleaving. An unresolvable slot is silently skipped; the build only
//! completes after every slot has been attempted, and it never fails for
//! per-slot reasons.

use crate::config::GalleryConfig;
use crate::error::Result;
use crate::media::{
    AssetResolver, ExistenceProber, Gallery, MediaKind, ResolvedAsset, SlotPattern,
};
use futures_util::future;
use rand::Rng;

pub struct GalleryBuilder<'a, P> {
    config: &'a GalleryConfig,
    prober: &'a P,
}

impl<'a, P: ExistenceProber> GalleryBuilder<'a, P> {
    #[must_use]
    pub fn new(config: &'a GalleryConfig, prober: &'a P) -> Self {
        Self { config, prober }
    }

    /// Resolves every configured slot, returning the surviving assets with
    /// all photos in slot order followed by all videos in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Config`] if the configuration fails
    /// validation. Per-slot resolution failures are silent omissions and
    /// never surface here.
    pub async fn resolve_slots(&self) -> Result<Vec<ResolvedAsset>> {
        self.config.validate()?;

        let photo_pattern = SlotPattern::new(&self.config.photo_pattern)?;
        let video_pattern = SlotPattern::new(&self.config.video_pattern)?;
        let resolver = AssetResolver::new(
            self.prober,
            &self.config.asset_root,
            self.config.probe_timeout(),
        );

        let photos = self.resolve_batch(
            &resolver,
            &photo_pattern,
            self.config.photo_count,
            MediaKind::Photo,
            &self.config.photo_extensions,
        );
        let videos = self.resolve_batch(
            &resolver,
            &video_pattern,
            self.config.video_count,
            MediaKind::Video,
            &self.config.video_extensions,
        );
        let (photos, videos) = future::join(photos, videos).await;

        Ok(photos.into_iter().chain(videos).collect())
    }

    /// Builds the complete gallery: resolve, shuffle, index.
    ///
    /// The caller supplies the random source so the shuffle is controllable
    /// in tests; production callers typically pass a freshly seeded
    /// [`rand::rngs::StdRng`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Config`] if the configuration fails
    /// validation.
    pub async fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Gallery> {
        let resolved = self.resolve_slots().await?;
        Ok(Gallery::from_resolved(resolved, rng))
    }

    /// Resolves one batch of slots concurrently.
    ///
    /// `join_all` preserves slot order in its output, so the batch result is
    /// ordered even though the probes interleave.
    async fn resolve_batch(
        &self,
        resolver: &AssetResolver<'_, P>,
        pattern: &SlotPattern,
        count: u32,
        kind: MediaKind,
        extensions: &[String],
    ) -> Vec<ResolvedAsset> {
        let slots = (1..=count).map(|slot| async move {
            resolver
                .resolve(pattern, slot, kind, extensions)
                .await
                .map(|location| ResolvedAsset {
                    kind,
                    location,
                    label: label_for(kind, slot),
                })
        });

        future::join_all(slots)
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

fn label_for(kind: MediaKind, slot: u32) -> String {
    match kind {
        MediaKind::Photo => format!("Memory {slot}"),
        MediaKind::Video => format!("Video Memory {slot}"),
    }
}
