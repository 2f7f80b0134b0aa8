// SPDX-License-Identifier: MPL-2.0
//! Slot resolution: pattern expansion plus ordered extension trial.
//!
//! A slot is one configured position (a number) for which an asset may or
//! may not exist. The resolver expands the slot number into the filename
//! pattern and asks the prober about each candidate extension in turn; the
//! first hit wins, so the extension list's order encodes tie-break priority
//! (e.g. prefer `.jpg` over `.heic`). Exhausting the list is the ordinary
//! "slot not populated" outcome, not an error.

use crate::config::SLOT_PLACEHOLDER;
use crate::error::{Error, Result};
use crate::media::{ExistenceProber, MediaKind};
use std::time::Duration;

/// A filename pattern with a validated `{n}` slot placeholder.
///
/// Only the first occurrence of the placeholder is substituted, matching
/// how the pattern behaves in the configuration examples (`"photo_{n}"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPattern(String);

impl SlotPattern {
    /// Creates a pattern, verifying that it contains the `{n}` placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the placeholder is missing.
    pub fn new(pattern: &str) -> Result<Self> {
        if !pattern.contains(SLOT_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "pattern '{}' is missing the {} placeholder",
                pattern, SLOT_PLACEHOLDER
            )));
        }
        Ok(Self(pattern.to_string()))
    }

    /// Substitutes the slot number into the pattern.
    #[must_use]
    pub fn expand(&self, slot: u32) -> String {
        self.0.replacen(SLOT_PLACEHOLDER, &slot.to_string(), 1)
    }

    /// Returns the raw pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolves slots to concrete locations through an [`ExistenceProber`].
pub struct AssetResolver<'a, P> {
    prober: &'a P,
    asset_root: &'a str,
    probe_timeout: Option<Duration>,
}

impl<'a, P: ExistenceProber> AssetResolver<'a, P> {
    #[must_use]
    pub fn new(prober: &'a P, asset_root: &'a str, probe_timeout: Option<Duration>) -> Self {
        Self {
            prober,
            asset_root,
            probe_timeout,
        }
    }

    /// Finds the first existing location for a slot, or reports absence.
    ///
    /// Extensions are tried strictly in list order, one at a time, so the
    /// earliest listed extension wins whenever several candidates exist for
    /// the same slot. `None` means the slot is not populated.
    pub async fn resolve(
        &self,
        pattern: &SlotPattern,
        slot: u32,
        kind: MediaKind,
        extensions: &[String],
    ) -> Option<String> {
        let base_name = pattern.expand(slot);
        for extension in extensions {
            let location = join_root(self.asset_root, &format!("{base_name}{extension}"));
            if self.probe_once(&location, kind).await {
                return Some(location);
            }
        }
        None
    }

    /// Runs one probe attempt, bounded by the configured timeout.
    ///
    /// An elapsed timeout counts as "unresolved", never as success.
    async fn probe_once(&self, location: &str, kind: MediaKind) -> bool {
        match self.probe_timeout {
            Some(limit) => tokio::time::timeout(limit, self.prober.probe(location, kind))
                .await
                .unwrap_or(false),
            None => self.prober.probe(location, kind).await,
        }
    }
}

/// Prepends the asset root to a filename.
fn join_root(asset_root: &str, name: &str) -> String {
    if asset_root.is_empty() {
        name.to_string()
    } else if asset_root.ends_with('/') {
        format!("{asset_root}{name}")
    } else {
        format!("{asset_root}/{name}")
    }
}
