// SPDX-License-Identifier: MPL-2.0
//! `memoria` is a slot-probed photo/video gallery engine.
//!
//! It discovers a bounded set of media assets by probing filename patterns
//! across candidate extensions, assembles them into a shuffled collection
//! with stable logical indices, derives category-filtered views, and
//! maintains lightbox navigation state with wraparound. Rendering and the
//! visual lightbox shell are collaborator concerns behind small traits.

#![doc(html_root_url = "https://docs.rs/memoria/0.2.0")]

pub mod config;
pub mod error;
pub mod gallery;
pub mod media;
pub mod ui;
