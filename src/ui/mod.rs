// SPDX-License-Identifier: MPL-2.0
//! Interaction helpers consumed by the presentation layer.

pub mod gesture;

pub use gesture::SwipeTracker;
