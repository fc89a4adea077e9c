// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for legend sizing.
//!
//! Shaping stays with the drawing layer, so legend layout accepts a measurer for
//! rough label bounds.

use crate::layout::Size;

/// A minimal text measurement interface.
///
/// Callers can plug in a real text measurement backend (e.g. based on shaping), or
/// use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns the extent of `text` in pixels.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// A heuristic text measurer suitable for tests and early layout.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        Size {
            width: 0.6 * font_size * text.chars().count() as f64,
            height: font_size,
        }
    }
}

impl<F: Fn(&str, f64) -> Size> TextMeasurer for F {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        self(text, font_size)
    }
}
