//! Intrinsic image dimensions shared with replaced boxes.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)

use serde::{Deserialize, Serialize};

/// Natural dimensions of an image resource.
///
/// [§ 5.1 Intrinsic Dimensions](https://www.w3.org/TR/css-images-3/#natural-dimensions)
///
/// "The natural dimensions of an object are its natural width and natural
/// height, and its natural aspect ratio."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Natural width in CSS pixels.
    pub width: f64,
    /// Natural height in CSS pixels.
    pub height: f64,
}

impl ImageDimensions {
    /// Create dimensions from a natural width and height.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Natural aspect ratio (width / height).
    ///
    /// Degenerate dimensions (zero or non-finite ratio) behave as 1:1.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let ratio = self.width / self.height;
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }
}
