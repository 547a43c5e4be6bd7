//! Natural display sizes derived from an image's aspect ratio.
//!
//! Packing and finalizing size images differently. Packing clamps the
//! intrinsic height into `[min, max]` to estimate how many images fit on a
//! row. Finalizing only caps it at `max` and rescales from there.

use crate::models::Image;

/// Natural `(width, height)` with the height clamped into `[min_height, max_height]`.
pub fn natural_dimensions(image: &Image, min_height: f64, max_height: f64) -> (f64, f64) {
    // max/min rather than f64::clamp: never panics on inverted bounds.
    let height = image.dimensions.h.max(min_height).min(max_height);
    (width_at(image, height), height)
}

/// Natural `(width, height)` with the height capped at `max_height` only.
pub fn capped_dimensions(image: &Image, max_height: f64) -> (f64, f64) {
    let height = image.dimensions.h.min(max_height);
    (width_at(image, height), height)
}

/// Whole-pixel width at `height`, keeping the image's aspect ratio.
fn width_at(image: &Image, height: f64) -> f64 {
    // Multiply before dividing so integral results stay exact.
    (height * image.dimensions.w / image.dimensions.h).floor()
}
