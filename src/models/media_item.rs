use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Intrinsic pixel size of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub w: f64,
    pub h: f64,
}

/// An image to be placed in the grid.
///
/// Serialized in the same shape as the sample data the grid is fed with:
/// `{ "_id": ..., "href": ..., "dimensions": { "w": ..., "h": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    pub href: String,
    pub dimensions: Dimensions,
}

impl Image {
    pub fn new(id: impl Into<String>, href: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            dimensions: Dimensions {
                w: width,
                h: height,
            },
        }
    }

    /// Checks that both intrinsic dimensions are finite and strictly positive.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let Dimensions { w, h } = self.dimensions;
        if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 {
            Ok(())
        } else {
            Err(LayoutError::InvalidImage {
                id: self.id.clone(),
                width: w,
                height: h,
            })
        }
    }
}
