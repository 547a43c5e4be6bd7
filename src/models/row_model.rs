use serde::Serialize;

use super::{Dimensions, Image};

/// An image placed in a finalized row, carrying its final pixel size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub href: String,
    pub intrinsic: Dimensions,
    pub display_w: u32,
    pub display_h: u32,
}

impl RowItem {
    pub fn new(image: &Image, display_w: u32, display_h: u32) -> Self {
        Self {
            id: image.id.clone(),
            href: image.href.clone(),
            intrinsic: image.dimensions,
            display_w,
            display_h,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowModel {
    pub row_index: u32,
    /// Tallest image in the row.
    pub height_px: u32,
    /// Factor applied to the capped natural sizes to fill the row.
    pub scale: f64,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(row_index: u32, scale: f64, items: Vec<RowItem>) -> Self {
        let height_px = items.iter().map(|item| item.display_h).max().unwrap_or(0);
        Self {
            row_index,
            height_px,
            scale,
            items,
        }
    }

    /// Rendered width of the row: image widths plus interior gutters.
    pub fn width_px(&self, gutter: f64) -> f64 {
        let images: u64 = self.items.iter().map(|item| u64::from(item.display_w)).sum();
        images as f64 + self.items.len().saturating_sub(1) as f64 * gutter
    }
}

/// The finalized rows, in input order.
pub type Layout = Vec<RowModel>;

/// Total height of all rows with `row_gap` between consecutive rows.
pub fn total_height(rows: &[RowModel], row_gap: f64) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }

    let heights_sum: f64 = rows.iter().map(|r| f64::from(r.height_px)).sum();
    let gaps_sum = rows.len().saturating_sub(1) as f64 * row_gap;
    heights_sum + gaps_sum
}
