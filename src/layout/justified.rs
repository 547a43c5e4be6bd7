use tracing::{trace, warn};

use super::dimensions::{capped_dimensions, natural_dimensions};
use crate::config::{
    LayoutConfig, DEFAULT_GUTTER, DEFAULT_MAX_ROW_HEIGHT, DEFAULT_MIN_ROW_HEIGHT,
};
use crate::error::LayoutError;
use crate::models::{Image, Layout, RowItem, RowModel};

/// Row-height bounds and spacing for the justified layout.
///
/// Images are packed greedily left-to-right. A row closes as soon as the next
/// image would overflow the container, then it is scaled so its images fill
/// the container width exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct JustifiedLayout {
    /// Lower bound used while estimating how many images fit (default: 150)
    pub min_row_height: f64,
    /// Upper bound on natural image height (default: 400)
    pub max_row_height: f64,
    /// Gap between images in a row, and between rows (default: 5)
    pub gutter: f64,
}

impl Default for JustifiedLayout {
    fn default() -> Self {
        Self {
            min_row_height: DEFAULT_MIN_ROW_HEIGHT,
            max_row_height: DEFAULT_MAX_ROW_HEIGHT,
            gutter: DEFAULT_GUTTER,
        }
    }
}

impl From<&LayoutConfig> for JustifiedLayout {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            min_row_height: config.min_row_height,
            max_row_height: config.max_row_height,
            gutter: config.gutter,
        }
    }
}

/// A row still accepting images.
#[derive(Debug, Default)]
struct PendingRow<'a> {
    images: Vec<&'a Image>,
    /// Natural widths plus the interior gutters counted so far.
    width: f64,
    /// Sum of natural width / natural height over the row.
    aspect_sum: f64,
}

impl<'a> PendingRow<'a> {
    fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn overflows(&self, item_w: f64, gutter: f64, limit: f64) -> bool {
        !self.is_empty() && self.width + gutter + item_w > limit
    }

    fn push(&mut self, image: &'a Image, item_w: f64, item_h: f64, gutter: f64) {
        if !self.is_empty() {
            self.width += gutter;
        }
        self.images.push(image);
        self.width += item_w;
        if item_h > 0.0 {
            self.aspect_sum += item_w / item_h;
        }
    }
}

impl JustifiedLayout {
    /// The full set of layout inputs for a given container width.
    pub fn config(&self, container_width: f64) -> LayoutConfig {
        LayoutConfig {
            container_width,
            min_row_height: self.min_row_height,
            max_row_height: self.max_row_height,
            gutter: self.gutter,
        }
    }

    /// Computes the justified rows for `images` in a container `container_width` wide.
    ///
    /// Never fails. An unusable configuration (a container that has not been
    /// measured yet, inverted bounds, a negative gutter) logs a warning and
    /// yields no rows. Images with non-positive or non-finite dimensions are
    /// logged and left out. The remaining images keep their relative order.
    pub fn compute(&self, images: &[Image], container_width: f64) -> Layout {
        if let Err(err) = self.config(container_width).validate() {
            warn!(container_width, error = %err, "Skipping layout: invalid configuration");
            return Vec::new();
        }

        let valid = images.iter().filter(|image| match image.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(id = %image.id, error = %err, "Skipping image with invalid dimensions");
                false
            }
        });

        self.pack(valid, container_width)
    }

    /// Like [`compute`](Self::compute), but fails on the first invalid input
    /// instead of skipping it.
    pub fn try_compute(&self, images: &[Image], container_width: f64) -> Result<Layout, LayoutError> {
        self.config(container_width).validate()?;
        for image in images {
            image.validate()?;
        }
        Ok(self.pack(images.iter(), container_width))
    }

    /// Single greedy pass: rows are never revisited once emitted.
    fn pack<'a>(&self, images: impl IntoIterator<Item = &'a Image>, container_width: f64) -> Layout {
        let mut rows = Vec::new();
        let mut pending = PendingRow::default();

        for image in images {
            let (item_w, item_h) =
                natural_dimensions(image, self.min_row_height, self.max_row_height);

            if pending.overflows(item_w, self.gutter, container_width) {
                let full = std::mem::take(&mut pending);
                rows.push(self.finalize(full, rows.len() as u32, container_width));
            }

            pending.push(image, item_w, item_h, self.gutter);
        }

        if !pending.is_empty() {
            rows.push(self.finalize(pending, rows.len() as u32, container_width));
        }

        rows
    }

    /// Scales a closed row so its images and interior gutters span `container_width`.
    ///
    /// Sizes are recomputed with only the max-height cap before scaling.
    /// Each dimension is floored on its own, so a row may come up short by at
    /// most one pixel per image.
    fn finalize(&self, row: PendingRow<'_>, row_index: u32, container_width: f64) -> RowModel {
        let count = row.images.len();
        let target_width = container_width - count.saturating_sub(1) as f64 * self.gutter;

        let capped: Vec<(f64, f64)> = row
            .images
            .iter()
            .map(|image| capped_dimensions(image, self.max_row_height))
            .collect();
        let fill_width: f64 = capped.iter().map(|(w, _)| w).sum();

        let scale = if fill_width > 0.0 {
            target_width / fill_width
        } else {
            0.0
        };

        trace!(
            row_index,
            images = count,
            packed_width = row.width,
            fill_width,
            scale,
            justified_height = target_width / row.aspect_sum.max(f64::EPSILON),
            "Finalized row"
        );

        let items = row
            .images
            .iter()
            .zip(&capped)
            .map(|(image, &(w, h))| {
                RowItem::new(
                    image,
                    scale_px(w, target_width, fill_width),
                    scale_px(h, target_width, fill_width),
                )
            })
            .collect();

        RowModel::new(row_index, scale, items)
    }
}

/// `value * target / fill`, floored to whole pixels; zero when `fill` is not positive.
fn scale_px(value: f64, target: f64, fill: f64) -> u32 {
    if fill <= 0.0 {
        return 0;
    }
    let px = (value * target / fill).floor().max(0.0);
    if px > f64::from(u32::MAX) {
        warn!(px, "Display size does not fit in u32, clamping");
        return u32::MAX;
    }
    px as u32
}

/// Computes the justified layout for `images` under `config`.
///
/// Pure: identical inputs always produce identical rows.
pub fn compute_layout(images: &[Image], config: &LayoutConfig) -> Layout {
    JustifiedLayout::from(config).compute(images, config.container_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, width: u32, height: u32) -> Image {
        Image::new(id, format!("{id}.jpg"), f64::from(width), f64::from(height))
    }

    fn sample_items(count: usize) -> Vec<Image> {
        const SIZES: [(u32, u32); 8] = [
            (1920, 1080),
            (1080, 1920),
            (1000, 1000),
            (4000, 1000),
            (640, 480),
            (120, 90),
            (3000, 2000),
            (300, 900),
        ];
        (0..count)
            .map(|i| {
                let (w, h) = SIZES[i % SIZES.len()];
                make_item(&format!("{i}"), w, h)
            })
            .collect()
    }

    fn ids(rows: &[RowModel]) -> Vec<String> {
        rows.iter()
            .flat_map(|row| row.items.iter().map(|item| item.id.clone()))
            .collect()
    }

    fn sizes(row: &RowModel) -> Vec<(u32, u32)> {
        row.items
            .iter()
            .map(|item| (item.display_w, item.display_h))
            .collect()
    }

    #[test]
    fn test_empty_items() {
        let layout = JustifiedLayout::default();
        let rows = layout.compute(&[], 1920.0);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unmeasured_container_yields_no_rows() {
        let layout = JustifiedLayout::default();
        let items = sample_items(5);
        assert!(layout.compute(&items, 0.0).is_empty());
        assert!(layout.compute(&items, -40.0).is_empty());
        assert!(layout.compute(&items, f64::NAN).is_empty());
    }

    #[test]
    fn test_inverted_bounds_yield_no_rows() {
        let layout = JustifiedLayout {
            min_row_height: 500.0,
            max_row_height: 200.0,
            gutter: 5.0,
        };
        assert!(layout.compute(&sample_items(5), 1200.0).is_empty());
    }

    #[test]
    fn test_overflow_starts_new_row() {
        let items = vec![
            make_item("a", 400, 300),
            make_item("b", 300, 300),
            make_item("c", 500, 250),
        ];
        let rows = compute_layout(&items, &LayoutConfig::new(860.0));

        assert_eq!(rows.len(), 2);
        // 400 + 5 + 300 fits in 860; adding 5 + 500 does not.
        assert_eq!(sizes(&rows[0]), vec![(488, 366), (366, 366)]);
        assert_eq!(rows[0].width_px(5.0), 859.0);
        // The last row is scaled up to the full width as well.
        assert_eq!(sizes(&rows[1]), vec![(860, 430)]);
        assert_eq!(rows[1].row_index, 1);
    }

    #[test]
    fn test_single_item() {
        let layout = JustifiedLayout::default();
        let items = vec![make_item("a", 1920, 1080)];
        let rows = layout.compute(&items, 1000.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(sizes(&rows[0]), vec![(1000, 562)]);
        assert_eq!(rows[0].height_px, 562);
    }

    #[test]
    fn test_last_row_may_exceed_max_height() {
        let layout = JustifiedLayout::default();
        let items = vec![make_item("a", 1000, 1000), make_item("b", 1000, 1000)];
        let rows = layout.compute(&items, 1605.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(sizes(&rows[0]), vec![(800, 800), (800, 800)]);
        assert!(f64::from(rows[0].height_px) > layout.max_row_height);
    }

    #[test]
    fn test_panorama_gets_own_row() {
        let layout = JustifiedLayout::default();
        let items = vec![make_item("pano", 12000, 1000), make_item("next", 400, 300)];
        let rows = layout.compute(&items, 800.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(ids(&rows[..1]), vec!["pano"]);
        assert_eq!(sizes(&rows[0]), vec![(800, 66)]);
        assert_eq!(ids(&rows[1..]), vec!["next"]);
    }

    #[test]
    fn test_packing_uses_min_clamp_and_finalize_uses_cap() {
        let layout = JustifiedLayout::default();
        let items: Vec<Image> = (0..4)
            .map(|i| make_item(&format!("{i}"), 100, 100))
            .collect();

        // Packed at 150px tall: three tiles take 460px of a 470px container.
        let rows = layout.compute(&items, 470.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].items.len(), 3);

        // Finalized from the 100px cap: 460 / 300 scale.
        assert_eq!(sizes(&rows[0]), vec![(153, 153); 3]);
        assert_eq!(sizes(&rows[1]), vec![(470, 470)]);
    }

    #[test]
    fn test_large_sources_share_row_height() {
        let layout = JustifiedLayout::default();
        let items = vec![
            make_item("wide", 1920, 1080),
            make_item("square", 1000, 1000),
            make_item("tall", 1080, 1920),
            make_item("wide2", 2560, 1080),
        ];
        let rows = layout.compute(&items, 1920.0);

        assert_eq!(ids(&rows), vec!["wide", "square", "tall", "wide2"]);
        for row in &rows {
            let first = row.items[0].display_h;
            assert!(row.items.iter().all(|item| item.display_h == first));
        }
    }

    #[test]
    fn test_coverage_and_order() {
        let layout = JustifiedLayout::default();
        let items = sample_items(60);
        let expected: Vec<String> = items.iter().map(|i| i.id.clone()).collect();

        for width in [320.0, 640.0, 1024.0, 1366.0, 1920.0, 3840.0] {
            let rows = layout.compute(&items, width);
            assert_eq!(ids(&rows), expected, "width {width}");
            for (index, row) in rows.iter().enumerate() {
                assert_eq!(row.row_index as usize, index);
                assert!(!row.items.is_empty());
            }
        }
    }

    #[test]
    fn test_rows_fill_container_width() {
        let layout = JustifiedLayout::default();
        let items = sample_items(60);

        for width in [320.0, 640.0, 1024.0, 1366.0, 1920.0] {
            for row in layout.compute(&items, width) {
                let n = row.items.len() as f64;
                let filled = row.width_px(layout.gutter);
                assert!(filled <= width, "row {} overflows: {filled} > {width}", row.row_index);
                assert!(
                    filled >= width - n,
                    "row {} under-filled: {filled} < {width} - {n}",
                    row.row_index
                );
            }
        }
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let layout = JustifiedLayout::default();
        let items = sample_items(40);

        for row in layout.compute(&items, 1366.0) {
            for item in &row.items {
                let ar = item.intrinsic.w / item.intrinsic.h;
                let drift = (f64::from(item.display_w) - f64::from(item.display_h) * ar).abs();
                assert!(
                    drift <= row.scale + ar + 1.0,
                    "{} drifted {drift}px (scale {})",
                    item.id,
                    row.scale
                );
            }
        }
    }

    #[test]
    fn test_aspect_ratio_exact_sources() {
        // Heights within the cap keep capped sizes integral, so only the final floor drifts.
        let layout = JustifiedLayout::default();
        let items = vec![
            make_item("a", 400, 300),
            make_item("b", 300, 300),
            make_item("c", 500, 250),
            make_item("d", 640, 360),
            make_item("e", 120, 90),
            make_item("f", 333, 222),
            make_item("g", 250, 400),
            make_item("h", 397, 211),
        ];

        for width in [320.0, 640.0, 860.0, 1024.0, 1366.0, 1920.0] {
            for row in layout.compute(&items, width) {
                for item in &row.items {
                    let ar = item.intrinsic.w / item.intrinsic.h;
                    let drift = (f64::from(item.display_w) - f64::from(item.display_h) * ar).abs();
                    assert!(
                        drift <= ar + 1.0,
                        "{} at width {width} drifted {drift}px (ar {ar})",
                        item.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_huge_container_clamps_to_u32() {
        let layout = JustifiedLayout::default();
        let rows = layout.compute(&[make_item("a", 1000, 1000)], 1e12);

        assert_eq!(rows.len(), 1);
        assert_eq!(sizes(&rows[0]), vec![(u32::MAX, u32::MAX)]);
    }

    #[test]
    fn test_deterministic() {
        let layout = JustifiedLayout::default();
        let items = sample_items(50);
        assert_eq!(layout.compute(&items, 1280.0), layout.compute(&items, 1280.0));
    }

    #[test]
    fn test_wider_container_never_adds_rows() {
        let layout = JustifiedLayout::default();
        let items = sample_items(80);

        let mut previous = usize::MAX;
        for width in (200..=4000).step_by(50) {
            let count = layout.compute(&items, f64::from(width)).len();
            assert!(count <= previous, "{count} rows at {width}px, {previous} before");
            previous = count;
        }
    }

    #[test]
    fn test_invalid_images_are_skipped() {
        let layout = JustifiedLayout::default();
        let items = vec![
            make_item("a", 400, 300),
            make_item("broken", 400, 0),
            Image::new("negative", "n.jpg", -10.0, 20.0),
            make_item("b", 300, 300),
        ];
        let rows = layout.compute(&items, 860.0);
        assert_eq!(ids(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_try_compute_rejects_invalid_input() {
        let layout = JustifiedLayout::default();
        let items = vec![make_item("a", 400, 300), make_item("broken", 0, 300)];

        match layout.try_compute(&items, 860.0) {
            Err(LayoutError::InvalidImage { id, .. }) => assert_eq!(id, "broken"),
            other => panic!("expected invalid image error, got {other:?}"),
        }
        assert!(matches!(
            layout.try_compute(&items[..1], 0.0),
            Err(LayoutError::Config(_))
        ));
        assert_eq!(
            layout.try_compute(&items[..1], 860.0).unwrap(),
            layout.compute(&items[..1], 860.0)
        );
    }

    #[test]
    fn test_zero_width_sliver_does_not_divide_by_zero() {
        let layout = JustifiedLayout::default();
        let items = vec![make_item("sliver", 1, 10_000)];
        let rows = layout.compute(&items, 800.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(sizes(&rows[0]), vec![(0, 0)]);
        assert_eq!(rows[0].scale, 0.0);
    }

    #[test]
    fn test_zero_gutter() {
        let layout = JustifiedLayout {
            gutter: 0.0,
            ..Default::default()
        };
        let items: Vec<Image> = (0..4)
            .map(|i| make_item(&format!("{i}"), 400, 400))
            .collect();
        let rows = layout.compute(&items, 800.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(sizes(&rows[0]), vec![(400, 400), (400, 400)]);
    }
}
