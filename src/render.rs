// Renders finalized rows as HTML strips or a plain-text digest

use std::fmt::Write;

use crate::models::{total_height, RowModel};

/// Renders the rows as a `<ul>` of flex strips.
///
/// `gutter` separates images within a row and rows from each other; the
/// last row gets no bottom margin.
pub fn render_html(rows: &[RowModel], gutter: f64) -> String {
    let mut out = String::from("<ul>\n");

    for (i, row) in rows.iter().enumerate() {
        let margin = if i + 1 == rows.len() { 0.0 } else { gutter };
        let _ = writeln!(
            out,
            "  <li style=\"display:flex;gap:{gutter}px;margin-bottom:{margin}px\">"
        );
        for item in &row.items {
            let _ = writeln!(
                out,
                "    <img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\" loading=\"lazy\" \
                 style=\"display:flex;width:{}px;height:{}px\">",
                escape_attr(&item.href),
                escape_attr(&item.id),
                item.display_w,
                item.display_h,
                item.display_w,
                item.display_h,
            );
        }
        out.push_str("  </li>\n");
    }

    out.push_str("</ul>\n");
    out
}

/// One line per row: index, image count, rendered width and height.
pub fn summary(rows: &[RowModel], gutter: f64) -> String {
    let mut out = String::new();
    for row in rows {
        let widths: Vec<String> = row.items.iter().map(|i| i.display_w.to_string()).collect();
        let _ = writeln!(
            out,
            "row {:>3}: {:>2} images, {}px wide ({}), {}px tall, scale {:.3}",
            row.row_index,
            row.items.len(),
            row.width_px(gutter),
            widths.join("+"),
            row.height_px,
            row.scale,
        );
    }
    let _ = writeln!(
        out,
        "{} rows, {}px total height",
        rows.len(),
        total_height(rows, gutter)
    );
    out
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
