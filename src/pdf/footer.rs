use crate::fonts::{ASCENDER_RATIO, FontFace};
use crate::geometry::{PageCursor, PageGeometry};

use super::canvas::{Canvas, MUTED, RULE, TextStyle};

const FOOTER_STYLE: TextStyle = TextStyle::new(FontFace::Regular, 8.0, MUTED);
/// Distances above the bottom page edge.
const FOOTER_RULE_RISE: f32 = 40.0;
const FOOTER_BASELINE_RISE: f32 = 28.0;
const FOOTER_RULE_W: f32 = 0.5;

/// Second pass over the finished pages: rule, "Page i of N" on the left and
/// the generation stamp on the right. Returns N.
pub(super) fn stamp_footers(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    generated_at: &str,
) -> usize {
    let total = canvas.page_count();
    let stamp = format!("Generated: {generated_at}");
    let stamp_x = geometry.right() - FOOTER_STYLE.width(&stamp);
    let rule_y = geometry.height - FOOTER_RULE_RISE;
    let text_top = geometry.height - FOOTER_BASELINE_RISE - FOOTER_STYLE.size * ASCENDER_RATIO;

    for page_index in 0..total {
        let cursor = PageCursor {
            page_index,
            offset: rule_y,
        };
        canvas.hline(&cursor, geometry.left(), geometry.right(), rule_y, FOOTER_RULE_W, RULE);
        let label = format!("Page {} of {}", page_index + 1, total);
        canvas.text(&cursor, FOOTER_STYLE, geometry.left(), text_top, &label);
        canvas.text(&cursor, FOOTER_STYLE, stamp_x, text_top, &stamp);
    }
    total
}
