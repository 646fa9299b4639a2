use crate::fonts::FontFace;
use crate::geometry::{PageCursor, PageGeometry};
use crate::model::ChartImage;

use super::canvas::{Area, BLACK, Canvas, TextStyle};
use super::sections::{centered_x, content_line};

/// Display box of every chart; the image is stretched to it.
pub const CHART_BOX_WIDTH: f32 = 480.0;
pub const CHART_BOX_HEIGHT: f32 = 240.0;
const CHART_TITLE_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 14.0, BLACK);
const CHART_TITLE_H: f32 = 24.0;
const AFTER_CHART: f32 = 30.0;
/// Title, image and trailing gap; never split across pages.
pub const CHART_BLOCK_HEIGHT: f32 = CHART_TITLE_H + CHART_BOX_HEIGHT + AFTER_CHART;

/// Place each chart under its title, one per slot. The section opens on a new
/// page; `images[i]` is referenced from the page as image `i`.
pub(super) fn render_charts(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    images: &[ChartImage],
) {
    if images.is_empty() {
        return;
    }
    geometry.break_page(cursor);

    for (i, image) in images.iter().enumerate() {
        geometry.ensure_space(cursor, CHART_BLOCK_HEIGHT);

        let title_x = centered_x(geometry, CHART_TITLE_STYLE.width(&image.title));
        let clip = content_line(geometry, cursor.offset, CHART_TITLE_H);
        canvas.clipped_text(
            cursor,
            CHART_TITLE_STYLE,
            title_x,
            cursor.offset,
            &image.title,
            clip,
        );
        cursor.offset += CHART_TITLE_H;

        let area = Area {
            x: (geometry.width - CHART_BOX_WIDTH) / 2.0,
            y: cursor.offset,
            width: CHART_BOX_WIDTH,
            height: CHART_BOX_HEIGHT,
        };
        log::debug!(
            "CHART {} '{}' page={} y={:.2} native={}x{}",
            i,
            image.title,
            cursor.page_index + 1,
            area.y,
            image.width,
            image.height
        );
        canvas.image(cursor, i, area);
        cursor.offset += CHART_BOX_HEIGHT + AFTER_CHART;
    }
}
