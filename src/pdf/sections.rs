use crate::fonts::FontFace;
use crate::format::{format_date_range, format_filter_value, format_metric, format_timestamp};
use crate::geometry::{PageCursor, PageGeometry};
use crate::model::{Metric, ReportMetadata};

use super::canvas::{Area, BLACK, Canvas, MUTED, RULE, Rgb, TextStyle};

const NAME_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 24.0, BLACK);
const TYPE_STYLE: TextStyle = TextStyle::new(FontFace::Regular, 14.0, MUTED);
const NAME_LINE_H: f32 = 30.0;
const TYPE_LINE_H: f32 = 20.0;
const HEADER_RULE_GAP: f32 = 8.0;
const HEADER_RULE_W: f32 = 1.0;
const AFTER_HEADER: f32 = 20.0;

const META_LABEL_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 11.0, BLACK);
const META_VALUE_STYLE: TextStyle = TextStyle::new(FontFace::Regular, 11.0, MUTED);
const META_LINE_H: f32 = 18.0;
const META_LABEL_GAP: f32 = 6.0;
const AFTER_METADATA: f32 = 12.0;

pub const SUMMARY_COLUMNS: usize = 2;
pub const CARD_HEIGHT: f32 = 60.0;
pub const CARD_GAP: f32 = 15.0;
const CARD_FILL: Rgb = [243, 244, 246];
const CARD_PADDING: f32 = 10.0;
const CARD_LABEL_STYLE: TextStyle = TextStyle::new(FontFace::Regular, 9.0, MUTED);
const CARD_VALUE_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 16.0, BLACK);
const CARD_VALUE_TOP: f32 = 28.0;

/// Centered in the content area; text wider than it starts at the left margin.
pub(super) fn centered_x(geometry: &PageGeometry, width: f32) -> f32 {
    geometry.left() + ((geometry.content_width() - width) / 2.0).max(0.0)
}

/// One line of the content area starting at `top`.
pub(super) fn content_line(geometry: &PageGeometry, top: f32, height: f32) -> Area {
    Area {
        x: geometry.left(),
        y: top,
        width: geometry.content_width(),
        height,
    }
}

/// Report name and type, centered, over a full-width rule. Always fits on the
/// first page: `PageGeometry::new` rejects pages shorter than the header.
pub(super) fn render_header(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    metadata: &ReportMetadata,
) {
    let name = &metadata.report_name;
    let x = centered_x(geometry, NAME_STYLE.width(name));
    let clip = content_line(geometry, cursor.offset, NAME_LINE_H);
    canvas.clipped_text(cursor, NAME_STYLE, x, cursor.offset, name, clip);
    cursor.offset += NAME_LINE_H;

    let kind = &metadata.report_type;
    let x = centered_x(geometry, TYPE_STYLE.width(kind));
    let clip = content_line(geometry, cursor.offset, TYPE_LINE_H);
    canvas.clipped_text(cursor, TYPE_STYLE, x, cursor.offset, kind, clip);
    cursor.offset += TYPE_LINE_H + HEADER_RULE_GAP;

    canvas.hline(
        cursor,
        geometry.left(),
        geometry.right(),
        cursor.offset + HEADER_RULE_W / 2.0,
        HEADER_RULE_W,
        RULE,
    );
    cursor.offset += HEADER_RULE_W + AFTER_HEADER;
}

/// Label/value lines in display order.
pub(super) fn metadata_lines(metadata: &ReportMetadata) -> Vec<(String, String)> {
    let mut lines = vec![(
        "Generated At".to_string(),
        format_timestamp(&metadata.generated_at),
    )];
    if let Some(by) = &metadata.generated_by {
        lines.push(("Generated By".to_string(), by.clone()));
    }
    if let Some(project) = &metadata.project_name {
        lines.push(("Project".to_string(), project.clone()));
    }
    if let Some(range) = metadata.date_range.as_ref().and_then(format_date_range) {
        lines.push(("Date Range".to_string(), range));
    }
    for (key, value) in &metadata.filters {
        lines.push((format!("Filter ({key})"), format_filter_value(value)));
    }
    lines
}

pub(super) fn render_metadata(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    metadata: &ReportMetadata,
) {
    for (label, value) in metadata_lines(metadata) {
        if geometry.ensure_space(cursor, META_LINE_H) {
            log::debug!("metadata continues on page {}", cursor.page_index + 1);
        }
        let label = format!("{label}:");
        let clip = content_line(geometry, cursor.offset, META_LINE_H);
        let left = geometry.left();
        canvas.clipped_text(cursor, META_LABEL_STYLE, left, cursor.offset, &label, clip);
        let value_x = left + META_LABEL_STYLE.width(&label) + META_LABEL_GAP;
        canvas.clipped_text(cursor, META_VALUE_STYLE, value_x, cursor.offset, &value, clip);
        cursor.offset += META_LINE_H;
    }
    cursor.offset += AFTER_METADATA;
}

/// (row, column) of the summary card at `index`.
pub fn summary_grid_cell(index: usize) -> (usize, usize) {
    (index / SUMMARY_COLUMNS, index % SUMMARY_COLUMNS)
}

/// Metric cards in a fixed two-column grid. A card that would cross the bottom
/// margin is not drawn, and neither is any card after it; the grid never
/// continues on a new page. The cursor moves past every row either way.
pub(super) fn render_summary(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    metrics: &[Metric],
) {
    if metrics.is_empty() {
        return;
    }
    let columns = SUMMARY_COLUMNS as f32;
    let card_w = (geometry.content_width() - CARD_GAP * (columns - 1.0)) / columns;
    let grid_top = cursor.offset;

    for (i, metric) in metrics.iter().enumerate() {
        let (row, col) = summary_grid_cell(i);
        let x = geometry.left() + col as f32 * (card_w + CARD_GAP);
        let y = grid_top + row as f32 * (CARD_HEIGHT + CARD_GAP);

        if y + CARD_HEIGHT > geometry.bottom_limit() {
            log::warn!(
                "summary grid overflows page {}: {} of {} cards not drawn",
                cursor.page_index + 1,
                metrics.len() - i,
                metrics.len()
            );
            break;
        }

        let card = Area {
            x,
            y,
            width: card_w,
            height: CARD_HEIGHT,
        };
        canvas.rect(cursor, card, Some(CARD_FILL), None);
        let inner = Area {
            x: x + CARD_PADDING,
            y,
            width: card_w - 2.0 * CARD_PADDING,
            height: CARD_HEIGHT,
        };
        canvas.clipped_text(
            cursor,
            CARD_LABEL_STYLE,
            inner.x,
            y + CARD_PADDING,
            &metric.label,
            inner,
        );
        canvas.clipped_text(
            cursor,
            CARD_VALUE_STYLE,
            inner.x,
            y + CARD_VALUE_TOP,
            &format_metric(metric),
            inner,
        );
    }

    let rows = metrics.len().div_ceil(SUMMARY_COLUMNS);
    cursor.offset += rows as f32 * (CARD_HEIGHT + CARD_GAP);
}
