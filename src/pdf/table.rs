use crate::fonts::FontFace;
use crate::geometry::{PageCursor, PageGeometry};
use crate::model::TableDescriptor;

use super::canvas::{Area, BLACK, Canvas, Rgb, TextStyle, WHITE};

const TITLE_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 14.0, BLACK);
const TITLE_H: f32 = 24.0;
const UNDERLINE_W: f32 = 0.75;
pub const HEADER_ROW_HEIGHT: f32 = 24.0;
pub const ROW_HEIGHT: f32 = 20.0;
/// Title plus header row; kept together at the start of a table.
pub const TABLE_HEAD_HEIGHT: f32 = TITLE_H + HEADER_ROW_HEIGHT;
const AFTER_TABLE: f32 = 20.0;
const CELL_INSET: f32 = 5.0;
const HEADER_STYLE: TextStyle = TextStyle::new(FontFace::Bold, 10.0, WHITE);
const CELL_STYLE: TextStyle = TextStyle::new(FontFace::Regular, 9.0, BLACK);
const HEADER_FILL: Rgb = [52, 73, 94];
const GRID: Rgb = [203, 213, 225];
/// Fill of rows with an even index in the table.
pub const SHADE_EVEN: Rgb = [243, 246, 250];
/// Fill of rows with an odd index in the table.
pub const SHADE_ODD: Rgb = [226, 232, 240];

/// Row fill by index within the whole table, independent of pagination.
pub fn row_shade(index: usize) -> Rgb {
    if index % 2 == 0 { SHADE_EVEN } else { SHADE_ODD }
}

/// Top of the text line for a band of height `band_h` starting at `band_top`.
fn text_top(band_top: f32, band_h: f32, style: &TextStyle) -> f32 {
    band_top + (band_h - style.size) / 2.0
}

pub(super) fn render_tables(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    tables: &[TableDescriptor],
) {
    for (ti, table) in tables.iter().enumerate() {
        if ti > 0 {
            geometry.break_page(cursor);
        } else {
            geometry.ensure_space(cursor, TABLE_HEAD_HEIGHT);
        }
        render_table(canvas, geometry, cursor, table);
        cursor.offset += AFTER_TABLE;
    }
}

/// Uniform columns, one header band, then fixed-height rows. Rows that do not
/// fit move to the next page without a repeated header.
fn render_table(
    canvas: &mut Canvas,
    geometry: &PageGeometry,
    cursor: &mut PageCursor,
    table: &TableDescriptor,
) {
    let table_left = geometry.left();
    let table_w = geometry.content_width();
    let col_w = table_w / table.headers.len() as f32;
    let column = |ci: usize| Area {
        x: table_left + ci as f32 * col_w,
        y: 0.0,
        width: col_w,
        height: 0.0,
    };

    canvas.text(cursor, TITLE_STYLE, table_left, cursor.offset, &table.title);
    let underline_y = cursor.offset + TITLE_STYLE.size + 2.0;
    canvas.hline(
        cursor,
        table_left,
        table_left + TITLE_STYLE.width(&table.title),
        underline_y,
        UNDERLINE_W,
        BLACK,
    );
    cursor.offset += TITLE_H;

    let header_top = cursor.offset;
    for (ci, header) in table.headers.iter().enumerate() {
        let band = Area {
            y: header_top,
            height: HEADER_ROW_HEIGHT,
            ..column(ci)
        };
        canvas.rect(cursor, band, Some(HEADER_FILL), Some(GRID));
        canvas.clipped_text(
            cursor,
            HEADER_STYLE,
            band.x + CELL_INSET,
            text_top(header_top, HEADER_ROW_HEIGHT, &HEADER_STYLE),
            header,
            band,
        );
    }
    cursor.offset += HEADER_ROW_HEIGHT;

    for (ri, row) in table.rows.iter().enumerate() {
        if geometry.ensure_space(cursor, ROW_HEIGHT) {
            log::debug!(
                "TABLE '{}' continues on page {} at row {}",
                table.title,
                cursor.page_index + 1,
                ri
            );
        }
        let row_top = cursor.offset;
        log::trace!(
            "TABLE row={} page={} row_top={:.2}",
            ri,
            cursor.page_index + 1,
            row_top
        );

        canvas.rect(
            cursor,
            Area {
                x: table_left,
                y: row_top,
                width: table_w,
                height: ROW_HEIGHT,
            },
            Some(row_shade(ri)),
            None,
        );
        for (ci, cell) in row.iter().enumerate() {
            let band = Area {
                y: row_top,
                height: ROW_HEIGHT,
                ..column(ci)
            };
            canvas.rect(cursor, band, None, Some(GRID));
            canvas.clipped_text(
                cursor,
                CELL_STYLE,
                band.x + CELL_INSET,
                text_top(row_top, ROW_HEIGHT, &CELL_STYLE),
                &cell.to_string(),
                band,
            );
        }
        cursor.offset += ROW_HEIGHT;
    }
}
