mod canvas;
mod charts;
mod footer;
mod sections;
mod table;
mod writer;

use crate::error::Error;
use crate::format::format_timestamp;
use crate::geometry::PageGeometry;
use crate::model::{ChartImage, ReportData, ReportMetadata};

pub use canvas::{Area, DrawOp, Page, Rgb};
pub use charts::{CHART_BLOCK_HEIGHT, CHART_BOX_HEIGHT, CHART_BOX_WIDTH};
pub use sections::{CARD_GAP, CARD_HEIGHT, SUMMARY_COLUMNS, summary_grid_cell};
pub use table::{
    HEADER_ROW_HEIGHT, ROW_HEIGHT, SHADE_EVEN, SHADE_ODD, TABLE_HEAD_HEIGHT, row_shade,
};

use canvas::Canvas;

/// A fully laid out report: every page's draw ops, footers included, plus the
/// chart images the pages reference by index.
#[derive(Debug)]
pub struct ReportLayout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub images: Vec<ChartImage>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out `data` page by page. `images` must hold one rasterized chart per
/// descriptor, in descriptor order.
pub fn layout_report(
    data: &ReportData,
    images: Vec<ChartImage>,
    geometry: PageGeometry,
) -> Result<ReportLayout, Error> {
    data.validate()?;
    layout_validated(data, images, geometry)
}

pub(crate) fn layout_validated(
    data: &ReportData,
    images: Vec<ChartImage>,
    geometry: PageGeometry,
) -> Result<ReportLayout, Error> {
    if images.len() != data.charts.len() {
        return Err(Error::InvalidInput(format!(
            "{} chart images supplied for {} chart descriptors",
            images.len(),
            data.charts.len()
        )));
    }

    let mut canvas = Canvas::new();
    let mut cursor = geometry.start_cursor();
    let metadata = &data.metadata;

    sections::render_header(&mut canvas, &geometry, &mut cursor, metadata);
    sections::render_metadata(&mut canvas, &geometry, &mut cursor, metadata);
    sections::render_summary(&mut canvas, &geometry, &mut cursor, &data.summary);
    charts::render_charts(&mut canvas, &geometry, &mut cursor, &images);
    table::render_tables(&mut canvas, &geometry, &mut cursor, &data.tables);

    let stamp = format_timestamp(&metadata.generated_at);
    let total = footer::stamp_footers(&mut canvas, &geometry, &stamp);
    log::debug!(
        "Layout: {} pages, {} charts, {} tables ({} rows)",
        total,
        images.len(),
        data.tables.len(),
        data.tables.iter().map(|t| t.rows.len()).sum::<usize>()
    );

    Ok(ReportLayout {
        geometry,
        pages: canvas.into_pages(),
        images,
    })
}

/// Serialize a finished layout to PDF bytes.
pub fn render_document(
    layout: &ReportLayout,
    metadata: &ReportMetadata,
) -> Result<Vec<u8>, Error> {
    writer::write_pdf(layout, metadata)
}
