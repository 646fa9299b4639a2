pub mod chart;
pub mod config;
mod error;
pub mod format;
mod fonts;
pub mod geometry;
pub mod model;
pub mod pdf;

pub use chart::{BitmapRasterizer, ChartRasterizer, rasterize_charts};
pub use config::{Margins, Orientation, PageSize, RenderOptions};
pub use error::Error;
pub use fonts::{ASCENDER_RATIO, FontFace, text_width};
pub use geometry::{PageCursor, PageGeometry};
pub use model::{
    Cell, ChartDescriptor, ChartImage, ChartKind, DateRange, Metric, MetricFormat, ReportData,
    ReportMetadata, TableDescriptor,
};
pub use pdf::{ReportLayout, layout_report, render_document};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where a report was written and how large it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    pub path: PathBuf,
    pub bytes: u64,
}

fn io_at(path: &Path) -> impl Fn(std::io::Error) -> Error + '_ {
    move |e| Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
}

/// Render `data` to `output`, rasterizing charts with the default [`BitmapRasterizer`].
pub fn render_report(
    data: &ReportData,
    options: &RenderOptions,
    output: &Path,
) -> Result<RenderOutput, Error> {
    render_report_with(data, &BitmapRasterizer::from_options(options), options, output)
}

/// Render `data` to `output` with a caller-supplied rasterizer. Input and
/// geometry are checked before any chart is drawn or any byte is written.
pub fn render_report_with<R: ChartRasterizer + ?Sized>(
    data: &ReportData,
    rasterizer: &R,
    options: &RenderOptions,
    output: &Path,
) -> Result<RenderOutput, Error> {
    let t0 = Instant::now();

    let geometry = PageGeometry::from_options(options)?;
    data.validate()?;
    let t_validate = t0.elapsed();

    let images = rasterize_charts(&data.charts, rasterizer)?;
    let t_raster = t0.elapsed();

    let layout = pdf::layout_validated(data, images, geometry)?;
    let t_layout = t0.elapsed();

    let bytes = render_document(&layout, &data.metadata)?;
    let t_render = t0.elapsed();

    let written = write_output(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: validate={:.1}ms, rasterize={:.1}ms, layout={:.1}ms, serialize={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes, {} pages)",
        t_validate.as_secs_f64() * 1000.0,
        (t_raster - t_validate).as_secs_f64() * 1000.0,
        (t_layout - t_raster).as_secs_f64() * 1000.0,
        (t_render - t_layout).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        written.bytes,
        layout.page_count(),
    );

    Ok(written)
}

/// Lay out and serialize with already rasterized charts, one per descriptor.
pub fn render_report_bytes(
    data: &ReportData,
    images: Vec<ChartImage>,
    options: &RenderOptions,
) -> Result<Vec<u8>, Error> {
    let geometry = PageGeometry::from_options(options)?;
    let layout = layout_report(data, images, geometry)?;
    render_document(&layout, &data.metadata)
}

/// Stream `bytes` to `path`, creating missing directories. Returns once the
/// file is flushed and synced. A failed write leaves whatever reached disk.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<RenderOutput, Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_at(parent))?;
    }
    let file = File::create(path).map_err(io_at(path))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(io_at(path))?;
    let file = writer
        .into_inner()
        .map_err(|e| io_at(path)(e.into_error()))?;
    file.sync_all().map_err(io_at(path))?;
    drop(file);

    let size = std::fs::metadata(path).map_err(io_at(path))?.len();
    Ok(RenderOutput {
        path: path.to_path_buf(),
        bytes: size,
    })
}
