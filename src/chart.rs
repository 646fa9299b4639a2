//! Chart rasterization: the contract the layout engine consumes, a default
//! bitmap implementation, and the parallel batch that feeds the charts section.

use std::f32::consts::TAU;
use std::io::Cursor;
use std::time::Instant;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rayon::prelude::*;

use crate::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, RenderOptions};
use crate::error::Error;
use crate::model::{ChartDescriptor, ChartImage, ChartKind};

/// Turns a chart description into a PNG. Implementations must be pure per
/// descriptor: the batch calls them concurrently.
pub trait ChartRasterizer: Sync {
    fn rasterize(&self, chart: &ChartDescriptor) -> Result<ChartImage, Error>;
}

impl<F> ChartRasterizer for F
where
    F: Fn(&ChartDescriptor) -> Result<ChartImage, Error> + Sync,
{
    fn rasterize(&self, chart: &ChartDescriptor) -> Result<ChartImage, Error> {
        self(chart)
    }
}

/// Rasterize every descriptor concurrently. Output order matches input order;
/// any single failure fails the batch.
pub fn rasterize_charts<R: ChartRasterizer + ?Sized>(
    charts: &[ChartDescriptor],
    rasterizer: &R,
) -> Result<Vec<ChartImage>, Error> {
    let t0 = Instant::now();
    let images = charts
        .par_iter()
        .map(|chart| rasterizer.rasterize(chart))
        .collect::<Result<Vec<_>, Error>>()?;
    log::info!(
        "Rasterized {} charts in {:.1}ms",
        images.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(images)
}

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([160, 160, 160]);
const EMPTY: Rgb<u8> = Rgb([229, 231, 235]);
const PALETTE: [[u8; 3]; 8] = [
    [54, 162, 235],
    [255, 99, 132],
    [255, 205, 86],
    [75, 192, 192],
    [153, 102, 255],
    [255, 159, 64],
    [201, 203, 207],
    [46, 204, 113],
];
const PLOT_PADDING: f32 = 40.0;
const LINE_THICKNESS: f32 = 3.0;
const MARKER_RADIUS: f32 = 4.0;
const DOUGHNUT_HOLE: f32 = 0.5;

/// Draws pie, doughnut, bar and line charts on a white canvas. Titles and
/// labels are left to the document.
#[derive(Clone, Copy, Debug)]
pub struct BitmapRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Default for BitmapRasterizer {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl BitmapRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(options.chart_width, options.chart_height)
    }
}

fn chart_error(chart: &ChartDescriptor, reason: impl Into<String>) -> Error {
    Error::Chart {
        title: chart.title.clone(),
        reason: reason.into(),
    }
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional).
fn parse_color(s: &str) -> Option<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();
    match hex.len() {
        6 => Some(Rgb([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ])),
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 16 + v;
            }
            Some(Rgb(out))
        }
        _ => None,
    }
}

fn series_colors(chart: &ChartDescriptor) -> Result<Vec<Rgb<u8>>, Error> {
    let n = chart.values.len();
    match &chart.colors {
        Some(colors) if !colors.is_empty() => {
            let parsed = colors
                .iter()
                .map(|c| {
                    parse_color(c).ok_or_else(|| chart_error(chart, format!("invalid color '{c}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((0..n).map(|i| parsed[i % parsed.len()]).collect())
        }
        _ => Ok((0..n).map(|i| Rgb(PALETTE[i % PALETTE.len()])).collect()),
    }
}

fn fill_rect(img: &mut RgbImage, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb<u8>) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let xa = x0.min(x1).max(0.0).floor() as u32;
    let xb = x0.max(x1).min(w).ceil() as u32;
    let ya = y0.min(y1).max(0.0).floor() as u32;
    let yb = y0.max(y1).min(h).ceil() as u32;
    for y in ya..yb {
        for x in xa..xb {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_segment(
    img: &mut RgbImage,
    from: (f32, f32),
    to: (f32, f32),
    thickness: f32,
    color: Rgb<u8>,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = (dx.abs().max(dy.abs()) * 2.0).ceil().max(1.0) as usize;
    let half = thickness / 2.0;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let (x, y) = (from.0 + dx * t, from.1 + dy * t);
        fill_rect(img, x - half, y - half, x + half, y + half, color);
    }
}

/// Slices run clockwise from twelve o'clock.
fn draw_pie(img: &mut RgbImage, values: &[f64], colors: &[Rgb<u8>], hole: f32) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius = w.min(h) / 2.0 - PLOT_PADDING / 2.0;
    let inner = radius * hole;
    let total: f64 = values.iter().sum();

    let mut bounds = Vec::with_capacity(values.len());
    let mut acc = 0.0f64;
    for v in values {
        acc += v;
        bounds.push(if total > 0.0 { (acc / total) as f32 } else { 0.0 });
    }

    let ya = (cy - radius).max(0.0) as u32;
    let yb = ((cy + radius).ceil() as u32).min(img.height());
    let xa = (cx - radius).max(0.0) as u32;
    let xb = ((cx + radius).ceil() as u32).min(img.width());
    for y in ya..yb {
        for x in xa..xb {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > radius || dist < inner {
                continue;
            }
            if total <= 0.0 {
                img.put_pixel(x, y, EMPTY);
                continue;
            }
            let angle = dx.atan2(-dy).rem_euclid(TAU) / TAU;
            let slice = bounds
                .iter()
                .position(|&b| angle < b)
                .unwrap_or(values.len() - 1);
            img.put_pixel(x, y, colors[slice]);
        }
    }
}

/// Vertical scale covering the data and zero.
struct ValueScale {
    min: f64,
    max: f64,
    top: f32,
    bottom: f32,
}

impl ValueScale {
    fn new(values: &[f64], top: f32, bottom: f32) -> Self {
        let max = values.iter().copied().fold(0.0f64, f64::max);
        let min = values.iter().copied().fold(0.0f64, f64::min);
        Self {
            min,
            max: if max == min { min + 1.0 } else { max },
            top,
            bottom,
        }
    }

    fn y(&self, v: f64) -> f32 {
        let t = ((v - self.min) / (self.max - self.min)) as f32;
        self.bottom - t * (self.bottom - self.top)
    }
}

fn draw_axes(img: &mut RgbImage, left: f32, right: f32, top: f32, bottom: f32, zero_y: f32) {
    draw_segment(img, (left, top), (left, bottom), 1.0, AXIS);
    draw_segment(img, (left, zero_y), (right, zero_y), 1.0, AXIS);
}

fn draw_bars(img: &mut RgbImage, values: &[f64], colors: &[Rgb<u8>]) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let (left, right) = (PLOT_PADDING, w - PLOT_PADDING);
    let (top, bottom) = (PLOT_PADDING, h - PLOT_PADDING);
    let scale = ValueScale::new(values, top, bottom);
    let zero_y = scale.y(0.0);
    draw_axes(img, left, right, top, bottom, zero_y);

    let slot = (right - left) / values.len().max(1) as f32;
    let bar_w = slot * 0.6;
    for (i, (&v, &color)) in values.iter().zip(colors).enumerate() {
        let x = left + slot * i as f32 + (slot - bar_w) / 2.0;
        fill_rect(img, x, zero_y, x + bar_w, scale.y(v), color);
    }
}

fn draw_line(img: &mut RgbImage, values: &[f64], color: Rgb<u8>) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let (left, right) = (PLOT_PADDING, w - PLOT_PADDING);
    let (top, bottom) = (PLOT_PADDING, h - PLOT_PADDING);
    let scale = ValueScale::new(values, top, bottom);
    draw_axes(img, left, right, top, bottom, scale.y(0.0));

    let step = (right - left) / (values.len().saturating_sub(1)).max(1) as f32;
    let points: Vec<(f32, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (left + step * i as f32, scale.y(v)))
        .collect();
    for pair in points.windows(2) {
        draw_segment(img, pair[0], pair[1], LINE_THICKNESS, color);
    }
    for &(x, y) in &points {
        fill_rect(
            img,
            x - MARKER_RADIUS,
            y - MARKER_RADIUS,
            x + MARKER_RADIUS,
            y + MARKER_RADIUS,
            color,
        );
    }
}

impl ChartRasterizer for BitmapRasterizer {
    fn rasterize(&self, chart: &ChartDescriptor) -> Result<ChartImage, Error> {
        let width = chart.width.unwrap_or(self.width);
        let height = chart.height.unwrap_or(self.height);
        if width == 0 || height == 0 {
            return Err(chart_error(chart, format!("empty canvas {width}x{height}")));
        }
        if chart.labels.len() != chart.values.len() {
            return Err(chart_error(chart, "labels and values differ in length"));
        }
        if let Some(v) = chart.values.iter().find(|v| !v.is_finite()) {
            return Err(chart_error(chart, format!("non-finite value {v}")));
        }
        let colors = series_colors(chart)?;

        let mut img = RgbImage::from_pixel(width, height, WHITE);
        if !chart.values.is_empty() {
            match chart.kind {
                ChartKind::Pie | ChartKind::Doughnut => {
                    if chart.values.iter().any(|v| *v < 0.0) {
                        return Err(chart_error(chart, "negative slice value"));
                    }
                    let hole = if chart.kind == ChartKind::Doughnut {
                        DOUGHNUT_HOLE
                    } else {
                        0.0
                    };
                    draw_pie(&mut img, &chart.values, &colors, hole);
                }
                ChartKind::Bar => draw_bars(&mut img, &chart.values, &colors),
                ChartKind::Line => draw_line(&mut img, &chart.values, colors[0]),
            }
        }

        let mut data = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
            .map_err(|e| chart_error(chart, e.to_string()))?;
        log::debug!(
            "rasterized {:?} chart '{}' {}x{} ({} bytes)",
            chart.kind,
            chart.title,
            width,
            height,
            data.len()
        );

        Ok(ChartImage {
            title: chart.title.clone(),
            data,
            width,
            height,
        })
    }
}
