#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, TimeZone, Utc};
use report_pdf::pdf::Page;
use report_pdf::{
    Cell, ChartDescriptor, ChartImage, ChartKind, Margins, Metric, MetricFormat, Orientation,
    PageGeometry, PageSize, ReportData, ReportMetadata, TableDescriptor,
};

pub const GENERATED_STAMP: &str = "Generated: 2024-03-15 14:30:00 UTC";

/// Output directory: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    PathBuf::from("tests/output").join(case)
}

pub fn metadata() -> ReportMetadata {
    ReportMetadata {
        report_name: "Quarterly Portfolio Review".into(),
        report_type: "Project Status".into(),
        generated_at: Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap(),
        generated_by: None,
        project_name: None,
        date_range: None,
        filters: Default::default(),
    }
}

/// Ten cards in the usual dashboard order; index 7 is "Completion Rate".
pub fn summary() -> Vec<Metric> {
    vec![
        Metric::new("Total Projects", 12i64, MetricFormat::Integer),
        Metric::new("Active Projects", 9i64, MetricFormat::Integer),
        Metric::new("Total Activities", 148i64, MetricFormat::Integer),
        Metric::new("Completed Activities", 96i64, MetricFormat::Integer),
        Metric::new("Total Budget", 1_250_000.0, MetricFormat::Currency),
        Metric::new("Total Spent", 812_345.5, MetricFormat::Currency),
        Metric::new("Budget Variance", -37_500.0, MetricFormat::Currency),
        Metric::new("Completion Rate", 64.8648, MetricFormat::Percent),
        Metric::new("Open Requests", 23i64, MetricFormat::Integer),
        Metric::new("Health Score", 87.5, MetricFormat::Number),
    ]
}

pub fn report(charts: Vec<ChartDescriptor>, tables: Vec<TableDescriptor>) -> ReportData {
    ReportData {
        summary: summary(),
        charts,
        tables,
        metadata: metadata(),
    }
}

pub fn status_chart() -> ChartDescriptor {
    ChartDescriptor {
        kind: ChartKind::Pie,
        title: "Activity Status".into(),
        labels: vec![
            "Completed".into(),
            "In Progress".into(),
            "Delayed".into(),
            "Not Started".into(),
        ],
        values: vec![20.0, 15.0, 5.0, 10.0],
        colors: None,
        width: None,
        height: None,
    }
}

pub fn bar_chart(title: &str) -> ChartDescriptor {
    ChartDescriptor {
        kind: ChartKind::Bar,
        title: title.into(),
        labels: vec!["Q1".into(), "Q2".into(), "Q3".into()],
        values: vec![120.0, 80.0, 150.0],
        colors: None,
        width: None,
        height: None,
    }
}

/// Stand-in for a rasterized chart; layout never decodes it.
pub fn placeholder_image(title: &str) -> ChartImage {
    ChartImage {
        title: title.into(),
        data: Vec::new(),
        width: 800,
        height: 400,
    }
}

pub fn placeholder_images(charts: &[ChartDescriptor]) -> Vec<ChartImage> {
    charts.iter().map(|c| placeholder_image(&c.title)).collect()
}

/// Rows read "<prefix> 00", "<prefix> 01", ... in the first column.
pub fn task_table(title: &str, prefix: &str, rows: usize) -> TableDescriptor {
    TableDescriptor {
        title: title.into(),
        headers: vec!["Activity".into(), "Owner".into(), "Progress".into()],
        rows: (0..rows)
            .map(|i| {
                vec![
                    Cell::Text(format!("{prefix} {i:02}")),
                    Cell::Text("Operations".into()),
                    Cell::Number((i * 5) as f64),
                ]
            })
            .collect(),
    }
}

pub fn a4() -> PageGeometry {
    PageGeometry::new(PageSize::A4, Orientation::Portrait, Margins::default()).unwrap()
}

/// A4-wide page whose height is chosen by the test.
pub fn page_with_height(height: f32) -> PageGeometry {
    PageGeometry::new(
        PageSize::Custom {
            width: 595.28,
            height,
        },
        Orientation::Portrait,
        Margins::default(),
    )
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn text_pos(page: &Page, needle: &str) -> Option<(f32, f32)> {
    page.text_position(needle)
}

/// Index of the page carrying the text `needle`.
pub fn page_of(pages: &[Page], needle: &str) -> Option<usize> {
    pages.iter().position(|p| p.contains_text(needle))
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}
