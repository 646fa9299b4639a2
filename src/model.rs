use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::format::format_number;

/// The finished input of a render: everything the layout engine draws.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReportData {
    #[serde(default)]
    pub summary: Vec<Metric>,
    #[serde(default)]
    pub charts: Vec<ChartDescriptor>,
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
    pub metadata: ReportMetadata,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    #[default]
    Number,
    Integer,
    Currency,
    Percent,
}

/// One summary card. Text values are drawn verbatim regardless of `format`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: Cell,
    #[serde(default)]
    pub format: MetricFormat,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<Cell>, format: MetricFormat) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            format,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
    Doughnut,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChartDescriptor {
    #[serde(alias = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Canvas size override in pixels; the render options supply the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A rasterized chart. `data` is a PNG stream; `width`/`height` are its pixel
/// dimensions and are informational only, the chart box has a fixed display size.
#[derive(Clone, Debug)]
pub struct ChartImage {
    pub title: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TableDescriptor {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub report_name: String,
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub filters: BTreeMap<String, serde_json::Value>,
}

impl ReportData {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the structural invariants the layout relies on. Nothing is
    /// written when this fails.
    pub fn validate(&self) -> Result<(), Error> {
        for (ci, chart) in self.charts.iter().enumerate() {
            if chart.labels.len() != chart.values.len() {
                return Err(Error::InvalidInput(format!(
                    "chart {ci} '{}': {} labels but {} values",
                    chart.title,
                    chart.labels.len(),
                    chart.values.len()
                )));
            }
        }
        for (ti, table) in self.tables.iter().enumerate() {
            if table.headers.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "table {ti} '{}' has no headers",
                    table.title
                )));
            }
            if let Some((ri, row)) = table
                .rows
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != table.headers.len())
            {
                return Err(Error::InvalidInput(format!(
                    "table {ti} '{}': row {ri} has {} cells, expected {}",
                    table.title,
                    row.len(),
                    table.headers.len()
                )));
            }
        }
        Ok(())
    }
}
