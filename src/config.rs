use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_MARGIN: f32 = 50.0;
pub const DEFAULT_CHART_WIDTH: u32 = 800;
pub const DEFAULT_CHART_HEIGHT: u32 = 400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    /// Portrait width and height in points.
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Portrait (width, height) in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

impl FromStr for PageSize {
    type Err = Error;

    /// Accepts `a4`, `letter`, `legal` or `<width>x<height>` in points.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => {
                let parsed = other.split_once('x').and_then(|(w, h)| {
                    Some((w.trim().parse::<f32>().ok()?, h.trim().parse::<f32>().ok()?))
                });
                match parsed {
                    Some((width, height)) => Ok(PageSize::Custom { width, height }),
                    None => Err(Error::Geometry(format!("unknown page size '{s}'"))),
                }
            }
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => f.write_str("A4"),
            PageSize::Letter => f.write_str("Letter"),
            PageSize::Legal => f.write_str("Legal"),
            PageSize::Custom { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(Error::Geometry(format!("unknown orientation '{s}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(m: f32) -> Self {
        Self {
            top: m,
            bottom: m,
            left: m,
            right: m,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

/// Everything about a render that is not report content.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    /// Default rasterization canvas in pixels, overridable per chart.
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }
}
