//! Page geometry and the vertical write cursor.
//!
//! Offsets are measured downwards from the top edge of the page; the PDF
//! serializer flips them into the bottom-up PDF coordinate space.

use crate::config::{Margins, Orientation, PageSize, RenderOptions};
use crate::error::Error;
use crate::pdf::{CHART_BLOCK_HEIGHT, ROW_HEIGHT, TABLE_HEAD_HEIGHT};

/// Vertical space the report header needs on the first page.
pub const HEADER_MIN_HEIGHT: f32 = 79.0;
/// Distance from the bottom edge the footer occupies; the bottom margin may not be smaller.
pub const FOOTER_RESERVE: f32 = 45.0;

/// Tallest block that is never split across pages: a chart with its title,
/// or a table title, header band and first row.
pub fn min_block_height() -> f32 {
    CHART_BLOCK_HEIGHT.max(TABLE_HEAD_HEIGHT + ROW_HEIGHT)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

/// Current page and vertical offset of the next thing to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageCursor {
    pub page_index: usize,
    pub offset: f32,
}

impl PageGeometry {
    pub fn new(size: PageSize, orientation: Orientation, margins: Margins) -> Result<Self, Error> {
        let (w, h) = size.dimensions();
        let (width, height) = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        let geometry = Self {
            width,
            height,
            margins,
        };
        geometry.check()?;
        Ok(geometry)
    }

    pub fn from_options(options: &RenderOptions) -> Result<Self, Error> {
        Self::new(options.page_size, options.orientation, options.margins)
    }

    fn check(&self) -> Result<(), Error> {
        let m = &self.margins;
        if !(self.width.is_finite() && self.height.is_finite())
            || [m.top, m.bottom, m.left, m.right]
                .iter()
                .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::Geometry(format!(
                "invalid page {}x{} with margins {m:?}",
                self.width, self.height
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::Geometry(format!(
                "page width {} leaves no room between margins {} and {}",
                self.width, m.left, m.right
            )));
        }
        if self.usable_height() <= HEADER_MIN_HEIGHT {
            return Err(Error::Geometry(format!(
                "usable height {:.1} cannot hold the report header ({HEADER_MIN_HEIGHT})",
                self.usable_height()
            )));
        }
        if self.usable_height() < min_block_height() {
            return Err(Error::Geometry(format!(
                "usable height {:.1} cannot hold an unsplittable block ({:.1})",
                self.usable_height(),
                min_block_height()
            )));
        }
        if m.bottom < FOOTER_RESERVE {
            return Err(Error::Geometry(format!(
                "bottom margin {} is smaller than the footer ({FOOTER_RESERVE})",
                m.bottom
            )));
        }
        Ok(())
    }

    pub fn usable_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn left(&self) -> f32 {
        self.margins.left
    }

    pub fn right(&self) -> f32 {
        self.width - self.margins.right
    }

    /// Lowest offset content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn start_cursor(&self) -> PageCursor {
        PageCursor {
            page_index: 0,
            offset: self.margins.top,
        }
    }

    pub fn remaining(&self, cursor: &PageCursor) -> f32 {
        self.bottom_limit() - cursor.offset
    }

    pub fn break_page(&self, cursor: &mut PageCursor) {
        cursor.page_index += 1;
        cursor.offset = self.margins.top;
        log::debug!("page break -> page {}", cursor.page_index + 1);
    }

    /// Start a new page unless `needed` fits below the cursor. Returns whether
    /// a break happened.
    pub fn ensure_space(&self, cursor: &mut PageCursor, needed: f32) -> bool {
        if self.remaining(cursor) < needed {
            self.break_page(cursor);
            true
        } else {
            false
        }
    }
}
