use crate::fonts::{ASCENDER_RATIO, FontFace, text_width};
use crate::geometry::PageCursor;

pub type Rgb = [u8; 3];

pub(super) const BLACK: Rgb = [0, 0, 0];
pub(super) const WHITE: Rgb = [255, 255, 255];
pub(super) const MUTED: Rgb = [102, 102, 102];
pub(super) const RULE: Rgb = [204, 204, 204];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct TextStyle {
    pub(super) face: FontFace,
    pub(super) size: f32,
    pub(super) color: Rgb,
}

impl TextStyle {
    pub(super) const fn new(face: FontFace, size: f32, color: Rgb) -> Self {
        Self { face, size, color }
    }

    pub(super) fn width(&self, text: &str) -> f32 {
        text_width(self.face, text, self.size)
    }
}

/// Axis-aligned box, `y` measured down from the top of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y <= self.y + self.height
    }
}

/// One drawing instruction. All vertical positions are offsets from the top
/// edge of the page.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        baseline: f32,
        size: f32,
        face: FontFace,
        color: Rgb,
        clip: Option<Area>,
    },
    Rect {
        area: Area,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    /// `image` indexes the chart images of the layout.
    Image { image: usize, area: Area },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// (x, baseline) of the first text op reading exactly `needle`.
    pub fn text_position(&self, needle: &str) -> Option<(f32, f32)> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, x, baseline, .. } if text == needle => Some((*x, *baseline)),
            _ => None,
        })
    }

    /// Fill colour of the topmost filled rectangle under the text `needle`.
    pub fn fill_behind(&self, needle: &str) -> Option<Rgb> {
        let (tx, ty) = self.text_position(needle)?;
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Rect {
                area,
                fill: Some(fill),
                ..
            } if area.contains_y(ty) && tx >= area.x && tx <= area.x + area.width => Some(*fill),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }
}

/// Pages under construction. Every primitive takes the cursor whose page it
/// draws on; pages are created on first use.
#[derive(Debug)]
pub(super) struct Canvas {
    pages: Vec<Page>,
}

impl Canvas {
    pub(super) fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    fn page(&mut self, cursor: &PageCursor) -> &mut Page {
        if self.pages.len() <= cursor.page_index {
            self.pages.resize_with(cursor.page_index + 1, Page::default);
        }
        &mut self.pages[cursor.page_index]
    }

    pub(super) fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text whose line box starts at `top`.
    pub(super) fn text(
        &mut self,
        cursor: &PageCursor,
        style: TextStyle,
        x: f32,
        top: f32,
        text: &str,
    ) {
        self.push_text(cursor, style, x, top, text, None);
    }

    /// Text cut off at the edges of `clip`.
    pub(super) fn clipped_text(
        &mut self,
        cursor: &PageCursor,
        style: TextStyle,
        x: f32,
        top: f32,
        text: &str,
        clip: Area,
    ) {
        self.push_text(cursor, style, x, top, text, Some(clip));
    }

    fn push_text(
        &mut self,
        cursor: &PageCursor,
        style: TextStyle,
        x: f32,
        top: f32,
        text: &str,
        clip: Option<Area>,
    ) {
        if text.is_empty() {
            return;
        }
        self.page(cursor).ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            baseline: top + style.size * ASCENDER_RATIO,
            size: style.size,
            face: style.face,
            color: style.color,
            clip,
        });
    }

    pub(super) fn rect(
        &mut self,
        cursor: &PageCursor,
        area: Area,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) {
        self.page(cursor).ops.push(DrawOp::Rect { area, fill, stroke });
    }

    pub(super) fn hline(
        &mut self,
        cursor: &PageCursor,
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    ) {
        self.page(cursor).ops.push(DrawOp::Line {
            from: (x1, y),
            to: (x2, y),
            width,
            color,
        });
    }

    pub(super) fn image(&mut self, cursor: &PageCursor, image: usize, area: Area) {
        self.page(cursor).ops.push(DrawOp::Image { image, area });
    }

    pub(super) fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
