//! The drawing surface the layout engine drives.
//!
//! A [`PageWriter`] buffers every page it opens so that a finished page can
//! be revisited later; the footer pass depends on this to print the final
//! page count on every page.

pub mod pdf;
pub mod recording;

use serde::Serialize;

use crate::error::Result;
use crate::metrics;
use crate::model::{Align, Color, Font, PageGeometry};

/// Text measurement in points.
pub trait TextMeasurer {
    /// Width of `text` laid out on a single line.
    fn measure_width(&self, text: &str, font: Font, size: f64) -> f64;

    /// Height of `text` when wrapped to `width`.
    fn measure_height(&self, text: &str, width: f64, font: Font, size: f64) -> f64;
}

/// Measurement from the builtin Helvetica width tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMeasurer;

impl TextMeasurer for StandardMeasurer {
    fn measure_width(&self, text: &str, font: Font, size: f64) -> f64 {
        metrics::text_width(text, font, size)
    }

    fn measure_height(&self, text: &str, width: f64, font: Font, size: f64) -> f64 {
        let lines = metrics::wrap_lines(text, width, font, size).len();
        lines as f64 * metrics::line_height(size)
    }
}

/// An axis-aligned rectangle in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How a string is placed inside its text box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextOptions {
    pub font: Font,
    pub size: f64,
    pub color: Color,
    pub width: f64,
    pub align: Align,
    /// Keep to one line and truncate with an ellipsis instead of wrapping.
    pub no_wrap: bool,
    /// Drop wrapped lines that would extend below this height.
    pub max_height: Option<f64>,
}

impl TextOptions {
    pub fn new(font: Font, size: f64, color: Color, width: f64) -> Self {
        Self {
            font,
            size,
            color,
            width,
            align: Align::Left,
            no_wrap: false,
            max_height: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn no_wrap(mut self) -> Self {
        self.no_wrap = true;
        self
    }

    pub fn max_height(mut self, height: f64) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Lines of `text` positioned inside this box.
    pub fn fit(&self, text: &str) -> Vec<metrics::PlacedLine> {
        metrics::fit_lines(
            text,
            self.font,
            self.size,
            self.width,
            self.align,
            self.no_wrap,
            self.max_height,
        )
    }
}

/// Random-access, buffered page output.
///
/// Draw calls apply to the current page: the one most recently opened or
/// revisited. Coordinates are in points from the top-left corner.
pub trait PageWriter: TextMeasurer {
    /// Append a page and make it current. Returns its zero-based index.
    fn open_page(&mut self, geometry: &PageGeometry) -> Result<usize>;

    fn draw_rect(&mut self, rect: Rect, fill: Color) -> Result<()>;

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f64, color: Color)
        -> Result<()>;

    /// Draw `text` inside a box whose top-left corner is at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) -> Result<()>;

    /// Make an already produced page current again.
    fn revisit_page(&mut self, index: usize) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Serialize every buffered page.
    fn finalize(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}
