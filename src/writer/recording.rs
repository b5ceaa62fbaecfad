//! An in-memory page writer that records draw operations instead of
//! producing a PDF. Used for dry runs and for inspecting layouts in tests.

use serde::Serialize;

use super::{PageWriter, Rect, StandardMeasurer, TextMeasurer, TextOptions};
use crate::error::{ReportError, Result};
use crate::model::{Color, Font, PageGeometry};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Rect {
        rect: Rect,
        fill: Color,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
        color: Color,
    },
    /// One fitted line of text; `y` is the baseline.
    Text {
        text: String,
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPage {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    /// Every text fragment on the page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingWriter {
    measurer: StandardMeasurer,
    pages: Vec<RecordedPage>,
    current: Option<usize>,
    op_limit: Option<usize>,
    op_count: usize,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every draw call after `limit` operations, the way a writer
    /// that runs out of resources would.
    pub fn with_op_limit(limit: usize) -> Self {
        Self {
            op_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    fn push(&mut self, op: DrawOp) -> Result<()> {
        if let Some(limit) = self.op_limit {
            if self.op_count >= limit {
                return Err(ReportError::RenderFailed(format!(
                    "draw operation limit of {limit} reached"
                )));
            }
        }
        let index = self
            .current
            .ok_or_else(|| ReportError::RenderFailed("no page is open".to_string()))?;
        self.pages[index].ops.push(op);
        self.op_count += 1;
        Ok(())
    }
}

impl TextMeasurer for RecordingWriter {
    fn measure_width(&self, text: &str, font: Font, size: f64) -> f64 {
        self.measurer.measure_width(text, font, size)
    }

    fn measure_height(&self, text: &str, width: f64, font: Font, size: f64) -> f64 {
        self.measurer.measure_height(text, width, font, size)
    }
}

impl PageWriter for RecordingWriter {
    fn open_page(&mut self, geometry: &PageGeometry) -> Result<usize> {
        self.pages.push(RecordedPage {
            width: geometry.width,
            height: geometry.height,
            ops: Vec::new(),
        });
        let index = self.pages.len() - 1;
        self.current = Some(index);
        Ok(index)
    }

    fn draw_rect(&mut self, rect: Rect, fill: Color) -> Result<()> {
        self.push(DrawOp::Rect { rect, fill })
    }

    fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
        color: Color,
    ) -> Result<()> {
        self.push(DrawOp::Line {
            from,
            to,
            thickness,
            color,
        })
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) -> Result<()> {
        for line in options.fit(text) {
            self.push(DrawOp::Text {
                text: line.text,
                x: x + line.dx,
                y: y + line.baseline,
                font: options.font,
                size: options.size,
                color: options.color,
            })?;
        }
        Ok(())
    }

    fn revisit_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(ReportError::RenderFailed(format!(
                "page {index} does not exist ({} pages)",
                self.pages.len()
            )));
        }
        self.current = Some(index);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finalize(self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.pages)
            .map_err(|e| ReportError::RenderFailed(e.to_string()))
    }
}
