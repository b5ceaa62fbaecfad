//! Plain data shared by every stage of the layout engine.
//!
//! All geometry is measured in integer PDF points with the origin in the
//! top-left corner of the page and y growing downwards.

use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::layout::footer::MIN_FOOTER_HEIGHT;

/// A4 page edges in points.
pub const A4_SHORT_EDGE: u32 = 595;
pub const A4_LONG_EDGE: u32 = 842;

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Font identities understood by every page writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    Regular,
    Bold,
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

/// One column of a tabular report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub align: Align,
    pub min_width: u32,
    /// Share of leftover horizontal space this column absorbs; 0 opts out.
    pub stretch: u32,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            align: Align::Left,
            min_width: 0,
            stretch: 0,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn right(self) -> Self {
        self.align(Align::Right)
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn stretch(mut self, weight: u32) -> Self {
        self.stretch = weight;
        self
    }

    pub fn is_stretch(&self) -> bool {
        self.stretch > 0
    }
}

/// A row projected to display strings, one per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowRecord {
    pub cells: Vec<String>,
}

impl RowRecord {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// A row with `len` empty cells.
    pub fn blank(len: usize) -> Self {
        Self {
            cells: vec![String::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `index`, or `""` when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Page size and the fixed band heights of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_x: u32,
    /// Where the header band of a continuation page starts.
    pub margin_top: u32,
    pub row_height: u32,
    pub header_height: u32,
    pub footer_reserved_height: u32,
}

impl PageGeometry {
    pub fn a4_portrait() -> Self {
        Self {
            width: A4_SHORT_EDGE,
            height: A4_LONG_EDGE,
            margin_x: 30,
            margin_top: 30,
            row_height: 18,
            header_height: 22,
            footer_reserved_height: 30,
        }
    }

    pub fn a4_landscape() -> Self {
        Self {
            width: A4_LONG_EDGE,
            height: A4_SHORT_EDGE,
            ..Self::a4_portrait()
        }
    }

    /// Width between the horizontal margins.
    pub fn available_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.margin_x)
    }

    /// Lowest y at which a band may end without entering the footer band.
    pub fn content_max_y(&self) -> u32 {
        self.height.saturating_sub(self.footer_reserved_height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_height == 0 {
            return Err(ReportError::InvalidLayoutConfig(
                "row height must be positive".to_string(),
            ));
        }
        if self.header_height == 0 {
            return Err(ReportError::InvalidLayoutConfig(
                "header height must be positive".to_string(),
            ));
        }
        if self.footer_reserved_height >= self.height {
            return Err(ReportError::InvalidLayoutConfig(format!(
                "footer band ({}) leaves no room on a page of height {}",
                self.footer_reserved_height, self.height
            )));
        }
        if self.footer_reserved_height < MIN_FOOTER_HEIGHT {
            return Err(ReportError::InvalidLayoutConfig(format!(
                "footer band ({}) is shorter than the {MIN_FOOTER_HEIGHT} points its rule and text need",
                self.footer_reserved_height
            )));
        }
        let first_row_end = self.margin_top + self.header_height + self.row_height;
        if first_row_end > self.content_max_y() {
            return Err(ReportError::InvalidLayoutConfig(format!(
                "header ({}) and one row ({}) do not fit between y={} and y={}",
                self.header_height,
                self.row_height,
                self.margin_top,
                self.content_max_y()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(PageGeometry::a4_portrait().validate().is_ok());
        assert!(PageGeometry::a4_landscape().validate().is_ok());
        assert_eq!(PageGeometry::a4_landscape().available_width(), 782);
    }

    #[test]
    fn zero_row_height_is_rejected() {
        let geometry = PageGeometry {
            row_height: 0,
            ..PageGeometry::a4_portrait()
        };
        assert!(matches!(
            geometry.validate(),
            Err(ReportError::InvalidLayoutConfig(_))
        ));
    }

    #[test]
    fn header_that_leaves_no_room_for_a_row_is_rejected() {
        let geometry = PageGeometry {
            height: 100,
            margin_top: 30,
            header_height: 22,
            row_height: 18,
            footer_reserved_height: 40,
            ..PageGeometry::a4_portrait()
        };
        assert!(geometry.validate().is_err());

        let tight = PageGeometry {
            footer_reserved_height: 30,
            ..geometry
        };
        assert!(tight.validate().is_ok());
    }

    #[test]
    fn footer_band_too_short_for_the_footer_is_rejected() {
        let geometry = PageGeometry {
            footer_reserved_height: 4,
            ..PageGeometry::a4_portrait()
        };
        assert!(matches!(
            geometry.validate(),
            Err(ReportError::InvalidLayoutConfig(_))
        ));

        let minimal = PageGeometry {
            footer_reserved_height: MIN_FOOTER_HEIGHT,
            ..geometry
        };
        assert!(minimal.validate().is_ok());
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let row = RowRecord::new(["a"]);
        assert_eq!(row.cell(0), "a");
        assert_eq!(row.cell(3), "");
    }
}
