//! `printpdf` backend for [`PageWriter`].
//!
//! printpdf keeps every page of a document in memory until it is saved,
//! which is what makes revisiting a page for the footer pass possible.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rgb,
};

use super::{PageWriter, Rect, StandardMeasurer, TextMeasurer, TextOptions};
use crate::error::{ReportError, Result};
use crate::model::{Color, Font, PageGeometry};

const LAYER_NAME: &str = "Layer 1";
const MM_PER_PT: f64 = 25.4 / 72.0;

fn mm(pt: f64) -> Mm {
    Mm((pt * MM_PER_PT) as f32)
}

fn pdf_color(color: Color) -> PdfColor {
    let (r, g, b) = color.unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

struct PageHandle {
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    height: f64,
}

/// Writes pages into a buffered printpdf document using the builtin
/// Helvetica faces.
pub struct PdfPageWriter {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    pages: Vec<PageHandle>,
    current: Option<usize>,
    measurer: StandardMeasurer,
}

impl PdfPageWriter {
    pub fn new(title: &str) -> Result<Self> {
        let doc = PdfDocument::empty(title);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::RenderFailed(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::RenderFailed(e.to_string()))?;

        Ok(Self {
            doc,
            regular,
            bold,
            pages: Vec::new(),
            current: None,
            measurer: StandardMeasurer,
        })
    }

    /// The current layer and the height of its page in points.
    fn layer(&self) -> Result<(PdfLayerReference, f64)> {
        let handle = self
            .current
            .and_then(|index| self.pages.get(index))
            .ok_or_else(|| ReportError::RenderFailed("no page is open".to_string()))?;
        let layer = self.doc.get_page(handle.page).get_layer(handle.layer);
        Ok((layer, handle.height))
    }

    fn font(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

impl TextMeasurer for PdfPageWriter {
    fn measure_width(&self, text: &str, font: Font, size: f64) -> f64 {
        self.measurer.measure_width(text, font, size)
    }

    fn measure_height(&self, text: &str, width: f64, font: Font, size: f64) -> f64 {
        self.measurer.measure_height(text, width, font, size)
    }
}

impl PageWriter for PdfPageWriter {
    fn open_page(&mut self, geometry: &PageGeometry) -> Result<usize> {
        let width = geometry.width as f64;
        let height = geometry.height as f64;
        let (page, layer) = self.doc.add_page(mm(width), mm(height), LAYER_NAME);
        self.pages.push(PageHandle {
            page,
            layer,
            height,
        });
        let index = self.pages.len() - 1;
        self.current = Some(index);
        Ok(index)
    }

    fn draw_rect(&mut self, rect: Rect, fill: Color) -> Result<()> {
        let (layer, page_height) = self.layer()?;
        let top = page_height - rect.y;
        let bottom = top - rect.height;
        let right = rect.x + rect.width;

        layer.set_fill_color(pdf_color(fill));
        layer.add_polygon(Polygon {
            rings: vec![vec![
                (Point::new(mm(rect.x), mm(bottom)), false),
                (Point::new(mm(right), mm(bottom)), false),
                (Point::new(mm(right), mm(top)), false),
                (Point::new(mm(rect.x), mm(top)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
        color: Color,
    ) -> Result<()> {
        let (layer, page_height) = self.layer()?;
        layer.set_outline_color(pdf_color(color));
        layer.set_outline_thickness(thickness as f32);
        layer.add_line(Line {
            points: vec![
                (Point::new(mm(from.0), mm(page_height - from.1)), false),
                (Point::new(mm(to.0), mm(page_height - to.1)), false),
            ],
            is_closed: false,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) -> Result<()> {
        let (layer, page_height) = self.layer()?;
        let font = self.font(options.font);

        layer.set_fill_color(pdf_color(options.color));
        for line in options.fit(text) {
            layer.use_text(
                line.text,
                options.size as f32,
                mm(x + line.dx),
                mm(page_height - (y + line.baseline)),
                font,
            );
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
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::RenderFailed(e.to_string()))
    }
}
