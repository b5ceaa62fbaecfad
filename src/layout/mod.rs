//! # Table layout
//!
//! One generic engine for every tabular report: widths are allocated once
//! from the whole data set, rows flow into pages under a repeating header,
//! a content-sized total row closes the table, and a final pass stamps
//! "Page i of N" footers once N is known.
//!
//! ```text
//! rows ─→ [allocator] ─→ [planner] ─→ [total] ─→ [footer]
//!           widths        pages        last band   second pass
//! ```

pub mod allocator;
pub mod footer;
pub mod planner;
pub mod total;

use serde::Serialize;
use tracing::info;

pub use allocator::{allocate, AllocatedLayout};
pub use footer::stamp_footers;
pub use planner::{paginate, Pagination};
pub use total::{place_total_row, total_row_height};

use crate::error::{ReportError, Result};
use crate::metrics;
use crate::model::{Align, Color, ColumnSpec, Font, PageGeometry, RowRecord};
use crate::writer::{PageWriter, Rect, TextMeasurer, TextOptions};

/// What a band on a page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandKind {
    Title,
    Header,
    /// A body row, identified by its position in the input sequence.
    Row { index: usize },
    Total,
    Footer,
}

/// A horizontal strip of a page, spanning the table width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    #[serde(flatten)]
    pub kind: BandKind,
    pub y: u32,
    pub height: u32,
}

impl Band {
    pub fn new(kind: BandKind, y: u32, height: u32) -> Self {
        Self { kind, y, height }
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// The bands placed on one page, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Index of the page in the writer.
    pub index: usize,
    pub bands: Vec<Band>,
    /// Filled by the footer pass.
    pub footer: Option<Band>,
}

impl Page {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            bands: Vec::new(),
            footer: None,
        }
    }

    /// Input indices of the body rows on this page.
    pub fn row_indices(&self) -> Vec<usize> {
        self.bands
            .iter()
            .filter_map(|band| match band.kind {
                BandKind::Row { index } => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn has_rows(&self) -> bool {
        self.bands
            .iter()
            .any(|band| matches!(band.kind, BandKind::Row { .. }))
    }

    pub fn count(&self, kind: BandKind) -> usize {
        self.bands.iter().filter(|band| band.kind == kind).count()
    }

    pub fn total(&self) -> Option<&Band> {
        self.bands.iter().find(|band| band.kind == BandKind::Total)
    }
}

/// Fonts, paddings and colours of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub cell_padding: u32,
    pub header_size: f64,
    pub body_size: f64,
    pub total_size: f64,
    pub footer_size: f64,
    pub title_size: f64,
    pub period_size: f64,
    pub meta_size: f64,

    pub primary: Color,
    pub header_text: Color,
    pub stripe: Color,
    pub body_text: Color,
    pub row_rule: Color,
    pub total_fill: Color,
    pub total_rule: Color,
    pub meta_text: Color,
    pub footer_text: Color,
    pub footer_rule: Color,

    pub total_min_height: u32,
    pub total_vertical_padding: u32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            cell_padding: 3,
            header_size: 9.0,
            body_size: 8.0,
            total_size: 10.0,
            footer_size: 7.5,
            title_size: 18.0,
            period_size: 11.0,
            meta_size: 9.0,

            primary: Color::rgb(0x1a, 0x36, 0x5d),
            header_text: Color::WHITE,
            stripe: Color::rgb(0xf7, 0xfa, 0xfc),
            body_text: Color::rgb(0x2d, 0x37, 0x48),
            row_rule: Color::rgb(0xe2, 0xe8, 0xf0),
            total_fill: Color::rgb(0xeb, 0xf8, 0xff),
            total_rule: Color::rgb(0x2b, 0x6c, 0xb0),
            meta_text: Color::rgb(0x55, 0x55, 0x55),
            footer_text: Color::rgb(0x77, 0x77, 0x77),
            footer_rule: Color::rgb(0xcb, 0xd5, 0xe0),

            total_min_height: 26,
            total_vertical_padding: 7,
        }
    }
}

impl TableStyle {
    /// The default style recoloured around one accent colour.
    pub fn themed(primary: Color, stripe: Color, total_fill: Color, total_rule: Color) -> Self {
        Self {
            primary,
            stripe,
            total_fill,
            total_rule,
            ..Self::default()
        }
    }
}

const TITLE_HEIGHT: u32 = 26;
const PERIOD_HEIGHT: u32 = 18;
const META_HEIGHT: u32 = 20;

/// Title, period and generation line drawn above the first header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleBlock {
    pub title: String,
    pub period: Option<String>,
    pub meta: Option<String>,
}

impl TitleBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            period: None,
            meta: None,
        }
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        let period = period.into();
        self.period = (!period.is_empty()).then_some(period);
        self
    }

    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn height(&self) -> u32 {
        TITLE_HEIGHT
            + self.period.as_ref().map_or(0, |_| PERIOD_HEIGHT)
            + self.meta.as_ref().map_or(0, |_| META_HEIGHT)
    }
}

/// Where a freshly opened page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStart {
    pub index: usize,
    pub header_y: u32,
    /// Band drawn above the header, if any.
    pub preamble: Option<Band>,
}

/// Draws the bands the planner and the total-row sizer decide on.
pub trait BandPainter {
    fn begin_page(&mut self, page: usize) -> Result<PageStart>;

    fn header(&mut self, y: u32) -> Result<()>;

    /// `index` is the row's position in the whole input, not on the page.
    fn row(&mut self, index: usize, row: &RowRecord, y: u32) -> Result<()>;

    fn total(&mut self, row: &RowRecord, y: u32, height: u32) -> Result<()>;
}

/// [`BandPainter`] that draws through a [`PageWriter`].
pub struct WriterPainter<'a, W: PageWriter> {
    pub writer: &'a mut W,
    pub columns: &'a [ColumnSpec],
    pub layout: &'a AllocatedLayout,
    pub geometry: &'a PageGeometry,
    pub style: &'a TableStyle,
    pub title: Option<&'a TitleBlock>,
}

impl<W: PageWriter> WriterPainter<'_, W> {
    /// Top offset that centres one line of `size` in a band of `height`.
    fn text_top(y: u32, height: u32, size: f64) -> f64 {
        y as f64 + (height as f64 - metrics::line_height(size)).max(0.0) / 2.0
    }

    fn cells(
        &mut self,
        row: &RowRecord,
        top: f64,
        template: TextOptions,
    ) -> Result<()> {
        let pad = self.style.cell_padding;
        for (i, column) in self.columns.iter().enumerate() {
            let text = row.cell(i);
            if text.is_empty() {
                continue;
            }
            let width = self.layout.width(i).saturating_sub(2 * pad) as f64;
            let x = (self.layout.column_x(i) + pad) as f64;
            let options = TextOptions {
                width,
                align: column.align,
                ..template
            };
            self.writer.draw_text(text, x, top, &options)?;
        }
        Ok(())
    }

    fn draw_title(&mut self, title: &TitleBlock) -> Result<u32> {
        let x = self.geometry.margin_x as f64;
        let width = self.layout.table_width() as f64;
        let style = self.style;
        let mut y = self.geometry.margin_top;

        let options = TextOptions::new(Font::Bold, style.title_size, style.primary, width)
            .align(Align::Center)
            .no_wrap();
        self.writer.draw_text(&title.title, x, y as f64, &options)?;
        y += TITLE_HEIGHT;

        if let Some(period) = &title.period {
            let options = TextOptions::new(Font::Bold, style.period_size, style.primary, width)
                .align(Align::Center)
                .no_wrap();
            self.writer.draw_text(period, x, y as f64, &options)?;
            y += PERIOD_HEIGHT;
        }

        if let Some(meta) = &title.meta {
            let options = TextOptions::new(Font::Regular, style.meta_size, style.meta_text, width)
                .align(Align::Center)
                .no_wrap();
            self.writer.draw_text(meta, x, y as f64, &options)?;
            y += META_HEIGHT;
        }

        Ok(y)
    }
}

impl<W: PageWriter> BandPainter for WriterPainter<'_, W> {
    fn begin_page(&mut self, page: usize) -> Result<PageStart> {
        let index = self.writer.open_page(self.geometry)?;
        let top = self.geometry.margin_top;

        match self.title {
            Some(title) if page == 0 => {
                let header_y = self.draw_title(title)?;
                Ok(PageStart {
                    index,
                    header_y,
                    preamble: Some(Band::new(BandKind::Title, top, header_y - top)),
                })
            }
            _ => Ok(PageStart {
                index,
                header_y: top,
                preamble: None,
            }),
        }
    }

    fn header(&mut self, y: u32) -> Result<()> {
        let height = self.geometry.header_height;
        let x = self.geometry.margin_x as f64;
        let width = self.layout.table_width() as f64;
        self.writer.draw_rect(
            Rect::new(x, y as f64, width, height as f64),
            self.style.primary,
        )?;

        let header = RowRecord::new(self.columns.iter().map(|c| c.header.as_str()));
        let size = self.style.header_size;
        let template = TextOptions::new(Font::Bold, size, self.style.header_text, 0.0).no_wrap();
        self.cells(&header, Self::text_top(y, height, size), template)
    }

    fn row(&mut self, index: usize, row: &RowRecord, y: u32) -> Result<()> {
        let height = self.geometry.row_height;
        let x = self.geometry.margin_x as f64;
        let width = self.layout.table_width() as f64;
        let fill = if index % 2 == 0 {
            self.style.stripe
        } else {
            Color::WHITE
        };
        self.writer
            .draw_rect(Rect::new(x, y as f64, width, height as f64), fill)?;

        let size = self.style.body_size;
        let template = TextOptions::new(Font::Regular, size, self.style.body_text, 0.0).no_wrap();
        self.cells(row, Self::text_top(y, height, size), template)?;

        let bottom = (y + height) as f64;
        self.writer
            .draw_line((x, bottom), (x + width, bottom), 0.5, self.style.row_rule)
    }

    fn total(&mut self, row: &RowRecord, y: u32, height: u32) -> Result<()> {
        let x = self.geometry.margin_x as f64;
        let width = self.layout.table_width() as f64;
        let top = y as f64;
        self.writer
            .draw_rect(Rect::new(x, top, width, height as f64), self.style.total_fill)?;
        self.writer
            .draw_line((x, top), (x + width, top), 1.5, self.style.total_rule)?;

        let padding = self.style.total_vertical_padding;
        let text_height = height.saturating_sub(2 * padding) as f64;
        let template =
            TextOptions::new(Font::Bold, self.style.total_size, self.style.primary, 0.0)
                .max_height(text_height);
        self.cells(row, top + padding as f64, template)
    }
}

/// Serialized output of one report.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub pages: Vec<Page>,
}

/// A fully configured table, ready to be laid out.
#[derive(Debug, Clone)]
pub struct TableReport {
    columns: Vec<ColumnSpec>,
    rows: Vec<RowRecord>,
    total: RowRecord,
    geometry: PageGeometry,
    style: TableStyle,
    title: Option<TitleBlock>,
    caption: String,
}

impl TableReport {
    pub fn builder() -> TableReportBuilder {
        TableReportBuilder::default()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Column widths this table will be drawn with.
    pub fn layout<M: TextMeasurer + ?Sized>(&self, measurer: &M) -> AllocatedLayout {
        allocate(
            &self.columns,
            &self.rows,
            &self.total,
            &self.geometry,
            &self.style,
            measurer,
        )
    }

    /// Lay out and draw every page, footers included, into `writer`.
    pub fn render<W: PageWriter>(&self, writer: &mut W) -> Result<Vec<Page>> {
        let layout = self.layout(&*writer);
        let total_height = total_row_height(&self.total, &layout, &self.style, &*writer);

        let mut painter = WriterPainter {
            writer: &mut *writer,
            columns: &self.columns,
            layout: &layout,
            geometry: &self.geometry,
            style: &self.style,
            title: self.title.as_ref(),
        };
        let mut pagination = paginate(&self.rows, &self.geometry, &mut painter)?;
        place_total_row(
            &self.total,
            total_height,
            &self.geometry,
            &mut pagination,
            &mut painter,
        )?;

        let mut pages = pagination.pages;
        stamp_footers(writer, &mut pages, &self.geometry, &self.style, &self.caption)?;

        info!(
            rows = self.rows.len(),
            pages = pages.len(),
            "laid out report"
        );
        Ok(pages)
    }

    /// Render into `writer` and serialize the finished document.
    pub fn render_document<W: PageWriter>(&self, mut writer: W) -> Result<RenderedReport> {
        let pages = self.render(&mut writer)?;
        let page_count = writer.page_count();
        if page_count != pages.len() {
            return Err(ReportError::RenderFailed(format!(
                "writer holds {page_count} pages but the layout placed {}",
                pages.len()
            )));
        }
        let bytes = writer.finalize()?;
        Ok(RenderedReport {
            bytes,
            page_count,
            pages,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableReportBuilder {
    columns: Vec<ColumnSpec>,
    rows: Vec<RowRecord>,
    total: Option<RowRecord>,
    geometry: Option<PageGeometry>,
    style: TableStyle,
    title: Option<TitleBlock>,
    caption: String,
}

impl TableReportBuilder {
    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    pub fn rows(mut self, rows: Vec<RowRecord>) -> Self {
        self.rows = rows;
        self
    }

    pub fn total_row(mut self, total: RowRecord) -> Self {
        self.total = Some(total);
        self
    }

    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn title(mut self, title: TitleBlock) -> Self {
        self.title = Some(title);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn build(self) -> Result<TableReport> {
        if self.columns.is_empty() {
            return Err(ReportError::InvalidLayoutConfig(
                "a report needs at least one column".to_string(),
            ));
        }
        let geometry = self.geometry.unwrap_or_else(PageGeometry::a4_portrait);
        geometry.validate()?;

        let width = self.columns.len();
        if let Some(i) = self.rows.iter().position(|row| row.len() != width) {
            return Err(ReportError::InvalidLayoutConfig(format!(
                "row {i} has {} cells but the report has {width} columns",
                self.rows[i].len()
            )));
        }
        let total = self.total.unwrap_or_else(|| RowRecord::blank(width));
        if total.len() != width {
            return Err(ReportError::InvalidLayoutConfig(format!(
                "total row has {} cells but the report has {width} columns",
                total.len()
            )));
        }

        if let Some(title) = &self.title {
            let first_row_end = geometry.margin_top
                + title.height()
                + geometry.header_height
                + geometry.row_height;
            if first_row_end > geometry.content_max_y() {
                return Err(ReportError::InvalidLayoutConfig(format!(
                    "title block ({}) leaves no room for a row on the first page",
                    title.height()
                )));
            }
        }

        Ok(TableReport {
            columns: self.columns,
            rows: self.rows,
            total,
            geometry,
            style: self.style,
            title: self.title,
            caption: self.caption,
        })
    }
}
