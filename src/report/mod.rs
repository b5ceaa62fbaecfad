//! # Report drivers
//!
//! A report is a [`ReportDefinition`]: which columns it shows, how one
//! domain record becomes a row, what its total row says and how it looks.
//! [`ReportDriver`] turns a definition plus its records into a finished
//! document through the generic table engine.

pub mod expense;
pub mod format;
pub mod income;
pub mod period;
pub mod summary;

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;
use crate::layout::{RenderedReport, TableReport, TableStyle, TitleBlock};
use crate::model::{ColumnSpec, PageGeometry, RowRecord};
use crate::writer::PageWriter;

pub use expense::{Expense, ExpenseReport};
pub use income::{Income, IncomeReport};
pub use period::ReportPeriod;
pub use summary::{
    CategoryBreakdownReport, CategorySummary, MonthSummary, YearlySummaryReport,
};

/// Default currency label in amount column headers.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Everything that distinguishes one tabular report from another.
pub trait ReportDefinition {
    type Record;

    fn title(&self) -> String;

    fn columns(&self) -> Vec<ColumnSpec>;

    fn geometry(&self) -> PageGeometry;

    fn style(&self) -> TableStyle;

    /// Whether a record belongs in this report.
    fn includes(&self, _record: &Self::Record) -> bool {
        true
    }

    /// Row order; reports list records by their date or period ascending.
    fn compare(&self, a: &Self::Record, b: &Self::Record) -> Ordering;

    /// Project one record; `index` is its zero-based position in the report.
    fn to_row(&self, index: usize, record: &Self::Record) -> RowRecord;

    fn total_row(&self, records: &[Self::Record]) -> RowRecord;

    /// Printed under the title; empty to omit.
    fn period_label(&self, _records: &[Self::Record]) -> String {
        String::new()
    }
}

/// Renders report definitions into one page writer.
pub struct ReportDriver<W: PageWriter> {
    writer: W,
    caption: String,
    generated_at: Option<NaiveDateTime>,
    reference: Option<String>,
}

impl<W: PageWriter> ReportDriver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            caption: String::new(),
            generated_at: None,
            reference: None,
        }
    }

    /// Static text printed at the left of every footer.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Short identifier printed next to the generation time.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    fn meta_line(&self) -> Option<String> {
        let generated = self
            .generated_at
            .map(|at| format!("Generated: {}", format::format_timestamp(&at)));
        let reference = self.reference.as_ref().map(|r| format!("Ref: {r}"));
        match (generated, reference) {
            (Some(g), Some(r)) => Some(format!("{g}  |  {r}")),
            (g, r) => g.or(r),
        }
    }

    /// Filter, sort and project `records` into a ready-to-render table.
    pub fn table<R: ReportDefinition>(
        &self,
        report: &R,
        records: Vec<R::Record>,
    ) -> Result<TableReport> {
        let mut records: Vec<R::Record> = records
            .into_iter()
            .filter(|record| report.includes(record))
            .collect();
        records.sort_by(|a, b| report.compare(a, b));
        debug!(records = records.len(), title = %report.title(), "projecting report rows");

        let rows = records
            .iter()
            .enumerate()
            .map(|(i, record)| report.to_row(i, record))
            .collect();

        let mut title = TitleBlock::new(report.title()).period(report.period_label(&records));
        if let Some(meta) = self.meta_line() {
            title = title.meta(meta);
        }

        TableReport::builder()
            .columns(report.columns())
            .rows(rows)
            .total_row(report.total_row(&records))
            .geometry(report.geometry())
            .style(report.style())
            .title(title)
            .caption(self.caption.clone())
            .build()
    }

    pub fn render<R: ReportDefinition>(
        self,
        report: &R,
        records: Vec<R::Record>,
    ) -> Result<RenderedReport> {
        let table = self.table(report, records)?;
        table.render_document(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::recording::RecordingWriter;
    use chrono::NaiveDate;

    #[test]
    fn meta_line_joins_time_and_reference() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let driver = ReportDriver::new(RecordingWriter::new())
            .generated_at(at)
            .reference("AB12CD34");
        assert_eq!(
            driver.meta_line().as_deref(),
            Some("Generated: 01/03/2025 09:05:00  |  Ref: AB12CD34")
        );

        let bare = ReportDriver::new(RecordingWriter::new());
        assert_eq!(bare.meta_line(), None);
    }
}
