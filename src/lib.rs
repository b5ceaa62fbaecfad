//! # ledger-pdf
//!
//! Paginated PDF reports for a household ledger: expense and income
//! listings, a yearly income/expense summary and a breakdown by item type.
//!
//! Every report goes through one table engine ([`layout`]) that sizes
//! columns from the data, flows rows onto pages under a repeating header,
//! closes the table with a total row and stamps "Page i of N" footers.
//! Drawing happens behind the [`writer::PageWriter`] trait, implemented by
//! a `printpdf` backend and by an in-memory recorder.

pub mod error;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod report;
pub mod writer;

pub use error::{ReportError, Result};
pub use layout::{Band, BandKind, Page, RenderedReport, TableReport, TableStyle, TitleBlock};
pub use model::{Align, Color, ColumnSpec, Font, PageGeometry, RowRecord};
pub use report::{ReportDefinition, ReportDriver, ReportPeriod};
pub use writer::pdf::PdfPageWriter;
pub use writer::recording::RecordingWriter;
pub use writer::{PageWriter, TextMeasurer};
