//! # Column Width Allocation
//!
//! Widths are measured from the full data set before the first page is
//! drawn, so every header, body and total band on every page lines up.
//! The result always spans exactly the width between the page margins.

use serde::Serialize;
use tracing::debug;

use super::TableStyle;
use crate::model::{ColumnSpec, Font, PageGeometry, RowRecord};
use crate::writer::TextMeasurer;

/// Final integer width of every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedLayout {
    origin_x: u32,
    widths: Vec<u32>,
}

impl AllocatedLayout {
    pub fn new(origin_x: u32, widths: Vec<u32>) -> Self {
        Self { origin_x, widths }
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn width(&self, column: usize) -> u32 {
        self.widths.get(column).copied().unwrap_or(0)
    }

    /// Left edge of `column` on the page.
    pub fn column_x(&self, column: usize) -> u32 {
        self.origin_x + self.widths.iter().take(column).sum::<u32>()
    }

    pub fn table_width(&self) -> u32 {
        self.widths.iter().sum()
    }
}

/// Compute the width of every column from its header, its body cells and
/// its total cell, each measured in the style it is drawn with.
pub fn allocate<M: TextMeasurer + ?Sized>(
    columns: &[ColumnSpec],
    rows: &[RowRecord],
    total: &RowRecord,
    geometry: &PageGeometry,
    style: &TableStyle,
    measurer: &M,
) -> AllocatedLayout {
    let padding = 2 * style.cell_padding;

    let minimums: Vec<u32> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let header = measurer.measure_width(&column.header, Font::Bold, style.header_size);
            let body = rows
                .iter()
                .map(|row| measurer.measure_width(row.cell(i), Font::Regular, style.body_size))
                .fold(0.0, f64::max);
            let total = measurer.measure_width(total.cell(i), Font::Bold, style.total_size);

            let content = header.max(body).max(total).ceil() as u32;
            (content + padding).max(column.min_width)
        })
        .collect();

    let available = geometry.available_width();
    let widths = distribute(columns, &minimums, available);
    debug!(?minimums, ?widths, available, "allocated column widths");

    AllocatedLayout::new(geometry.margin_x, widths)
}

/// Fit per-column minimums to exactly `available` points.
pub fn distribute(columns: &[ColumnSpec], minimums: &[u32], available: u32) -> Vec<u32> {
    let raw: u64 = minimums.iter().map(|&w| w as u64).sum();
    let available_wide = available as u64;

    if raw > available_wide {
        shrink(minimums, raw, available)
    } else if raw < available_wide {
        grow(columns, minimums, available - raw as u32)
    } else {
        minimums.to_vec()
    }
}

/// Scale every column down proportionally; the last column takes what
/// flooring leaves over.
fn shrink(minimums: &[u32], raw: u64, available: u32) -> Vec<u32> {
    let mut widths: Vec<u32> = minimums
        .iter()
        .map(|&w| (w as u64 * available as u64 / raw) as u32)
        .collect();

    let used: u32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += available - used;
    }
    widths
}

/// Hand the slack to stretch columns by weight, or evenly to every column
/// when none is flagged. The last receiving column takes the rounding drift.
fn grow(columns: &[ColumnSpec], minimums: &[u32], slack: u32) -> Vec<u32> {
    let any_stretch = columns.iter().any(ColumnSpec::is_stretch);
    let weights: Vec<u64> = columns
        .iter()
        .map(|c| if any_stretch { c.stretch as u64 } else { 1 })
        .collect();
    let total_weight: u64 = weights.iter().sum();

    let mut widths = minimums.to_vec();
    if total_weight == 0 {
        return widths;
    }

    let mut given = 0u32;
    for (width, &weight) in widths.iter_mut().zip(&weights) {
        let share = (slack as u64 * weight / total_weight) as u32;
        *width += share;
        given += share;
    }

    if let Some(last) = weights.iter().rposition(|&w| w > 0) {
        widths[last] += slack - given;
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::StandardMeasurer;

    fn geometry(width: u32) -> PageGeometry {
        PageGeometry {
            width,
            margin_x: 30,
            ..PageGeometry::a4_portrait()
        }
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("no", "#"),
            ColumnSpec::new("description", "Description").stretch(60),
            ColumnSpec::new("remarks", "Remarks").stretch(40),
            ColumnSpec::new("amount", "Amount").right(),
        ]
    }

    #[test]
    fn grow_splits_slack_by_weight() {
        let widths = distribute(&columns(), &[20, 50, 50, 40], 260);
        // 100 points of slack, 60/40.
        assert_eq!(widths, vec![20, 110, 90, 40]);
    }

    #[test]
    fn grow_without_stretch_columns_is_even() {
        let plain = vec![ColumnSpec::new("a", "A"), ColumnSpec::new("b", "B"), ColumnSpec::new("c", "C")];
        let widths = distribute(&plain, &[10, 10, 10], 40);
        assert_eq!(widths, vec![13, 13, 14]);
    }

    #[test]
    fn grow_puts_rounding_drift_on_the_last_stretch_column() {
        let cols = vec![
            ColumnSpec::new("a", "A").stretch(1),
            ColumnSpec::new("b", "B").stretch(1),
            ColumnSpec::new("c", "C"),
        ];
        let widths = distribute(&cols, &[10, 10, 10], 35);
        assert_eq!(widths, vec![12, 13, 10]);
    }

    #[test]
    fn shrink_scales_and_keeps_the_sum() {
        let widths = distribute(&columns(), &[100, 200, 300, 400], 333);
        assert_eq!(widths.iter().sum::<u32>(), 333);
        assert_eq!(&widths[..3], &[33, 66, 99]);
    }

    #[test]
    fn exact_fit_keeps_minimums() {
        assert_eq!(distribute(&columns(), &[10, 20, 30, 40], 100), vec![10, 20, 30, 40]);
    }

    #[test]
    fn widths_span_the_page_between_margins() {
        let rows = vec![
            RowRecord::new(["1", "Rice", "", "120.00"]),
            RowRecord::new(["2", "Cooking oil", "monthly stock", "1450.50"]),
        ];
        let total = RowRecord::new(["", "GRAND TOTAL", "", "1570.50"]);
        let layout = allocate(
            &columns(),
            &rows,
            &total,
            &geometry(595),
            &TableStyle::default(),
            &StandardMeasurer,
        );
        assert_eq!(layout.table_width(), 535);
        assert_eq!(layout.column_x(0), 30);
        assert_eq!(layout.column_x(1), 30 + layout.width(0));
    }

    #[test]
    fn min_width_wins_over_narrow_content() {
        let cols = vec![ColumnSpec::new("a", "A").min_width(80), ColumnSpec::new("b", "B")];
        let layout = allocate(
            &cols,
            &[],
            &RowRecord::blank(2),
            &geometry(60 + 80 + 13),
            &TableStyle::default(),
            &StandardMeasurer,
        );
        // "B" in bold 9pt rounds up to 7pt, plus 6 of padding.
        assert_eq!(layout.widths(), &[80, 13]);
    }

    #[test]
    fn allocation_is_repeatable() {
        let rows = vec![RowRecord::new(["1", "Tea", "", "5.00"])];
        let total = RowRecord::new(["", "TOTAL", "", "5.00"]);
        let style = TableStyle::default();
        let first = allocate(&columns(), &rows, &total, &geometry(595), &style, &StandardMeasurer);
        let second = allocate(&columns(), &rows, &total, &geometry(595), &style, &StandardMeasurer);
        assert_eq!(first, second);
    }
}
