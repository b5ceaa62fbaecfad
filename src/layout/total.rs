//! # Total Row
//!
//! The aggregate row closing a table. Unlike body rows it may wrap, so its
//! height comes from its content rather than from the page geometry.

use tracing::debug;

use super::{AllocatedLayout, Band, BandKind, BandPainter, Pagination, TableStyle};
use crate::error::Result;
use crate::model::{Font, PageGeometry, RowRecord};
use crate::writer::TextMeasurer;

/// Height that shows every non-empty total cell without truncation,
/// never less than the style's minimum.
pub fn total_row_height<M: TextMeasurer + ?Sized>(
    total: &RowRecord,
    layout: &AllocatedLayout,
    style: &TableStyle,
    measurer: &M,
) -> u32 {
    let padding = 2 * style.cell_padding;
    let tallest = total
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(i, cell)| {
            let width = layout.width(i).saturating_sub(padding) as f64;
            measurer.measure_height(cell, width, Font::Bold, style.total_size)
        })
        .fold(0.0, f64::max);

    let height = (tallest + 2.0 * style.total_vertical_padding as f64).ceil() as u32;
    height.max(style.total_min_height)
}

/// Draw the total row below the last body row, opening a new page first
/// when it does not fit.
///
/// The total row needs no body row above it: after a title block or on a
/// full page it moves on whenever a continuation page has more room. Only
/// on a page that starts at the top margin with nothing but its header is a
/// total row taller than the space left clipped, dropping the lines that
/// overflow.
pub fn place_total_row<P: BandPainter>(
    total: &RowRecord,
    height: u32,
    geometry: &PageGeometry,
    pagination: &mut Pagination,
    painter: &mut P,
) -> Result<Band> {
    let content_max_y = geometry.content_max_y();

    let fits = pagination.cursor + height <= content_max_y;
    if pagination.pages.is_empty() || (!fits && !pagination.current_is_fresh(geometry)) {
        debug!(
            cursor = pagination.cursor,
            height, "total row moves to a new page"
        );
        pagination.open_page(geometry, painter)?;
    }

    let space = content_max_y.saturating_sub(pagination.cursor);
    let height = height.min(space);

    painter.total(total, pagination.cursor, height)?;
    let band = Band::new(BandKind::Total, pagination.cursor, height);
    pagination.push_band(BandKind::Total, height);
    Ok(band)
}
