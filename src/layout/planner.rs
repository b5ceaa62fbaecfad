//! # Pagination
//!
//! Walks the rows in input order and decides where each page ends. Every
//! page starts with a header band; a row that would cross the footer band
//! moves whole to the next page.

use tracing::debug;

use super::{Band, BandKind, BandPainter, Page};
use crate::error::Result;
use crate::model::{PageGeometry, RowRecord};

/// Pages produced so far and the cursor on the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<Page>,
    /// Next free y on the last page.
    pub cursor: u32,
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            cursor: 0,
        }
    }

    /// Open a page, draw its header and move the cursor below it.
    pub fn open_page<P: BandPainter>(
        &mut self,
        geometry: &PageGeometry,
        painter: &mut P,
    ) -> Result<()> {
        let start = painter.begin_page(self.pages.len())?;
        let mut page = Page::new(start.index);
        page.bands.extend(start.preamble);

        painter.header(start.header_y)?;
        page.bands.push(Band::new(
            BandKind::Header,
            start.header_y,
            geometry.header_height,
        ));

        self.pages.push(page);
        self.cursor = start.header_y + geometry.header_height;
        Ok(())
    }

    pub fn current(&self) -> Option<&Page> {
        self.pages.last()
    }

    pub fn current_has_rows(&self) -> bool {
        self.current().is_some_and(Page::has_rows)
    }

    /// Whether the last page holds only a header at the top margin, so a
    /// new page would offer no more room than it has.
    pub fn current_is_fresh(&self, geometry: &PageGeometry) -> bool {
        self.current().is_some_and(|page| {
            page.bands
                .iter()
                .all(|band| band.kind == BandKind::Header && band.y == geometry.margin_top)
        })
    }

    /// Record a band at the cursor and move past it.
    pub fn push_band(&mut self, kind: BandKind, height: u32) -> Option<Band> {
        let band = Band::new(kind, self.cursor, height);
        let page = self.pages.last_mut()?;
        page.bands.push(band);
        self.cursor += height;
        Some(band)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

enum PlannerState {
    AwaitingHeader,
    InPage,
    Done,
}

/// Place every row on a page, opening pages as they fill up.
///
/// Always yields at least one page, even for no rows. Stripe parity passed
/// to the painter is the global row index, so it does not depend on where
/// pages break.
pub fn paginate<P: BandPainter>(
    rows: &[RowRecord],
    geometry: &PageGeometry,
    painter: &mut P,
) -> Result<Pagination> {
    let content_max_y = geometry.content_max_y();
    let row_height = geometry.row_height;

    let mut pagination = Pagination::new();
    let mut next = 0;
    let mut state = PlannerState::AwaitingHeader;

    loop {
        state = match state {
            PlannerState::AwaitingHeader => {
                pagination.open_page(geometry, painter)?;
                PlannerState::InPage
            }
            PlannerState::InPage => match rows.get(next) {
                None => PlannerState::Done,
                Some(row) => {
                    let fits = pagination.cursor + row_height <= content_max_y;
                    // A page holding only its header takes the row regardless,
                    // so an oversized first page cannot loop forever.
                    if !fits && pagination.current_has_rows() {
                        debug!(
                            page = pagination.pages.len(),
                            row = next,
                            cursor = pagination.cursor,
                            "page full"
                        );
                        PlannerState::AwaitingHeader
                    } else {
                        painter.row(next, row, pagination.cursor)?;
                        pagination.push_band(BandKind::Row { index: next }, row_height);
                        next += 1;
                        PlannerState::InPage
                    }
                }
            },
            PlannerState::Done => break,
        };
    }

    Ok(pagination)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::layout::PageStart;

    /// Records calls instead of drawing.
    #[derive(Default)]
    pub(crate) struct FakePainter {
        pub pages: usize,
        pub headers: Vec<(usize, u32)>,
        pub rows: Vec<(usize, usize, u32)>,
        pub totals: Vec<(usize, u32, u32)>,
        pub first_page_offset: u32,
        pub margin_top: u32,
    }

    impl BandPainter for FakePainter {
        fn begin_page(&mut self, page: usize) -> Result<PageStart> {
            self.pages += 1;
            let offset = if page == 0 { self.first_page_offset } else { 0 };
            Ok(PageStart {
                index: page,
                header_y: self.margin_top + offset,
                preamble: None,
            })
        }

        fn header(&mut self, y: u32) -> Result<()> {
            self.headers.push((self.pages - 1, y));
            Ok(())
        }

        fn row(&mut self, index: usize, _row: &RowRecord, y: u32) -> Result<()> {
            self.rows.push((self.pages - 1, index, y));
            Ok(())
        }

        fn total(&mut self, _row: &RowRecord, y: u32, height: u32) -> Result<()> {
            self.totals.push((self.pages - 1, y, height));
            Ok(())
        }
    }

    /// Room for exactly `rows_per_page` rows of 18 under a 22 header.
    pub(crate) fn geometry(rows_per_page: u32) -> PageGeometry {
        let content_max_y = 30 + 22 + rows_per_page * 18;
        PageGeometry {
            width: 595,
            height: content_max_y + 30,
            margin_x: 30,
            margin_top: 30,
            row_height: 18,
            header_height: 22,
            footer_reserved_height: 30,
        }
    }

    fn rows(n: usize) -> Vec<RowRecord> {
        (0..n).map(|i| RowRecord::new([i.to_string()])).collect()
    }

    fn painter() -> FakePainter {
        FakePainter {
            margin_top: 30,
            ..FakePainter::default()
        }
    }

    #[test]
    fn empty_input_yields_one_page_with_a_header() {
        let mut painter = painter();
        let result = paginate(&[], &geometry(10), &mut painter).unwrap();
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].count(BandKind::Header), 1);
        assert!(!result.pages[0].has_rows());
        assert_eq!(result.cursor, 52);
    }

    #[test]
    fn rows_break_exactly_at_capacity() {
        let mut painter = painter();
        let result = paginate(&rows(25), &geometry(10), &mut painter).unwrap();

        let per_page: Vec<usize> = result.pages.iter().map(|p| p.row_indices().len()).collect();
        assert_eq!(per_page, vec![10, 10, 5]);
        assert_eq!(painter.headers, vec![(0, 30), (1, 30), (2, 30)]);
        // Last row of a full page ends right on the content limit.
        assert_eq!(painter.rows[9], (0, 9, 52 + 9 * 18));
        assert_eq!(painter.rows[10], (1, 10, 52));
    }

    #[test]
    fn rows_keep_their_global_index_across_pages() {
        let mut painter = painter();
        let result = paginate(&rows(7), &geometry(3), &mut painter).unwrap();
        let all: Vec<usize> = result.pages.iter().flat_map(Page::row_indices).collect();
        assert_eq!(all, (0..7).collect::<Vec<_>>());
        assert_eq!(result.pages[2].row_indices(), vec![6]);
    }

    #[test]
    fn first_page_offset_reduces_its_capacity() {
        let mut painter = FakePainter {
            first_page_offset: 36,
            ..painter()
        };
        let result = paginate(&rows(12), &geometry(10), &mut painter).unwrap();
        let per_page: Vec<usize> = result.pages.iter().map(|p| p.row_indices().len()).collect();
        assert_eq!(per_page, vec![8, 4]);
    }
}
