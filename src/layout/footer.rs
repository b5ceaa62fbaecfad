//! # Footer Stamping
//!
//! "Page i of N" needs N, which is only known once every page exists, so
//! footers are drawn in a second pass that revisits each buffered page.

use super::{Band, BandKind, Page, TableStyle};
use crate::error::Result;
use crate::model::{Align, Font, PageGeometry};
use crate::writer::{PageWriter, TextOptions};

/// Distance of the footer text line from the bottom edge.
const FOOTER_TEXT_OFFSET: u32 = 16;
/// Gap between the separator rule and the footer text.
const RULE_GAP: u32 = 5;
/// Smallest footer band that keeps the rule and the text below the content.
pub const MIN_FOOTER_HEIGHT: u32 = FOOTER_TEXT_OFFSET + RULE_GAP;
/// Share of the table width given to the caption.
const CAPTION_SHARE: f64 = 0.6;

pub fn page_label(number: usize, count: usize) -> String {
    format!("Page {number} of {count}")
}

/// Draw the separator, the caption and "Page i of N" on every page.
pub fn stamp_footers<W: PageWriter>(
    writer: &mut W,
    pages: &mut [Page],
    geometry: &PageGeometry,
    style: &TableStyle,
    caption: &str,
) -> Result<()> {
    let count = pages.len();
    let x = geometry.margin_x as f64;
    let width = geometry.available_width() as f64;
    let text_y = geometry.height.saturating_sub(FOOTER_TEXT_OFFSET);
    let rule_y = text_y.saturating_sub(RULE_GAP) as f64;

    let caption_options = TextOptions::new(
        Font::Regular,
        style.footer_size,
        style.footer_text,
        width * CAPTION_SHARE,
    )
    .no_wrap();
    let label_options = TextOptions::new(Font::Regular, style.footer_size, style.footer_text, width)
        .align(Align::Right)
        .no_wrap();

    for (i, page) in pages.iter_mut().enumerate() {
        writer.revisit_page(page.index)?;
        writer.draw_line((x, rule_y), (x + width, rule_y), 0.5, style.footer_rule)?;
        if !caption.is_empty() {
            writer.draw_text(caption, x, text_y as f64, &caption_options)?;
        }
        writer.draw_text(&page_label(i + 1, count), x, text_y as f64, &label_options)?;

        let reserved = geometry.footer_reserved_height;
        page.footer = Some(Band::new(
            BandKind::Footer,
            geometry.content_max_y(),
            reserved,
        ));
    }

    Ok(())
}
