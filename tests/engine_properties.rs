use ledger_pdf::layout::footer::page_label;
use ledger_pdf::layout::{total_row_height, AllocatedLayout};
use ledger_pdf::metrics;
use ledger_pdf::report::{Expense, ExpenseReport};
use ledger_pdf::writer::StandardMeasurer;
use ledger_pdf::{
    BandKind, ColumnSpec, Font, Page, PageGeometry, RecordingWriter, ReportDriver, ReportPeriod,
    RowRecord, TableReport, TableStyle,
};

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("index", "#"),
        ColumnSpec::new("item", "Item").stretch(3),
        ColumnSpec::new("note", "Note").stretch(1),
        ColumnSpec::new("amount", "Amount").right(),
    ]
}

fn rows(n: usize) -> Vec<RowRecord> {
    (0..n)
        .map(|i| {
            RowRecord::new([
                (i + 1).to_string(),
                format!("Item number {i}"),
                "x".repeat(i % 7),
                format!("{}.50", i * 3),
            ])
        })
        .collect()
}

/// 720 points between the header and the footer band: 40 rows of 18.
fn forty_rows_per_page() -> PageGeometry {
    PageGeometry {
        margin_top: 70,
        ..PageGeometry::a4_portrait()
    }
}

fn render(report: &TableReport) -> (Vec<Page>, RecordingWriter) {
    let mut writer = RecordingWriter::new();
    let pages = report.render(&mut writer).unwrap();
    (pages, writer)
}

#[test]
fn widths_always_fill_the_available_width() {
    let geometries = [
        PageGeometry::a4_portrait(),
        PageGeometry::a4_landscape(),
        PageGeometry {
            width: 301,
            ..PageGeometry::a4_portrait()
        },
    ];
    for geometry in geometries {
        for n in [0, 1, 17, 200] {
            let report = TableReport::builder()
                .columns(columns())
                .rows(rows(n))
                .geometry(geometry)
                .build()
                .unwrap();
            let layout = report.layout(&StandardMeasurer);
            assert_eq!(layout.table_width(), geometry.available_width());
        }
    }
}

#[test]
fn every_row_lands_on_exactly_one_page_in_order() {
    for n in [0, 1, 39, 40, 41, 123] {
        let report = TableReport::builder()
            .columns(columns())
            .rows(rows(n))
            .geometry(forty_rows_per_page())
            .build()
            .unwrap();
        let (pages, _) = render(&report);

        let drawn: Vec<usize> = pages.iter().flat_map(Page::row_indices).collect();
        assert_eq!(drawn, (0..n).collect::<Vec<_>>(), "{n} rows");
    }
}

#[test]
fn every_page_starts_with_one_header() {
    let report = TableReport::builder()
        .columns(columns())
        .rows(rows(130))
        .geometry(forty_rows_per_page())
        .build()
        .unwrap();
    let (pages, _) = render(&report);

    for page in &pages {
        assert_eq!(page.count(BandKind::Header), 1);
        assert_eq!(page.bands[0].kind, BandKind::Header);
    }
}

#[test]
fn footers_carry_the_true_page_number_and_count() {
    let report = TableReport::builder()
        .columns(columns())
        .rows(rows(95))
        .geometry(forty_rows_per_page())
        .caption("Household Ledger")
        .build()
        .unwrap();
    let (pages, writer) = render(&report);

    let count = pages.len();
    assert_eq!(count, 3);
    for (i, recorded) in writer.pages().iter().enumerate() {
        let label = page_label(i + 1, count);
        assert_eq!(recorded.texts().last(), Some(&label.as_str()));
    }
    for page in &pages {
        let footer = page.footer.expect("footer stamped");
        assert_eq!(footer.y, forty_rows_per_page().content_max_y());
    }
}

#[test]
fn allocation_is_repeatable() {
    let report = TableReport::builder()
        .columns(columns())
        .rows(rows(60))
        .build()
        .unwrap();
    assert_eq!(
        report.layout(&StandardMeasurer),
        report.layout(&StandardMeasurer)
    );
}

#[test]
fn empty_report_is_one_page_with_a_zero_total() {
    let driver = ReportDriver::new(RecordingWriter::new());
    let rendered = driver
        .render(&ExpenseReport::new(ReportPeriod::All), Vec::new())
        .unwrap();

    assert_eq!(rendered.page_count, 1);
    let page = &rendered.pages[0];
    assert!(!page.has_rows());
    assert_eq!(page.count(BandKind::Header), 1);
    assert!(page.total().is_some());

    let recorded: serde_json::Value = serde_json::from_slice(&rendered.bytes).unwrap();
    let texts: Vec<&str> = recorded[0]["ops"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|op| op["text"].as_str())
        .collect();
    assert!(texts.contains(&"GRAND TOTAL"));
    assert!(texts.contains(&"0.00"));
    assert!(texts.contains(&"0"));
}

#[test]
fn five_hundred_rows_fill_thirteen_pages() {
    let report = TableReport::builder()
        .columns(columns())
        .rows(rows(500))
        .total_row(RowRecord::new(["", "TOTAL", "", "1.00"]))
        .geometry(forty_rows_per_page())
        .build()
        .unwrap();
    let (pages, _) = render(&report);

    assert_eq!(pages.len(), 13);
    for page in &pages[..12] {
        assert_eq!(page.row_indices().len(), 40);
    }
    let last = &pages[12];
    assert_eq!(last.row_indices().len(), 20);
    assert!(last.total().is_some());
}

#[test]
fn total_that_does_not_fit_opens_one_more_page() {
    let report = TableReport::builder()
        .columns(columns())
        .rows(rows(80))
        .total_row(RowRecord::new(["", "TOTAL", "", "1.00"]))
        .geometry(forty_rows_per_page())
        .build()
        .unwrap();
    let (pages, _) = render(&report);

    assert_eq!(pages.len(), 3);
    assert!(!pages[2].has_rows());
    assert!(pages[2].total().is_some());
}

#[test]
fn oversized_cell_takes_the_shrink_path() {
    let wide = "Annual maintenance contract ".repeat(40);
    let report = TableReport::builder()
        .columns(columns())
        .rows(vec![RowRecord::new(["1", wide.as_str(), "note", "10.00"])])
        .build()
        .unwrap();
    let layout = report.layout(&StandardMeasurer);

    let available = PageGeometry::a4_portrait().available_width();
    assert!(metrics::text_width(&wide, Font::Regular, 8.0) > available as f64);
    assert_eq!(layout.table_width(), available);
    assert!(layout.widths().iter().all(|w| *w <= available));
    assert!(layout.width(1) > layout.width(2));
}

#[test]
fn wrapped_total_is_sized_to_its_lines() {
    let style = TableStyle::default();
    let layout = AllocatedLayout::new(30, vec![20, 70, 385, 60]);
    let total = RowRecord::new(["", "GRAND TOTAL", "", "1200.00"]);

    let width = (70 - 2 * style.cell_padding) as f64;
    let lines = metrics::wrap_lines("GRAND TOTAL", width, Font::Bold, style.total_size).len();
    assert_eq!(lines, 2);

    let height = total_row_height(&total, &layout, &style, &StandardMeasurer);
    let expected = (lines as f64 * metrics::line_height(style.total_size)
        + 2.0 * style.total_vertical_padding as f64)
        .ceil() as u32;
    assert!(height > style.total_min_height);
    assert_eq!(height, expected);
}

#[test]
fn expense_report_lists_records_by_date() {
    let expense = |date: &str, description: &str| Expense {
        date: date.parse().unwrap(),
        item_type: "Groceries".to_string(),
        item_description: description.to_string(),
        unit: String::new(),
        quantity: 1.0,
        amount: 10.0,
        remarks: String::new(),
    };
    let records = vec![
        expense("2025-03-09", "third"),
        expense("2025-01-02", "first"),
        expense("2025-02-14", "second"),
    ];

    let driver = ReportDriver::new(RecordingWriter::new());
    let table = driver.table(&ExpenseReport::default(), records).unwrap();
    let (_, writer) = render(&table);

    let texts = writer.pages()[0].texts();
    let position = |needle: &str| texts.iter().position(|t| *t == needle).unwrap();
    assert!(position("first") < position("second"));
    assert!(position("second") < position("third"));
    assert!(texts.contains(&"02/01/2025 - 09/03/2025"));
}
