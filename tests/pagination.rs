mod common;

use healthreport_pdf::{
    DrawOp, Error, PageGeometry, ReportEntry, StatusStyleMap, paginate, stamp_footers,
};

fn texts_containing<'a>(page: &'a healthreport_pdf::Page, needle: &str) -> Vec<&'a str> {
    page.texts()
        .into_iter()
        .filter(|t| t.contains(needle))
        .collect()
}

#[test]
fn seven_rows_break_onto_two_pages_with_redrawn_table_header() {
    let doc = common::document(vec![common::entry_with_rows(7)]);
    let geo = common::five_row_geometry();
    let styles = StatusStyleMap::default();

    let mut pages = paginate(&doc, &geo, &styles).unwrap();
    assert_eq!(pages.len(), 2);

    // Page 1 carries the first five rows
    assert!(!texts_containing(&pages[0], "Hemoglobin").is_empty());
    assert!(!texts_containing(&pages[0], "Creatinine").is_empty());
    assert!(texts_containing(&pages[0], "WBC").is_empty());

    // Page 2 re-opens with the page header, then the table header, before
    // the remaining rows
    let texts = pages[1].texts();
    assert_eq!(texts[0], "Personal Health Report");
    assert!(texts.iter().any(|t| t.contains("(continued)")));
    let header_pos = texts.iter().position(|t| *t == "Parameter").unwrap();
    let row_pos = texts.iter().position(|t| *t == "WBC").unwrap();
    assert!(header_pos < row_pos, "table header must precede continued rows");
    assert!(!texts_containing(&pages[1], "Platelets").is_empty());

    stamp_footers(&mut pages, &geo);
    assert!(!texts_containing(&pages[0], "Page 1 of 2").is_empty());
    assert!(!texts_containing(&pages[1], "Page 2 of 2").is_empty());
}

#[test]
fn empty_document_still_renders_one_full_page() {
    let doc = common::document(vec![]);
    let geo = PageGeometry::a4();
    let mut pages = paginate(&doc, &geo, &StatusStyleMap::default()).unwrap();
    assert_eq!(pages.len(), 1);

    let page = &pages[0];
    assert!(!texts_containing(page, "Personal Health Report").is_empty());
    assert!(!texts_containing(page, "Jane Doe").is_empty());
    assert!(!texts_containing(page, "Recommendations & Disclaimer").is_empty());

    stamp_footers(&mut pages, &geo);
    assert!(!texts_containing(&pages[0], "Page 1 of 1").is_empty());
}

#[test]
fn entry_without_results_draws_explicit_no_data_line() {
    let entry = ReportEntry {
        results: vec![],
        ..common::entry_with_rows(0)
    };
    let doc = common::document(vec![entry]);
    let pages = paginate(&doc, &PageGeometry::a4(), &StatusStyleMap::default()).unwrap();
    assert!(!texts_containing(&pages[0], "No data extracted").is_empty());
    assert!(!texts_containing(&pages[0], "Entry recorded").is_empty());
}

#[test]
fn body_content_stays_above_the_footer_reserve() {
    let doc = common::document(vec![
        common::entry_with_rows(7),
        common::entry_with_rows(4),
        common::entry_with_rows(9),
    ]);
    let geo = common::five_row_geometry();
    let pages = paginate(&doc, &geo, &StatusStyleMap::default()).unwrap();
    assert!(pages.len() > 2);

    let floor = geo.margin_bottom + geo.footer_reserve;
    for (i, page) in pages.iter().enumerate() {
        for op in &page.ops {
            let bottom = match op {
                DrawOp::Rect { y, .. } => *y,
                DrawOp::Line { y1, y2, .. } => y1.min(*y2),
                DrawOp::Text { y, .. } => *y,
                DrawOp::Image { y, .. } => *y,
            };
            assert!(
                bottom >= floor - 0.5,
                "page {i}: op bottom {bottom:.1} below floor {floor:.1}: {op:?}"
            );
        }
    }
}

#[test]
fn footer_total_matches_produced_page_count() {
    let doc = common::document(vec![common::entry_with_rows(9), common::entry_with_rows(9)]);
    let geo = common::five_row_geometry();
    let mut pages = paginate(&doc, &geo, &StatusStyleMap::default()).unwrap();
    let n = pages.len();
    stamp_footers(&mut pages, &geo);

    for (i, page) in pages.iter().enumerate() {
        let label = format!("Page {} of {n}", i + 1);
        assert!(
            !texts_containing(page, &label).is_empty(),
            "page {i} missing footer {label:?}"
        );
    }
}

#[test]
fn layout_is_idempotent() {
    let doc = common::document(vec![common::entry_with_rows(7), common::entry_with_rows(2)]);
    let geo = common::five_row_geometry();
    let styles = StatusStyleMap::default();

    let a = paginate(&doc, &geo, &styles).unwrap();
    let b = paginate(&doc, &geo, &styles).unwrap();
    assert_eq!(a.len(), b.len());
    for (pa, pb) in a.iter().zip(b.iter()) {
        assert_eq!(pa.ops, pb.ops);
    }
}

#[test]
fn narrative_text_flows_across_pages() {
    let mut entry = common::entry_with_rows(2);
    entry.notes = Some("lorem ipsum measurement context ".repeat(60));
    let doc = common::document(vec![entry]);
    let geo = common::five_row_geometry();
    let pages = paginate(&doc, &geo, &StatusStyleMap::default()).unwrap();
    assert!(pages.len() >= 2);
    // Every page re-opens with the running header
    for page in &pages {
        assert_eq!(page.texts()[0], "Personal Health Report");
    }
}

#[test]
fn oversized_row_terminates_with_clamping() {
    // Row height exceeds the usable page height; layout must still finish.
    let geo = PageGeometry {
        page_width: 400.0,
        page_height: 200.0,
        margin_top: 40.0,
        margin_bottom: 30.0,
        margin_left: 30.0,
        margin_right: 30.0,
        row_height: 150.0,
        footer_reserve: 30.0,
    };
    let doc = common::document(vec![common::entry_with_rows(3)]);
    let pages = paginate(&doc, &geo, &StatusStyleMap::default()).unwrap();
    assert!(pages.len() >= 3, "each clamped row needs its own page");
    assert!(pages.len() <= 10, "clamping must not spin out extra pages");
}

#[test]
fn unusable_geometry_is_rejected() {
    let geo = PageGeometry {
        margin_top: 500.0,
        margin_bottom: 400.0,
        ..PageGeometry::a4()
    };
    let doc = common::document(vec![common::entry_with_rows(1)]);
    match paginate(&doc, &geo, &StatusStyleMap::default()) {
        Err(Error::Geometry(_)) => {}
        other => panic!("expected geometry error, got {other:?}"),
    }
}
