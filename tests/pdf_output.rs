mod common;

use healthreport_pdf::{
    Error, PageGeometry, StatusStyleMap, paginate, render_report, stamp_footers, write_pdf,
    write_report_file,
};

fn count_subslices(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| w == &needle).count()
}

#[test]
fn artifact_is_a_pdf_with_one_media_box_per_page() {
    let doc = common::document(vec![common::entry_with_rows(7)]);
    let geo = common::five_row_geometry();
    let styles = StatusStyleMap::default();

    let mut pages = paginate(&doc, &geo, &styles).unwrap();
    let n = pages.len();
    stamp_footers(&mut pages, &geo);
    let bytes = write_pdf(&pages, &geo, None);

    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(count_subslices(&bytes, b"/MediaBox"), n);
}

#[test]
fn rendering_twice_yields_identical_bytes() {
    let doc = common::document(vec![common::entry_with_rows(9), common::entry_with_rows(3)]);
    let geo = common::five_row_geometry();
    let a = render_report(&doc, &geo).unwrap();
    let b = render_report(&doc, &geo).unwrap();
    assert_eq!(a, b);
}

#[test]
fn failed_render_writes_no_partial_file() {
    let geo = PageGeometry {
        margin_top: 500.0,
        margin_bottom: 400.0,
        ..PageGeometry::a4()
    };
    let doc = common::document(vec![common::entry_with_rows(2)]);
    let path = std::env::temp_dir().join("healthreport-geometry-failure.pdf");
    let _ = std::fs::remove_file(&path);

    match write_report_file(&doc, &geo, &path) {
        Err(Error::Geometry(_)) => {}
        other => panic!("expected geometry error, got {other:?}"),
    }
    assert!(!path.exists(), "no artifact may exist after a failed render");
}

#[test]
fn undecodable_logo_degrades_to_a_logo_free_document() {
    let mut doc = common::document(vec![common::entry_with_rows(2)]);
    doc.logo = Some(healthreport_pdf::Logo {
        data: b"not a png".to_vec(),
        pixel_width: 10,
        pixel_height: 10,
        display_width: 28.0,
        display_height: 28.0,
    });
    let bytes = render_report(&doc, &PageGeometry::a4()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}
