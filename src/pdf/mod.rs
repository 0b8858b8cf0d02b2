mod layout;
mod table;

pub use layout::{DrawOp, Page};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{Font, text_width, to_winansi_bytes};
use crate::model::{Logo, PageGeometry, ReportDocument, ReportEntry};
use crate::style::StatusStyleMap;

use layout::{PageCursor, wrap_text};
use table::{draw_row, draw_table_header, fit_columns};

const ASCENT: f32 = 0.75;
const TITLE_SIZE: f32 = 16.0;
const SECTION_SIZE: f32 = 10.5;
const BODY_SIZE: f32 = 9.5;
const LABEL_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 8.0;
const BODY_LINE_H: f32 = 13.0;

const RULE_COLOR: [u8; 3] = [68, 84, 106];
const SECTION_FILL: [u8; 3] = [237, 240, 244];
const MUTED: [u8; 3] = [100, 100, 100];

const FOOTER_BRAND: &str = "HealthReport - Confidential";
const DISCLAIMER: &str = "This report is generated automatically from self-recorded \
measurements. Classification bands are indicative reference intervals, not a diagnosis. \
Values outside the reference range should be reviewed with a qualified clinician before \
any treatment decision. Keep this document confidential.";

/// Fixed page-header height: title line, subject line, rule, padding.
const HEADER_H: f32 = TITLE_SIZE * ASCENT + 13.0 + 8.0 + 10.0;

/// Body pass: walk the document and emit positioned draw operations, one
/// `Page` per physical page. Footers are not drawn here; the total page
/// count is unknown until this pass finishes.
pub fn paginate(
    doc: &ReportDocument,
    geo: &PageGeometry,
    styles: &StatusStyleMap,
) -> Result<Vec<Page>, Error> {
    if geo.text_width() <= 0.0 {
        return Err(Error::Geometry(format!(
            "margins leave no horizontal space on a {:.0}pt wide page",
            geo.page_width
        )));
    }
    if geo.usable_height() <= 0.0 {
        return Err(Error::Geometry(format!(
            "margins and footer reserve leave no vertical space on a {:.0}pt tall page",
            geo.page_height
        )));
    }
    if geo.row_height <= 0.0 {
        return Err(Error::Geometry("row height must be positive".to_string()));
    }

    let t0 = std::time::Instant::now();
    let mut cursor = PageCursor::new(geo);

    draw_page_header(&mut cursor, doc, geo);
    draw_metadata(&mut cursor, doc, geo);

    for entry in &doc.entries {
        cursor.gap(14.0);

        // Keep the section header attached to at least the table header and
        // one row (or the no-data line) across breaks.
        let keep_h = geo.row_height * if entry.results.is_empty() { 2.0 } else { 3.0 };
        if cursor.ensure_room(keep_h) {
            draw_page_header(&mut cursor, doc, geo);
        }

        draw_section_header(&mut cursor, entry, styles, geo);

        if entry.results.is_empty() {
            draw_no_data_line(&mut cursor, geo);
        } else {
            let widths = fit_columns(&entry.results, geo);
            draw_table_header(&mut cursor, geo, &widths);
            for result in &entry.results {
                if cursor.ensure_room(geo.row_height) {
                    // Interrupted mid-table: the continued table must stay
                    // self-describing on the new page.
                    draw_page_header(&mut cursor, doc, geo);
                    draw_continuation_line(&mut cursor, geo);
                    draw_table_header(&mut cursor, geo, &widths);
                }
                draw_row(&mut cursor, geo, result, styles, &widths);
            }
        }
        cursor.section_title = None;

        for (label, text) in [
            ("Analysis", entry.analysis.as_deref()),
            ("Suggestion", entry.suggestion.as_deref()),
            ("Notes", entry.notes.as_deref()),
        ] {
            if let Some(text) = text {
                draw_narrative(&mut cursor, doc, geo, label, text);
            }
        }
    }

    draw_disclaimer(&mut cursor, doc, geo);

    let pages = cursor.finish();
    log::debug!(
        "body pass: {} entries → {} pages in {:.1}ms",
        doc.entries.len(),
        pages.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(pages)
}

/// Second pass: now that N is known, stamp "Page i of N" and the product
/// line into every page's footer reserve.
pub fn stamp_footers(pages: &mut [Page], geo: &PageGeometry) {
    let n = pages.len();
    let rule_y = geo.margin_bottom + FOOTER_SIZE + 5.0;
    let baseline = geo.margin_bottom;

    for (i, page) in pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Line {
            x1: geo.margin_left,
            y1: rule_y,
            x2: geo.margin_left + geo.text_width(),
            y2: rule_y,
            width: 0.5,
            color: RULE_COLOR,
        });
        page.ops.push(DrawOp::Text {
            x: geo.margin_left,
            y: baseline,
            text: FOOTER_BRAND.to_string(),
            size: FOOTER_SIZE,
            bold: false,
            color: MUTED,
        });
        let label = format!("Page {} of {}", i + 1, n);
        let w = text_width(Font::Helvetica, &label, FOOTER_SIZE);
        page.ops.push(DrawOp::Text {
            x: geo.margin_left + geo.text_width() - w,
            y: baseline,
            text: label,
            size: FOOTER_SIZE,
            bold: false,
            color: MUTED,
        });
    }
}

fn draw_page_header(cursor: &mut PageCursor, doc: &ReportDocument, geo: &PageGeometry) {
    let top = cursor.slot_top();
    let title_baseline = top - TITLE_SIZE * ASCENT;

    cursor.push(DrawOp::Text {
        x: geo.margin_left,
        y: title_baseline,
        text: "Personal Health Report".to_string(),
        size: TITLE_SIZE,
        bold: true,
        color: [0, 0, 0],
    });

    if let Some(logo) = &doc.logo {
        cursor.push(DrawOp::Image {
            x: geo.margin_left + geo.text_width() - logo.display_width,
            y: top - logo.display_height,
            w: logo.display_width,
            h: logo.display_height,
        });
    }

    let subject_baseline = title_baseline - 13.0;
    cursor.push(DrawOp::Text {
        x: geo.margin_left,
        y: subject_baseline,
        text: format!("Subject: {} ({})", doc.subject_name, doc.subject_id),
        size: LABEL_SIZE,
        bold: false,
        color: MUTED,
    });

    let rule_y = subject_baseline - 8.0;
    cursor.push(DrawOp::Line {
        x1: geo.margin_left,
        y1: rule_y,
        x2: geo.margin_left + geo.text_width(),
        y2: rule_y,
        width: 1.0,
        color: RULE_COLOR,
    });

    cursor.advance(HEADER_H);
}

/// Subject and report metadata in two columns, first page only.
fn draw_metadata(cursor: &mut PageCursor, doc: &ReportDocument, geo: &PageGeometry) {
    let col2_x = geo.margin_left + geo.text_width() / 2.0;
    let left: [(&str, String); 2] = [
        ("Subject", doc.subject_name.clone()),
        ("Subject ID", doc.subject_id.clone()),
    ];
    let right: [(&str, String); 2] = [
        (
            "Generated",
            doc.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        ("Entries", doc.entries.len().to_string()),
    ];

    let mut baseline = cursor.slot_top() - LABEL_SIZE * ASCENT;
    for ((l_label, l_value), (r_label, r_value)) in left.iter().zip(right.iter()) {
        for (x, label, value) in [
            (geo.margin_left, l_label, l_value),
            (col2_x, r_label, r_value),
        ] {
            cursor.push(DrawOp::Text {
                x,
                y: baseline,
                text: format!("{label}:"),
                size: LABEL_SIZE,
                bold: true,
                color: [0, 0, 0],
            });
            cursor.push(DrawOp::Text {
                x: x + 64.0,
                y: baseline,
                text: value.clone(),
                size: LABEL_SIZE,
                bold: false,
                color: [0, 0, 0],
            });
        }
        baseline -= BODY_LINE_H;
    }

    cursor.advance(2.0 * BODY_LINE_H + 6.0);
}

fn draw_section_header(
    cursor: &mut PageCursor,
    entry: &ReportEntry,
    styles: &StatusStyleMap,
    geo: &PageGeometry,
) {
    let h = geo.row_height;
    let top = cursor.slot_top();
    let title = format!("Entry recorded {}", entry.recorded_at.format("%Y-%m-%d %H:%M"));

    cursor.push(DrawOp::Rect {
        x: geo.margin_left,
        y: top - h,
        w: geo.text_width(),
        h,
        fill: SECTION_FILL,
    });

    let baseline = top - h / 2.0 - SECTION_SIZE * 0.35;
    cursor.push(DrawOp::Text {
        x: geo.margin_left + 5.0,
        y: baseline,
        text: title.clone(),
        size: SECTION_SIZE,
        bold: true,
        color: [0, 0, 0],
    });

    let flagged = styles.flagged_count(
        entry.results.iter().map(|r| r.classification.status),
    );
    let summary = if entry.results.is_empty() {
        "no parameters".to_string()
    } else if flagged == 0 {
        "all parameters in range".to_string()
    } else {
        format!("{flagged} of {} parameters flagged", entry.results.len())
    };
    let w = text_width(Font::Helvetica, &summary, LABEL_SIZE);
    cursor.push(DrawOp::Text {
        x: geo.margin_left + geo.text_width() - 5.0 - w,
        y: baseline,
        text: summary,
        size: LABEL_SIZE,
        bold: false,
        color: MUTED,
    });

    cursor.section_title = Some(title);
    cursor.advance(h);
}

/// Section context restored above a table that continues from the
/// previous page.
fn draw_continuation_line(cursor: &mut PageCursor, geo: &PageGeometry) {
    let Some(title) = cursor.section_title.clone() else {
        return;
    };
    let baseline = cursor.slot_top() - LABEL_SIZE * ASCENT;
    cursor.push(DrawOp::Text {
        x: geo.margin_left,
        y: baseline,
        text: format!("{title} (continued)"),
        size: LABEL_SIZE,
        bold: false,
        color: MUTED,
    });
    cursor.advance(13.0);
}

/// An entry without extracted parameters still renders visibly empty.
fn draw_no_data_line(cursor: &mut PageCursor, geo: &PageGeometry) {
    let baseline = cursor.slot_top() - BODY_SIZE * ASCENT - 4.0;
    cursor.push(DrawOp::Text {
        x: geo.margin_left + 5.0,
        y: baseline,
        text: "No data extracted for this entry.".to_string(),
        size: BODY_SIZE,
        bold: false,
        color: MUTED,
    });
    cursor.advance(BODY_LINE_H + 6.0);
}

/// A labelled narrative block. Wrapped lines flow across page breaks one at
/// a time; only the page header is redrawn after a break.
fn draw_narrative(
    cursor: &mut PageCursor,
    doc: &ReportDocument,
    geo: &PageGeometry,
    label: &str,
    text: &str,
) {
    cursor.gap(8.0);
    if cursor.ensure_room(2.0 * BODY_LINE_H) {
        draw_page_header(cursor, doc, geo);
    }

    let baseline = cursor.slot_top() - BODY_SIZE * ASCENT;
    cursor.push(DrawOp::Text {
        x: geo.margin_left,
        y: baseline,
        text: format!("{label}:"),
        size: BODY_SIZE,
        bold: true,
        color: [0, 0, 0],
    });
    cursor.advance(BODY_LINE_H);

    for line in wrap_text(text, Font::Helvetica, BODY_SIZE, geo.text_width()) {
        if cursor.ensure_room(BODY_LINE_H) {
            draw_page_header(cursor, doc, geo);
        }
        let baseline = cursor.slot_top() - BODY_SIZE * ASCENT;
        cursor.push(DrawOp::Text {
            x: geo.margin_left,
            y: baseline,
            text: line,
            size: BODY_SIZE,
            bold: false,
            color: [0, 0, 0],
        });
        cursor.advance(BODY_LINE_H);
    }
}

fn draw_disclaimer(cursor: &mut PageCursor, doc: &ReportDocument, geo: &PageGeometry) {
    cursor.gap(16.0);
    if cursor.ensure_room(3.0 * BODY_LINE_H) {
        draw_page_header(cursor, doc, geo);
    }

    let rule_y = cursor.slot_top();
    cursor.push(DrawOp::Line {
        x1: geo.margin_left,
        y1: rule_y,
        x2: geo.margin_left + geo.text_width(),
        y2: rule_y,
        width: 0.75,
        color: RULE_COLOR,
    });
    cursor.advance(8.0);

    let baseline = cursor.slot_top() - BODY_SIZE * ASCENT;
    cursor.push(DrawOp::Text {
        x: geo.margin_left,
        y: baseline,
        text: "Recommendations & Disclaimer".to_string(),
        size: BODY_SIZE,
        bold: true,
        color: [0, 0, 0],
    });
    cursor.advance(BODY_LINE_H);

    for line in wrap_text(DISCLAIMER, Font::Helvetica, BODY_SIZE, geo.text_width()) {
        if cursor.ensure_room(BODY_LINE_H) {
            draw_page_header(cursor, doc, geo);
        }
        let baseline = cursor.slot_top() - BODY_SIZE * ASCENT;
        cursor.push(DrawOp::Text {
            x: geo.margin_left,
            y: baseline,
            text: line,
            size: BODY_SIZE,
            bold: false,
            color: MUTED,
        });
        cursor.advance(BODY_LINE_H);
    }
}

/// Final pass: encode built pages into a PDF byte stream. Content streams
/// are Flate-compressed; fonts are the built-in Helvetica pair.
pub fn write_pdf(pages: &[Page], geo: &PageGeometry, logo: Option<&Logo>) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_refs: Vec<(Font, Ref)> = Font::ALL
        .iter()
        .map(|font| {
            let r = alloc();
            pdf.type1_font(r)
                .base_font(Name(font.base_name().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (*font, r)
        })
        .collect();

    let logo_ref = logo.and_then(|l| embed_logo(&mut pdf, l, &mut alloc));

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let raw = encode_page(&page.ops, logo_ref.is_some()).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geo.page_width, geo.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (font, font_ref) in &font_refs {
                fonts.pair(Name(font.pdf_name().as_bytes()), *font_ref);
            }
        }
        if let Some(logo_ref) = logo_ref {
            resources.x_objects().pair(Name(b"Im1"), logo_ref);
        }
    }

    let bytes = pdf.finish();
    log::debug!(
        "assembly: {} pages → {} bytes in {:.1}ms",
        n,
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    bytes
}

fn encode_page(ops: &[DrawOp], has_logo: bool) -> Content {
    let mut content = Content::new();
    for op in ops {
        match op {
            DrawOp::Rect { x, y, w, h, fill } => {
                content.save_state();
                set_fill(&mut content, *fill);
                content.rect(*x, *y, *w, *h);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                content.save_state();
                content.set_line_width(*width);
                content.set_stroke_rgb(
                    color[0] as f32 / 255.0,
                    color[1] as f32 / 255.0,
                    color[2] as f32 / 255.0,
                );
                content.move_to(*x1, *y1);
                content.line_to(*x2, *y2);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Text {
                x,
                y,
                text,
                size,
                bold,
                color,
            } => {
                let font = if *bold { Font::HelveticaBold } else { Font::Helvetica };
                content.save_state();
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(font.pdf_name().as_bytes()), *size);
                content.next_line(*x, *y);
                content.show(Str(&to_winansi_bytes(text)));
                content.end_text();
                content.restore_state();
            }
            DrawOp::Image { x, y, w, h } => {
                // A logo that failed to embed must not leave a dangling
                // XObject reference in the stream
                if has_logo {
                    content.save_state();
                    content.transform([*w, 0.0, 0.0, *h, *x, *y]);
                    content.x_object(Name(b"Im1"));
                    content.restore_state();
                }
            }
        }
    }
    content
}

fn set_fill(content: &mut Content, color: [u8; 3]) {
    if color == [0, 0, 0] {
        content.set_fill_gray(0.0);
    } else {
        content.set_fill_rgb(
            color[0] as f32 / 255.0,
            color[1] as f32 / 255.0,
            color[2] as f32 / 255.0,
        );
    }
}

/// Embed the PNG logo as an image XObject, with an SMask when the source
/// carries alpha. A logo that fails to decode is skipped, not fatal.
fn embed_logo(pdf: &mut Pdf, logo: &Logo, alloc: &mut impl FnMut() -> Ref) -> Option<Ref> {
    let cursor = std::io::Cursor::new(&logo.data);
    let reader =
        image::ImageReader::with_format(std::io::BufReader::new(cursor), image::ImageFormat::Png);
    let decoded = match reader.decode() {
        Ok(d) => d,
        Err(e) => {
            log::warn!("logo PNG failed to decode, skipping: {e}");
            return None;
        }
    };

    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }

    Some(xobj_ref)
}
