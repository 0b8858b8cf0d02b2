use crate::fonts::{Font, text_width};
use crate::model::{ClassifiedParameter, PageGeometry};
use crate::style::StatusStyleMap;

use super::layout::{DrawOp, PageCursor, clip_to_width};

pub(super) const ROW_FONT_SIZE: f32 = 9.0;
const HEADER_FILL: [u8; 3] = [68, 84, 106];
const GRID_COLOR: [u8; 3] = [200, 200, 200];
const CELL_PAD: f32 = 5.0;

pub(super) const COLUMNS: [&str; 5] = ["Parameter", "Result", "Unit", "Reference", "Status"];
const BASE_FRACTIONS: [f32; 5] = [0.28, 0.14, 0.11, 0.24, 0.23];

/// Column widths for one entry's table. Starts from the base fractions and
/// grows any column whose widest content would not fit, shrinking the
/// remaining columns proportionally to their slack so the total width is
/// preserved.
pub(super) fn fit_columns(results: &[ClassifiedParameter], geo: &PageGeometry) -> [f32; 5] {
    let total = geo.text_width();
    let mut widths = BASE_FRACTIONS.map(|f| f * total);

    let mut min_widths = [0.0f32; 5];
    for (i, header) in COLUMNS.iter().enumerate() {
        min_widths[i] = text_width(Font::HelveticaBold, header, ROW_FONT_SIZE);
    }
    for r in results {
        let status = r.classification.status;
        let cells = [
            r.name.clone(),
            r.value.display(),
            r.unit.clone().unwrap_or_default(),
            r.classification.display_range.clone(),
            format!("{} {}", status.label(), "!!"), // widest glyph the map can attach
        ];
        for (i, cell) in cells.iter().enumerate() {
            min_widths[i] = min_widths[i].max(text_width(Font::Helvetica, cell, ROW_FONT_SIZE));
        }
    }
    for m in &mut min_widths {
        *m += 2.0 * CELL_PAD;
    }

    let mut extra_needed: f32 = 0.0;
    let mut shrinkable: f32 = 0.0;
    for i in 0..5 {
        if min_widths[i] > widths[i] {
            extra_needed += min_widths[i] - widths[i];
            widths[i] = min_widths[i];
        } else {
            shrinkable += widths[i] - min_widths[i];
        }
    }

    if extra_needed > 0.0 && shrinkable > 0.0 {
        let factor = extra_needed.min(shrinkable) / shrinkable;
        for i in 0..5 {
            if widths[i] > min_widths[i] {
                widths[i] -= (widths[i] - min_widths[i]) * factor;
            }
        }
        let new_total: f32 = widths.iter().sum();
        if (new_total - total).abs() > 0.01 {
            let scale = total / new_total;
            for w in &mut widths {
                *w *= scale;
            }
        }
    }

    widths
}

fn col_left(geo: &PageGeometry, widths: &[f32; 5], i: usize) -> f32 {
    geo.margin_left + widths[..i].iter().sum::<f32>()
}

/// Baseline that visually centers a single text line inside a row.
fn row_baseline(row_top: f32, row_h: f32) -> f32 {
    row_top - row_h / 2.0 - ROW_FONT_SIZE * 0.35
}

/// Dark header band with bold white column labels. Redrawn after every page
/// break so a continued table stays self-describing.
pub(super) fn draw_table_header(cursor: &mut PageCursor, geo: &PageGeometry, widths: &[f32; 5]) {
    let row_h = geo.row_height;
    let top = cursor.slot_top();

    cursor.push(DrawOp::Rect {
        x: geo.margin_left,
        y: top - row_h,
        w: geo.text_width(),
        h: row_h,
        fill: HEADER_FILL,
    });

    let baseline = row_baseline(top, row_h);
    for (i, label) in COLUMNS.iter().enumerate() {
        cursor.push(DrawOp::Text {
            x: col_left(geo, widths, i) + CELL_PAD,
            y: baseline,
            text: (*label).to_string(),
            size: ROW_FONT_SIZE,
            bold: true,
            color: [255, 255, 255],
        });
    }

    cursor.advance(row_h);
}

/// One classified parameter as a table row. The status cell takes its fill
/// and text color from the style map; everything else is black on white
/// with a hairline below.
pub(super) fn draw_row(
    cursor: &mut PageCursor,
    geo: &PageGeometry,
    result: &ClassifiedParameter,
    styles: &StatusStyleMap,
    widths: &[f32; 5],
) {
    let row_h = geo.row_height;
    let top = cursor.slot_top();
    let bottom = top - row_h;
    let baseline = row_baseline(top, row_h);
    let style = styles.style(result.classification.status);

    // Status cell background
    let status_x = col_left(geo, widths, 4);
    cursor.push(DrawOp::Rect {
        x: status_x,
        y: bottom,
        w: widths[4],
        h: row_h,
        fill: style.fill,
    });

    let flagged = style.weight > 0.0;

    // Parameter
    cursor.push(DrawOp::Text {
        x: col_left(geo, widths, 0) + CELL_PAD,
        y: baseline,
        text: clip_to_width(&result.name, Font::Helvetica, ROW_FONT_SIZE, widths[0] - 2.0 * CELL_PAD),
        size: ROW_FONT_SIZE,
        bold: false,
        color: [0, 0, 0],
    });

    // Result, right-aligned within its column; bold when flagged
    let value_text = result.value.display();
    let value_font = if flagged { Font::HelveticaBold } else { Font::Helvetica };
    let value_w = text_width(value_font, &value_text, ROW_FONT_SIZE);
    cursor.push(DrawOp::Text {
        x: col_left(geo, widths, 1) + widths[1] - CELL_PAD - value_w,
        y: baseline,
        text: value_text,
        size: ROW_FONT_SIZE,
        bold: flagged,
        color: [0, 0, 0],
    });

    // Unit
    cursor.push(DrawOp::Text {
        x: col_left(geo, widths, 2) + CELL_PAD,
        y: baseline,
        text: result.unit.clone().unwrap_or_else(|| "-".to_string()),
        size: ROW_FONT_SIZE,
        bold: false,
        color: [0, 0, 0],
    });

    // Reference range
    cursor.push(DrawOp::Text {
        x: col_left(geo, widths, 3) + CELL_PAD,
        y: baseline,
        text: clip_to_width(
            &result.classification.display_range,
            Font::Helvetica,
            ROW_FONT_SIZE,
            widths[3] - 2.0 * CELL_PAD,
        ),
        size: ROW_FONT_SIZE,
        bold: false,
        color: [0, 0, 0],
    });

    // Status label with the style's glyph marker
    let status_text = if style.glyph.is_empty() {
        result.classification.status.label().to_string()
    } else {
        format!("{} {}", style.glyph, result.classification.status.label())
    };
    cursor.push(DrawOp::Text {
        x: status_x + CELL_PAD,
        y: baseline,
        text: status_text,
        size: ROW_FONT_SIZE,
        bold: flagged,
        color: style.text.rgb(),
    });

    // Hairline under the row
    cursor.push(DrawOp::Line {
        x1: geo.margin_left,
        y1: bottom,
        x2: geo.margin_left + geo.text_width(),
        y2: bottom,
        width: 0.5,
        color: GRID_COLOR,
    });

    cursor.advance(row_h);
}
