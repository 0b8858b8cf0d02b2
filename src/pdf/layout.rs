use crate::fonts::{Font, text_width};
use crate::model::PageGeometry;

/// One positioned draw primitive. Coordinates are PDF-style: origin at the
/// bottom-left of the page, y increasing upward. `y` on text is the
/// baseline; on rects and images it is the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: [u8; 3],
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: [u8; 3],
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: [u8; 3],
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

/// One finished page of the body pass.
#[derive(Clone, Debug, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// All text contents on the page, in draw order. Test convenience.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Mutable layout state for one render call: the page under construction,
/// the vertical cursor, and the section title to restore after a break.
/// Never outlives the call and never crosses into the next one.
pub(crate) struct PageCursor {
    geo: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    slot_top: f32,
    pub(crate) section_title: Option<String>,
}

impl PageCursor {
    pub(crate) fn new(geo: &PageGeometry) -> Self {
        Self {
            geo: *geo,
            pages: Vec::new(),
            current: Page::default(),
            slot_top: geo.page_height - geo.margin_top,
            section_title: None,
        }
    }

    /// The single fit predicate: does a block of this height land entirely
    /// above the footer reserve?
    pub(crate) fn fits(&self, block_h: f32) -> bool {
        self.slot_top - block_h >= self.floor()
    }

    /// Lowest y body content may reach.
    pub(crate) fn floor(&self) -> f32 {
        self.geo.margin_bottom + self.geo.footer_reserve
    }

    pub(crate) fn slot_top(&self) -> f32 {
        self.slot_top
    }

    pub(crate) fn at_page_top(&self) -> bool {
        (self.slot_top - (self.geo.page_height - self.geo.margin_top)).abs() < 1.0
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.current.ops.push(op);
    }

    pub(crate) fn advance(&mut self, h: f32) {
        self.slot_top -= h;
    }

    pub(crate) fn gap(&mut self, h: f32) {
        // Inter-block spacing is dropped at the top of a page
        if !self.at_page_top() {
            self.slot_top -= h;
        }
    }

    /// Flush the current page and start a fresh one at the top margin.
    pub(crate) fn break_page(&mut self) {
        self.pages
            .push(std::mem::replace(&mut self.current, Page::default()));
        self.slot_top = self.geo.page_height - self.geo.margin_top;
    }

    /// Make room for a block. If it does not fit, break the page; if it can
    /// never fit, clamp to the fresh page and warn instead of looping.
    /// Returns true when a page break happened.
    pub(crate) fn ensure_room(&mut self, block_h: f32) -> bool {
        if self.fits(block_h) {
            return false;
        }
        if self.at_page_top() {
            // Taller than a whole page's usable area: draw clamped where we
            // are. Advancing past the floor keeps the layout moving forward.
            log::warn!(
                "block of height {:.1}pt exceeds usable page height {:.1}pt; clamping",
                block_h,
                self.geo.usable_height(),
            );
            return false;
        }
        self.break_page();
        true
    }

    pub(crate) fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Greedy word wrap against approximate font metrics. A word wider than the
/// line gets a line of its own rather than being split mid-word.
pub(crate) fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w: f32 = 0.0;
    let space_w = text_width(font, " ", size);

    for word in text.split_whitespace() {
        let ww = text_width(font, word, size);
        let proposed = if current.is_empty() {
            ww
        } else {
            current_w + space_w + ww
        };
        if !current.is_empty() && proposed > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = ww;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_w = proposed;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Clip a single-line cell value to its column, appending an ellipsis when
/// anything was cut.
pub(crate) fn clip_to_width(text: &str, font: Font, size: f32, max_width: f32) -> String {
    if text_width(font, text, size) <= max_width {
        return text.to_string();
    }
    let ell = '\u{2026}';
    let ell_w = text_width(font, "\u{2026}", size);
    let mut out = String::new();
    let mut w = 0.0;
    for ch in text.chars() {
        let cw = text_width(font, &ch.to_string(), size);
        if w + cw + ell_w > max_width {
            break;
        }
        out.push(ch);
        w += cw;
    }
    out.push(ell);
    out
}
