use std::collections::HashMap;

use crate::model::Status;

/// Declared text color for a status cell. The style map is the single
/// source of truth for contrast; the renderer never derives it from the
/// fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            TextColor::Black => [0, 0, 0],
            TextColor::White => [255, 255, 255],
        }
    }
}

/// Visual encoding for one status label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusStyle {
    pub fill: [u8; 3],
    pub text: TextColor,
    /// Relative risk weight; anything above zero counts as flagged in the
    /// per-entry summary line.
    pub weight: f32,
    /// Marker printed next to the status label. WinAnsi-encodable only;
    /// the text pipeline has no glyphs outside that set.
    pub glyph: &'static str,
}

const NEUTRAL: StatusStyle = StatusStyle {
    fill: [240, 240, 240],
    text: TextColor::Black,
    weight: 0.0,
    glyph: "",
};

/// Status label → visual encoding. Injected into the renderer so tests and
/// embedding applications can substitute a palette without touching shared
/// state.
#[derive(Clone, Debug)]
pub struct StatusStyleMap {
    styles: HashMap<Status, StatusStyle>,
}

impl Default for StatusStyleMap {
    fn default() -> Self {
        Self::fixed_palette()
    }
}

impl StatusStyleMap {
    /// The report's fixed palette. Greens for in-range, ambers for the
    /// slight tiers, oranges/reds escalating with severity; critical tiers
    /// flip to white-on-dark.
    pub fn fixed_palette() -> Self {
        let mut styles = HashMap::new();
        let mut put = |status: Status, fill: [u8; 3], text: TextColor, weight: f32, glyph: &'static str| {
            styles.insert(status, StatusStyle { fill, text, weight, glyph });
        };

        put(Status::Normal, [198, 239, 206], TextColor::Black, 0.0, "");
        put(Status::SlightlyLow, [255, 235, 156], TextColor::Black, 1.0, "!");
        put(Status::SlightlyHigh, [255, 235, 156], TextColor::Black, 1.0, "!");
        put(Status::Low, [255, 205, 148], TextColor::Black, 2.0, "!");
        put(Status::High, [255, 205, 148], TextColor::Black, 2.0, "!");
        put(Status::Elevated, [255, 160, 122], TextColor::Black, 3.0, "!!");
        put(Status::CriticalLow, [156, 0, 6], TextColor::White, 4.0, "!!");
        put(Status::CriticalHigh, [156, 0, 6], TextColor::White, 4.0, "!!");
        put(Status::Positive, [255, 160, 122], TextColor::Black, 3.0, "+");
        put(Status::Indeterminate, [217, 217, 217], TextColor::Black, 1.0, "?");

        Self { styles }
    }

    pub fn with_style(mut self, status: Status, style: StatusStyle) -> Self {
        self.styles.insert(status, style);
        self
    }

    pub fn style(&self, status: Status) -> &StatusStyle {
        self.styles.get(&status).unwrap_or(&NEUTRAL)
    }

    /// Number of results in a batch whose status carries any risk weight.
    pub fn flagged_count(&self, statuses: impl IntoIterator<Item = Status>) -> usize {
        statuses
            .into_iter()
            .filter(|s| self.style(*s).weight > 0.0)
            .count()
    }
}
