use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A measured value as it arrives from the collecting side: either a number
/// ("13.4") or free text ("Positive"). Text is kept verbatim; the classifier
/// decides what to make of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            // Collectors sometimes deliver numerics as strings ("13.4")
            RawValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            RawValue::Number(n) => format_number(*n),
            RawValue::Text(s) => s.clone(),
        }
    }
}

/// Trim trailing zeros so "13.40" prints as "13.4" and "5.00" as "5".
pub(crate) fn format_number(n: f64) -> String {
    let s = format!("{n:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// One measurement as submitted, before classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasuredParameter {
    pub name: String,
    pub value: RawValue,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Tiered status labels. Each range kind only ever produces a subset:
/// numeric bands yield the Low/High tiers, single-bound ranges yield
/// Low/High/Normal, qualitative values yield Normal/Positive/Indeterminate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Normal,
    SlightlyLow,
    Low,
    CriticalLow,
    SlightlyHigh,
    High,
    Elevated,
    CriticalHigh,
    Positive,
    Indeterminate,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::SlightlyLow => "Slightly Low",
            Status::Low => "Low",
            Status::CriticalLow => "Critical Low",
            Status::SlightlyHigh => "Slightly High",
            Status::High => "High",
            Status::Elevated => "Elevated",
            Status::CriticalHigh => "Critical High",
            Status::Positive => "Positive",
            Status::Indeterminate => "Indeterminate",
        }
    }
}

/// Result of classifying one measured value against its reference range.
/// Pure data: two identical inputs always produce an identical value.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub status: Status,
    pub numeric_value: Option<f64>,
    /// Human-readable range ("12 – 16 g/dL", "< 100 mg/dL", "Negative").
    pub display_range: String,
}

/// A measurement together with its classification, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedParameter {
    pub name: String,
    pub value: RawValue,
    pub unit: Option<String>,
    pub classification: Classification,
}

/// One measurement occasion: a timestamp, the classified parameters in
/// submission order, and optional narrative text. Immutable once built.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    pub recorded_at: DateTime<Utc>,
    pub results: Vec<ClassifiedParameter>,
    pub analysis: Option<String>,
    pub suggestion: Option<String>,
    pub notes: Option<String>,
}

/// PNG logo drawn in the title block. Display size in points.
#[derive(Clone, Debug)]
pub struct Logo {
    pub data: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub display_width: f32,
    pub display_height: f32,
}

/// The complete document handed to the renderer. Owns its entries
/// exclusively; built once per export and discarded after rendering.
#[derive(Clone, Debug)]
pub struct ReportDocument {
    pub subject_name: String,
    pub subject_id: String,
    pub generated_at: DateTime<Utc>,
    pub logo: Option<Logo>,
    pub entries: Vec<ReportEntry>,
}

/// Page geometry in points. All vertical bookkeeping during layout happens
/// against these values; `footer_reserve` is kept clear of body content so
/// the footer pass always has room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub row_height: f32,
    pub footer_reserve: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            page_width: 595.276,
            page_height: 841.89,
            margin_top: 56.0,
            margin_bottom: 42.0,
            margin_left: 48.0,
            margin_right: 48.0,
            row_height: 22.0,
            footer_reserve: 30.0,
        }
    }

    pub fn text_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Usable body height: everything between the top margin and the
    /// footer reserve above the bottom margin.
    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom - self.footer_reserve
    }
}

/// Raw input document as parsed from JSON, before classification.
#[derive(Clone, Debug, Deserialize)]
pub struct ReportInput {
    pub subject_name: String,
    pub subject_id: String,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    /// Per-document reference range overrides, keyed by parameter name.
    #[serde(default)]
    pub ranges: std::collections::HashMap<String, crate::registry::ReferenceRange>,
    pub entries: Vec<EntryInput>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EntryInput {
    pub recorded_at: DateTime<Utc>,
    pub parameters: Vec<MeasuredParameter>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
