use chrono::{DateTime, TimeZone, Utc};

use healthreport_pdf::{
    MeasuredParameter, PageGeometry, RawValue, ReferenceRangeRegistry, ReportDocument,
    ReportEntry, UnknownNumericPolicy, classify_batch,
};

pub fn registry() -> ReferenceRangeRegistry {
    ReferenceRangeRegistry::with_defaults()
}

pub fn recorded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

pub fn param(name: &str, value: f64) -> MeasuredParameter {
    MeasuredParameter {
        name: name.to_string(),
        value: RawValue::Number(value),
        unit: None,
    }
}

/// Entry with `n` in-range parameters from the default registry.
pub fn entry_with_rows(n: usize) -> ReportEntry {
    let pool = [
        ("Hemoglobin", 13.0),
        ("Glucose", 85.0),
        ("Sodium", 140.0),
        ("Potassium", 4.2),
        ("Creatinine", 1.0),
        ("WBC", 6.5),
        ("Platelets", 250.0),
        ("RBC", 5.0),
        ("Hematocrit", 42.0),
        ("Urea", 14.0),
    ];
    let params: Vec<MeasuredParameter> = pool
        .iter()
        .cycle()
        .take(n)
        .map(|(name, value)| param(name, *value))
        .collect();
    ReportEntry {
        recorded_at: recorded_at(),
        results: classify_batch(&params, &registry(), UnknownNumericPolicy::Normal),
        analysis: None,
        suggestion: None,
        notes: None,
    }
}

pub fn document(entries: Vec<ReportEntry>) -> ReportDocument {
    ReportDocument {
        subject_name: "Jane Doe".to_string(),
        subject_id: "P-1043".to_string(),
        generated_at: Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
        logo: None,
        entries,
    }
}

/// Geometry where exactly five table rows fit on the first page.
///
/// First-page prelude: page header 43pt, metadata 32pt, inter-entry gap
/// 14pt, section band 22pt, table header 22pt = 133pt. With a 40pt top
/// margin that puts the first row at y = 180; the floor (30pt bottom margin
/// + 30pt footer reserve) is at y = 60, so five 22pt rows (110pt) fit and a
/// sixth (132pt) does not.
pub fn five_row_geometry() -> PageGeometry {
    PageGeometry {
        page_width: 595.276,
        page_height: 353.0,
        margin_top: 40.0,
        margin_bottom: 30.0,
        margin_left: 48.0,
        margin_right: 48.0,
        row_height: 22.0,
        footer_reserve: 30.0,
    }
}
