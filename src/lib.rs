mod classify;
mod error;
mod fonts;
mod model;
mod pdf;
mod registry;
mod style;

pub use classify::{UnknownNumericPolicy, classify, classify_batch, classify_with};
pub use error::Error;
pub use model::{
    Classification, ClassifiedParameter, EntryInput, Logo, MeasuredParameter, PageGeometry,
    RawValue, ReportDocument, ReportEntry, ReportInput, Status,
};
pub use pdf::{DrawOp, Page, paginate, stamp_footers, write_pdf};
pub use registry::{RangeKind, ReferenceRange, ReferenceRangeRegistry};
pub use style::{StatusStyle, StatusStyleMap, TextColor};

use std::path::Path;
use std::time::Instant;

use chrono::Utc;

/// Render a classified document to PDF bytes with the fixed palette.
pub fn render_report(doc: &ReportDocument, geo: &PageGeometry) -> Result<Vec<u8>, Error> {
    render_report_styled(doc, geo, &StatusStyleMap::default())
}

/// Same, with a caller-supplied style map.
pub fn render_report_styled(
    doc: &ReportDocument,
    geo: &PageGeometry,
    styles: &StatusStyleMap,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let mut pages = pdf::paginate(doc, geo, styles)?;
    let t_layout = t0.elapsed();

    pdf::stamp_footers(&mut pages, geo);
    let bytes = pdf::write_pdf(&pages, geo, doc.logo.as_ref());
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, stamp+assembly={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        bytes.len(),
    );

    Ok(bytes)
}

/// Render and write the artifact in one step. Nothing is written on error.
pub fn write_report_file(
    doc: &ReportDocument,
    geo: &PageGeometry,
    output: &Path,
) -> Result<(), Error> {
    let bytes = render_report(doc, geo)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    Ok(())
}

/// Parse a raw JSON measurement document and classify every parameter
/// against the given registry (extended by any per-document range
/// overrides the input carries).
pub fn document_from_json(
    json: &str,
    registry: &ReferenceRangeRegistry,
    policy: UnknownNumericPolicy,
) -> Result<ReportDocument, Error> {
    let input: ReportInput =
        serde_json::from_str(json).map_err(|e| Error::Input(e.to_string()))?;

    let mut registry = registry.clone();
    for (name, range) in &input.ranges {
        registry.insert(name, range.clone());
    }

    let entries = input
        .entries
        .iter()
        .map(|e| ReportEntry {
            recorded_at: e.recorded_at,
            results: classify_batch(&e.parameters, &registry, policy),
            analysis: e.analysis.clone(),
            suggestion: e.suggestion.clone(),
            notes: e.notes.clone(),
        })
        .collect();

    Ok(ReportDocument {
        subject_name: input.subject_name,
        subject_id: input.subject_id,
        generated_at: input.generated_at.unwrap_or_else(Utc::now),
        logo: None,
        entries,
    })
}
