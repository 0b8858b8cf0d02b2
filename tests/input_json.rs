use healthreport_pdf::{
    Error, ReferenceRangeRegistry, Status, UnknownNumericPolicy, document_from_json,
};

#[test]
fn json_document_is_classified_on_load() {
    let json = r#"{
        "subject_name": "Jane Doe",
        "subject_id": "P-1043",
        "generated_at": "2026-03-14T10:00:00Z",
        "ranges": {
            "Ferritin": {
                "kind": "numeric",
                "min": 30.0,
                "max": 300.0,
                "unit": "ng/mL",
                "description": "Serum ferritin"
            }
        },
        "entries": [
            {
                "recorded_at": "2026-03-14T09:30:00Z",
                "parameters": [
                    { "name": "Hemoglobin", "value": 10.5, "unit": "g/dL" },
                    { "name": "Ferritin", "value": 12 },
                    { "name": "COVID-19 Test", "value": "Negative" }
                ],
                "notes": "fasting sample"
            }
        ]
    }"#;

    let registry = ReferenceRangeRegistry::with_defaults();
    let doc = document_from_json(json, &registry, UnknownNumericPolicy::Normal).unwrap();

    assert_eq!(doc.subject_name, "Jane Doe");
    assert_eq!(doc.entries.len(), 1);

    let results = &doc.entries[0].results;
    assert_eq!(results[0].classification.status, Status::Low);
    // Override range (30-300, width 270): 12 sits beyond the 2% threshold
    // but not past the 10% one
    assert_eq!(results[1].classification.status, Status::SlightlyLow);
    assert_eq!(results[2].classification.status, Status::Normal);

    // Unit backfilled from the range definition when the measurement
    // carries none
    assert_eq!(results[1].unit.as_deref(), Some("ng/mL"));
    assert_eq!(doc.entries[0].notes.as_deref(), Some("fasting sample"));
}

#[test]
fn malformed_json_is_an_input_error() {
    let registry = ReferenceRangeRegistry::empty();
    match document_from_json("{ nope", &registry, UnknownNumericPolicy::Normal) {
        Err(Error::Input(_)) => {}
        other => panic!("expected input error, got {other:?}"),
    }
}
