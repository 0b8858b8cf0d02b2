use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::format_number;

/// How a reference range bounds its parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Both bounds present; values inside [min, max] are normal.
    Numeric,
    /// Text result matched against presence/absence vocabulary.
    Qualitative,
    /// Lower bound only; anything at or above min is normal.
    GreaterThan,
    /// Upper bound only; anything at or below max is normal.
    LessThan,
}

/// Immutable reference-range definition for one parameter. Absence of a
/// definition is a valid state and handled by the classifier's fallbacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub kind: RangeKind,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    pub description: String,
}

impl ReferenceRange {
    pub fn numeric(min: f64, max: f64, unit: &str, description: &str) -> Self {
        Self {
            kind: RangeKind::Numeric,
            min: Some(min),
            max: Some(max),
            unit: some_unit(unit),
            description: description.to_string(),
        }
    }

    pub fn greater_than(min: f64, unit: &str, description: &str) -> Self {
        Self {
            kind: RangeKind::GreaterThan,
            min: Some(min),
            max: None,
            unit: some_unit(unit),
            description: description.to_string(),
        }
    }

    pub fn less_than(max: f64, unit: &str, description: &str) -> Self {
        Self {
            kind: RangeKind::LessThan,
            min: None,
            max: Some(max),
            unit: some_unit(unit),
            description: description.to_string(),
        }
    }

    pub fn qualitative(description: &str) -> Self {
        Self {
            kind: RangeKind::Qualitative,
            min: None,
            max: None,
            unit: None,
            description: description.to_string(),
        }
    }

    /// Human-readable form of the range for the report's "Reference" column.
    pub fn display(&self) -> String {
        let unit = self.unit.as_deref().unwrap_or("");
        let sep = if unit.is_empty() { "" } else { " " };
        match self.kind {
            RangeKind::Numeric => match (self.min, self.max) {
                (Some(lo), Some(hi)) => {
                    format!("{} - {}{sep}{unit}", format_number(lo), format_number(hi))
                }
                _ => self.description.clone(),
            },
            RangeKind::GreaterThan => match self.min {
                Some(lo) => format!("> {}{sep}{unit}", format_number(lo)),
                None => self.description.clone(),
            },
            RangeKind::LessThan => match self.max {
                Some(hi) => format!("< {}{sep}{unit}", format_number(hi)),
                None => self.description.clone(),
            },
            RangeKind::Qualitative => self.description.clone(),
        }
    }
}

fn some_unit(unit: &str) -> Option<String> {
    if unit.is_empty() {
        None
    } else {
        Some(unit.to_string())
    }
}

/// Mapping from parameter name to its reference range. Lookup is
/// case-insensitive so "hemoglobin" and "Hemoglobin" resolve identically.
/// Callers construct and inject this; nothing in the crate holds a global.
#[derive(Clone, Debug, Default)]
pub struct ReferenceRangeRegistry {
    ranges: HashMap<String, ReferenceRange>,
}

impl ReferenceRangeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with common panel parameters. Adult reference
    /// intervals; callers with population-specific ranges should insert
    /// their own definitions over these.
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        let defs: &[(&str, ReferenceRange)] = &[
            ("Hemoglobin", ReferenceRange::numeric(12.0, 16.0, "g/dL", "Hemoglobin")),
            ("Hematocrit", ReferenceRange::numeric(36.0, 48.0, "%", "Hematocrit")),
            ("WBC", ReferenceRange::numeric(4.0, 11.0, "10^3/uL", "White blood cells")),
            ("RBC", ReferenceRange::numeric(4.2, 5.9, "10^6/uL", "Red blood cells")),
            ("Platelets", ReferenceRange::numeric(150.0, 400.0, "10^3/uL", "Platelet count")),
            ("Glucose", ReferenceRange::numeric(70.0, 100.0, "mg/dL", "Fasting glucose")),
            ("HbA1c", ReferenceRange::less_than(5.7, "%", "Glycated hemoglobin")),
            ("Total Cholesterol", ReferenceRange::less_than(200.0, "mg/dL", "Total cholesterol")),
            ("LDL Cholesterol", ReferenceRange::less_than(100.0, "mg/dL", "LDL cholesterol")),
            ("HDL Cholesterol", ReferenceRange::greater_than(40.0, "mg/dL", "HDL cholesterol")),
            ("Triglycerides", ReferenceRange::less_than(150.0, "mg/dL", "Triglycerides")),
            ("Creatinine", ReferenceRange::numeric(0.6, 1.3, "mg/dL", "Serum creatinine")),
            ("Urea", ReferenceRange::numeric(7.0, 20.0, "mg/dL", "Blood urea nitrogen")),
            ("Sodium", ReferenceRange::numeric(135.0, 145.0, "mmol/L", "Serum sodium")),
            ("Potassium", ReferenceRange::numeric(3.5, 5.1, "mmol/L", "Serum potassium")),
            ("TSH", ReferenceRange::numeric(0.4, 4.0, "mIU/L", "Thyroid stimulating hormone")),
            ("ALT", ReferenceRange::less_than(40.0, "U/L", "Alanine aminotransferase")),
            ("AST", ReferenceRange::less_than(40.0, "U/L", "Aspartate aminotransferase")),
            ("Vitamin D", ReferenceRange::greater_than(30.0, "ng/mL", "25-hydroxy vitamin D")),
            ("Vitamin B12", ReferenceRange::numeric(200.0, 900.0, "pg/mL", "Cobalamin")),
            ("Systolic BP", ReferenceRange::numeric(90.0, 120.0, "mmHg", "Systolic blood pressure")),
            ("Diastolic BP", ReferenceRange::numeric(60.0, 80.0, "mmHg", "Diastolic blood pressure")),
            ("COVID-19 Test", ReferenceRange::qualitative("Negative")),
            ("Urine Protein", ReferenceRange::qualitative("Absent")),
            ("Urine Glucose", ReferenceRange::qualitative("Absent")),
        ];
        for (name, def) in defs {
            reg.insert(name, def.clone());
        }
        reg
    }

    pub fn insert(&mut self, name: &str, range: ReferenceRange) {
        self.ranges.insert(name.to_lowercase(), range);
    }

    pub fn lookup(&self, name: &str) -> Option<&ReferenceRange> {
        self.ranges.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
