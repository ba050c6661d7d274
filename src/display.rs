//! Display lookups and formatting
//!
//! Every lookup maps a key to a label and a tone. Unknown keys get the
//! neutral fallback instead of failing.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{Diagnosis, Disposition, MedicationSource};

/// Placeholder for a missing value
pub const MISSING: &str = "-";

/// Color family of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Purple,
    Green,
    Amber,
    Gray,
    Red,
    Orange,
    Yellow,
    Blue,
}

impl Tone {
    fn name(&self) -> &'static str {
        match self {
            Tone::Purple => "purple",
            Tone::Green => "green",
            Tone::Amber => "amber",
            Tone::Gray => "gray",
            Tone::Red => "red",
            Tone::Orange => "orange",
            Tone::Yellow => "yellow",
            Tone::Blue => "blue",
        }
    }

    /// Pale pill: light background, dark text
    pub fn soft_classes(&self) -> String {
        format!("bg-{0}-100 text-{0}-800", self.name())
    }

    /// Saturated pill with white text
    pub fn solid_classes(&self) -> String {
        format!("bg-{}-500 text-white", self.name())
    }
}

/// Label plus tone for a pill/badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

pub fn disposition_tone(disposition: &Disposition) -> Tone {
    match disposition {
        Disposition::Admitted => Tone::Purple,
        Disposition::Home => Tone::Green,
        Disposition::Transfer => Tone::Amber,
        Disposition::LeftAgainstMedicalAdvice | Disposition::Expired => Tone::Red,
        Disposition::LeftWithoutBeingSeen
        | Disposition::Eloped
        | Disposition::Other
        | Disposition::Unrecognized(_) => Tone::Gray,
    }
}

/// Badge showing the raw disposition text
pub fn disposition_badge(disposition: &Disposition) -> Badge {
    Badge::new(disposition.as_str(), disposition_tone(disposition))
}

/// Severity name for an acuity level
pub fn acuity_label(acuity: i32) -> &'static str {
    match acuity {
        1 => "Critical",
        2 => "Emergent",
        3 => "Urgent",
        4 => "Less Urgent",
        5 => "Non-Urgent",
        _ => "Unknown",
    }
}

pub fn acuity_tone(acuity: i32) -> Tone {
    match acuity {
        1 => Tone::Red,
        2 => Tone::Orange,
        3 => Tone::Yellow,
        4 => Tone::Green,
        5 => Tone::Blue,
        _ => Tone::Gray,
    }
}

/// `Level N: Label`; nothing when acuity was not recorded
pub fn acuity_badge(acuity: Option<i32>) -> Option<Badge> {
    acuity.map(|level| {
        Badge::new(
            format!("Level {}: {}", level, acuity_label(level)),
            acuity_tone(level),
        )
    })
}

pub fn medication_source_badge(source: MedicationSource) -> Badge {
    let tone = match source {
        MedicationSource::Pyxis => Tone::Blue,
        MedicationSource::Medrecon | MedicationSource::Unknown => Tone::Gray,
    };
    Badge::new(source.as_str(), tone)
}

/// `M` → Male, `F` → Female, anything else is shown as-is
pub fn gender_label(code: &str) -> &str {
    match code {
        "M" => "Male",
        "F" => "Female",
        other => other,
    }
}

/// `Jul 23, 2180 14:05`
pub fn format_arrival(time: &NaiveDateTime) -> String {
    time.format("%b %-d, %Y %H:%M").to_string()
}

/// `Jul 23, 14:05`, or the placeholder
pub fn format_time(time: Option<&NaiveDateTime>) -> String {
    time.map(|t| t.format("%b %-d, %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Stay length in hours with one decimal
pub fn format_duration(hours: f64) -> String {
    format!("{:.1}h", hours)
}

/// A measurement without needless trailing zeros
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// `value unit`, or the placeholder when not measured
pub fn format_vital(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit == "%" => format!("{}%", format_number(v)),
        Some(v) => format!("{} {}", format_number(v), unit),
        None => MISSING.to_string(),
    }
}

/// `120/80 mmHg`; a missing half is shown as the placeholder
pub fn format_blood_pressure(sbp: Option<f64>, dbp: Option<f64>) -> String {
    match (sbp, dbp) {
        (None, None) => MISSING.to_string(),
        (sbp, dbp) => {
            let part = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| MISSING.to_string());
            format!("{}/{} mmHg", part(sbp), part(dbp))
        }
    }
}

pub fn format_pain(score: Option<i32>) -> String {
    score
        .map(|s| format!("{}/10", s))
        .unwrap_or_else(|| MISSING.to_string())
}

/// `ICD-10: R079`
pub fn icd_line(diagnosis: &Diagnosis) -> String {
    format!("ICD-{}: {}", diagnosis.icd_version, diagnosis.icd_code)
}

pub fn diagnosis_title(diagnosis: &Diagnosis) -> &str {
    diagnosis.icd_title.as_deref().unwrap_or("Unknown")
}

pub fn or_missing(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp;

    #[test]
    fn test_disposition_lookup_with_fallback() {
        assert_eq!(disposition_badge(&Disposition::Admitted).tone.soft_classes(), "bg-purple-100 text-purple-800");
        assert_eq!(disposition_tone(&Disposition::Home), Tone::Green);
        assert_eq!(disposition_tone(&Disposition::Expired), Tone::Red);

        let unknown = Disposition::from("ADMITTED TO OBSERVATION");
        let badge = disposition_badge(&unknown);
        assert_eq!(badge.label, "ADMITTED TO OBSERVATION");
        assert_eq!(badge.tone, Tone::Gray);
    }

    #[test]
    fn test_acuity_lookup_with_fallback() {
        let badge = acuity_badge(Some(1)).unwrap();
        assert_eq!(badge.label, "Level 1: Critical");
        assert_eq!(badge.tone.solid_classes(), "bg-red-500 text-white");

        assert_eq!(acuity_label(5), "Non-Urgent");
        assert_eq!(acuity_label(9), "Unknown");
        assert_eq!(acuity_tone(0), Tone::Gray);
        assert_eq!(acuity_badge(None), None);
    }

    #[test]
    fn test_medication_source_lookup() {
        assert_eq!(medication_source_badge(MedicationSource::Pyxis).tone, Tone::Blue);
        assert_eq!(medication_source_badge(MedicationSource::Unknown).tone, Tone::Gray);
    }

    #[test]
    fn test_gender_label() {
        assert_eq!(gender_label("M"), "Male");
        assert_eq!(gender_label("F"), "Female");
        assert_eq!(gender_label("U"), "U");
    }

    #[test]
    fn test_time_formats() {
        let t = timestamp::parse("2180-07-03T08:05:00").unwrap();
        assert_eq!(format_arrival(&t), "Jul 3, 2180 08:05");
        assert_eq!(format_time(Some(&t)), "Jul 3, 08:05");
        assert_eq!(format_time(None), "-");
        assert_eq!(format_duration(5.26), "5.3h");
    }

    #[test]
    fn test_vital_formats() {
        assert_eq!(format_vital(Some(80.0), "bpm"), "80 bpm");
        assert_eq!(format_vital(Some(98.6), "°F"), "98.6 °F");
        assert_eq!(format_vital(Some(97.0), "%"), "97%");
        assert_eq!(format_vital(Some(0.0), "bpm"), "0 bpm");
        assert_eq!(format_vital(None, "bpm"), "-");
        assert_eq!(format_blood_pressure(Some(120.0), Some(80.0)), "120/80 mmHg");
        assert_eq!(format_blood_pressure(Some(120.0), None), "120/- mmHg");
        assert_eq!(format_blood_pressure(None, None), "-");
        assert_eq!(format_pain(Some(7)), "7/10");
    }

    #[test]
    fn test_diagnosis_lines() {
        let dx = Diagnosis {
            seq_num: 1,
            icd_code: "R079".to_string(),
            icd_version: 10,
            icd_title: None,
        };
        assert_eq!(icd_line(&dx), "ICD-10: R079");
        assert_eq!(diagnosis_title(&dx), "Unknown");
    }
}
