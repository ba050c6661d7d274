//! Encounter records as served by the API
//!
//! - `EncounterListItem` / `EncounterPage`: one row of the list view and the
//!   paged envelope around it
//! - `EncounterDetail`: the full aggregate for one stay
//! - `Disposition`: visit outcome vocabulary

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp;
use super::vitals::{Triage, VitalSign};

/// Outcome of a visit
///
/// The vocabulary is fixed by the dataset but the client never assumes it is
/// exhaustive: anything else is kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Disposition {
    Admitted,
    Home,
    Transfer,
    LeftWithoutBeingSeen,
    LeftAgainstMedicalAdvice,
    Eloped,
    Other,
    Expired,
    Unrecognized(String),
}

impl Disposition {
    /// All known dispositions, in the order the dataset documents them
    pub fn known() -> &'static [Disposition] {
        &[
            Disposition::Admitted,
            Disposition::Home,
            Disposition::Transfer,
            Disposition::LeftWithoutBeingSeen,
            Disposition::LeftAgainstMedicalAdvice,
            Disposition::Eloped,
            Disposition::Other,
            Disposition::Expired,
        ]
    }

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            Disposition::Admitted => "ADMITTED",
            Disposition::Home => "HOME",
            Disposition::Transfer => "TRANSFER",
            Disposition::LeftWithoutBeingSeen => "LEFT WITHOUT BEING SEEN",
            Disposition::LeftAgainstMedicalAdvice => "LEFT AGAINST MEDICAL ADVICE",
            Disposition::Eloped => "ELOPED",
            Disposition::Other => "OTHER",
            Disposition::Expired => "EXPIRED",
            Disposition::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Disposition {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ADMITTED" => Disposition::Admitted,
            "HOME" => Disposition::Home,
            "TRANSFER" => Disposition::Transfer,
            "LEFT WITHOUT BEING SEEN" => Disposition::LeftWithoutBeingSeen,
            "LEFT AGAINST MEDICAL ADVICE" => Disposition::LeftAgainstMedicalAdvice,
            "ELOPED" => Disposition::Eloped,
            "OTHER" => Disposition::Other,
            "EXPIRED" => Disposition::Expired,
            _ => Disposition::Unrecognized(raw),
        }
    }
}

impl From<&str> for Disposition {
    fn from(raw: &str) -> Self {
        Disposition::from(raw.to_string())
    }
}

impl From<Disposition> for String {
    fn from(disposition: Disposition) -> Self {
        disposition.as_str().to_string()
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the encounter list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterListItem {
    pub stay_id: i64,
    pub subject_id: i64,
    #[serde(default)]
    pub hadm_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub intime: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub outtime: NaiveDateTime,
    pub gender: String,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub arrival_transport: Option<String>,
    pub disposition: Disposition,
    #[serde(default)]
    pub chiefcomplaint: Option<String>,
    /// Triage acuity, 1 (most severe) to 5
    #[serde(default)]
    pub acuity: Option<i32>,
    pub duration_hours: f64,
}

/// A page of encounters plus the totals needed for pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterPage {
    pub items: Vec<EncounterListItem>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl EncounterPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One coded diagnosis, ordered by `seq_num`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub seq_num: i32,
    pub icd_code: String,
    pub icd_version: i32,
    #[serde(default)]
    pub icd_title: Option<String>,
}

/// Where a medication entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationSource {
    /// Medication reconciliation list taken at arrival
    Medrecon,
    /// Automated dispensing system
    Pyxis,
    #[serde(other)]
    Unknown,
}

impl MedicationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationSource::Medrecon => "medrecon",
            MedicationSource::Pyxis => "pyxis",
            MedicationSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MedicationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A medication entry from either provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default, with = "timestamp::option")]
    pub charttime: Option<NaiveDateTime>,
    #[serde(default)]
    pub name: Option<String>,
    pub source: MedicationSource,
    #[serde(default)]
    pub gsn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full record for one stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterDetail {
    pub stay_id: i64,
    pub subject_id: i64,
    #[serde(default)]
    pub hadm_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub intime: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub outtime: NaiveDateTime,
    pub gender: String,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub arrival_transport: Option<String>,
    pub disposition: Disposition,
    pub duration_hours: f64,
    #[serde(default)]
    pub triage: Option<Triage>,
    #[serde(default)]
    pub vitalsigns: Vec<VitalSign>,
    #[serde(default)]
    pub diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

impl EncounterDetail {
    /// Acuity recorded at triage, if any
    pub fn acuity(&self) -> Option<i32> {
        self.triage.as_ref().and_then(|t| t.acuity)
    }

    /// Diagnoses ordered by sequence number
    ///
    /// The API already orders them; this guards against a backend that doesn't.
    pub fn ordered_diagnoses(&self) -> Vec<&Diagnosis> {
        let mut diagnoses: Vec<&Diagnosis> = self.diagnoses.iter().collect();
        diagnoses.sort_by_key(|d| d.seq_num);
        diagnoses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_ITEM: &str = r#"{
        "stay_id": 30000012,
        "subject_id": 10000032,
        "hadm_id": null,
        "intime": "2180-07-23T12:35:00",
        "outtime": "2180-07-23T17:21:00",
        "gender": "F",
        "race": "WHITE",
        "arrival_transport": "AMBULANCE",
        "disposition": "HOME",
        "chiefcomplaint": "Abd pain",
        "acuity": 3,
        "duration_hours": 4.77
    }"#;

    #[test]
    fn test_list_item_deserialization() {
        let item: EncounterListItem = serde_json::from_str(LIST_ITEM).unwrap();

        assert_eq!(item.stay_id, 30000012);
        assert_eq!(item.hadm_id, None);
        assert_eq!(item.disposition, Disposition::Home);
        assert_eq!(item.acuity, Some(3));
        assert_eq!(item.chiefcomplaint.as_deref(), Some("Abd pain"));
    }

    #[test]
    fn test_unknown_disposition_is_preserved() {
        let json = LIST_ITEM.replace("\"HOME\"", "\"PSYCH HOLD\"");
        let item: EncounterListItem = serde_json::from_str(&json).unwrap();

        assert_eq!(
            item.disposition,
            Disposition::Unrecognized("PSYCH HOLD".to_string())
        );

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["disposition"], "PSYCH HOLD");
    }

    #[test]
    fn test_disposition_wire_values() {
        for disposition in Disposition::known() {
            assert_eq!(&Disposition::from(disposition.as_str()), disposition);
        }
    }

    #[test]
    fn test_medication_source() {
        let json = r#"{"charttime": null, "name": "Acetaminophen", "source": "pyxis", "gsn": null, "description": null}"#;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert_eq!(med.source, MedicationSource::Pyxis);
        assert!(med.charttime.is_none());

        let json = r#"{"name": "Aspirin", "source": "omnicell"}"#;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert_eq!(med.source, MedicationSource::Unknown);
    }

    #[test]
    fn test_detail_defaults_missing_collections() {
        let json = r#"{
            "stay_id": 1, "subject_id": 2,
            "intime": "2180-07-23T12:35:00", "outtime": "2180-07-23T13:35:00",
            "gender": "M", "disposition": "ADMITTED", "duration_hours": 1.0
        }"#;
        let detail: EncounterDetail = serde_json::from_str(json).unwrap();

        assert!(detail.triage.is_none());
        assert!(detail.vitalsigns.is_empty());
        assert!(detail.diagnoses.is_empty());
        assert_eq!(detail.acuity(), None);
    }

    #[test]
    fn test_ordered_diagnoses() {
        let json = r#"{
            "stay_id": 1, "subject_id": 2,
            "intime": "2180-07-23T12:35:00", "outtime": "2180-07-23T13:35:00",
            "gender": "M", "disposition": "ADMITTED", "duration_hours": 1.0,
            "diagnoses": [
                {"seq_num": 2, "icd_code": "R079", "icd_version": 10, "icd_title": null},
                {"seq_num": 1, "icd_code": "I10", "icd_version": 10, "icd_title": "Hypertension"}
            ]
        }"#;
        let detail: EncounterDetail = serde_json::from_str(json).unwrap();
        let ordered = detail.ordered_diagnoses();

        assert_eq!(ordered[0].seq_num, 1);
        assert_eq!(ordered[1].seq_num, 2);
    }
}
