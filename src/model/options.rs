//! Filter vocabularies served by `GET /filters/options`
//!
//! These populate the filter controls. They are not used to validate input
//! before a request is sent.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Earliest and latest arrival in the dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(default, with = "timestamp::option")]
    pub min: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub max: Option<NaiveDateTime>,
}

/// Distinct values available for each filter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default)]
    pub races: Vec<String>,
    #[serde(default)]
    pub dispositions: Vec<String>,
    #[serde(default)]
    pub chief_complaints: Vec<String>,
    #[serde(default)]
    pub date_range: DateBounds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_options_deserialization() {
        let json = r#"{
            "genders": ["F", "M"],
            "races": ["ASIAN", "WHITE"],
            "dispositions": ["ADMITTED", "HOME"],
            "chief_complaints": ["Chest pain"],
            "date_range": {"min": "2110-01-11T10:00:00", "max": null}
        }"#;
        let options: FilterOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.genders, vec!["F", "M"]);
        assert!(options.date_range.min.is_some());
        assert!(options.date_range.max.is_none());
    }
}
