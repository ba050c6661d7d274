//! Vital-sign observations and the triage snapshot

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A single charted set of vitals
///
/// Every measurement is optional. `None` means "not measured" and is never
/// interchangeable with zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSign {
    #[serde(with = "timestamp")]
    pub charttime: NaiveDateTime,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub heartrate: Option<f64>,
    #[serde(default)]
    pub resprate: Option<f64>,
    #[serde(default)]
    pub o2sat: Option<f64>,
    #[serde(default)]
    pub sbp: Option<f64>,
    #[serde(default)]
    pub dbp: Option<f64>,
    #[serde(default)]
    pub rhythm: Option<String>,
    /// Pain score as charted (usually "0".."10", sometimes free text)
    #[serde(default)]
    pub pain: Option<String>,
}

impl VitalSign {
    /// Observation with only a timestamp; used as a starting point in tests
    /// and fixtures
    pub fn at(charttime: NaiveDateTime) -> Self {
        Self {
            charttime,
            temperature: None,
            heartrate: None,
            resprate: None,
            o2sat: None,
            sbp: None,
            dbp: None,
            rhythm: None,
            pain: None,
        }
    }

    /// Builder method: set heart rate
    pub fn heartrate(mut self, value: f64) -> Self {
        self.heartrate = Some(value);
        self
    }

    /// Builder method: set blood pressure
    pub fn blood_pressure(mut self, sbp: f64, dbp: f64) -> Self {
        self.sbp = Some(sbp);
        self.dbp = Some(dbp);
        self
    }

    /// Builder method: set oxygen saturation
    pub fn o2sat(mut self, value: f64) -> Self {
        self.o2sat = Some(value);
        self
    }

    /// Builder method: set respiratory rate
    pub fn resprate(mut self, value: f64) -> Self {
        self.resprate = Some(value);
        self
    }

    /// Builder method: set temperature
    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    /// Pain score as an integer, when the charted text is one
    pub fn pain_score(&self) -> Option<i32> {
        parse_pain(self.pain.as_deref())
    }
}

/// Initial assessment taken at arrival
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Triage {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub heartrate: Option<f64>,
    #[serde(default)]
    pub resprate: Option<f64>,
    #[serde(default)]
    pub o2sat: Option<f64>,
    #[serde(default)]
    pub sbp: Option<f64>,
    #[serde(default)]
    pub dbp: Option<f64>,
    #[serde(default)]
    pub pain: Option<String>,
    #[serde(default)]
    pub acuity: Option<i32>,
    #[serde(default)]
    pub chiefcomplaint: Option<String>,
}

impl Triage {
    pub fn pain_score(&self) -> Option<i32> {
        parse_pain(self.pain.as_deref())
    }
}

fn parse_pain(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|p| p.trim().parse::<i32>().ok())
}
