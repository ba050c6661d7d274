//! Vital-sign series table
//!
//! Each series has a fixed key, label, color, unit and axis. Colors never
//! depend on which other series are visible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::VitalSign;

/// Which y-axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left axis, auto-scaled
    Primary,
    /// Right axis, fixed to the O2 saturation range
    Secondary,
}

/// One plottable vital sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalSeries {
    HeartRate,
    Sbp,
    Dbp,
    O2Sat,
    RespRate,
    Temperature,
}

impl VitalSeries {
    /// Legend order
    pub const ALL: [VitalSeries; 6] = [
        VitalSeries::HeartRate,
        VitalSeries::Sbp,
        VitalSeries::Dbp,
        VitalSeries::O2Sat,
        VitalSeries::RespRate,
        VitalSeries::Temperature,
    ];

    /// Field name in the API payload
    pub fn key(&self) -> &'static str {
        match self {
            VitalSeries::HeartRate => "heartrate",
            VitalSeries::Sbp => "sbp",
            VitalSeries::Dbp => "dbp",
            VitalSeries::O2Sat => "o2sat",
            VitalSeries::RespRate => "resprate",
            VitalSeries::Temperature => "temperature",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VitalSeries::HeartRate => "Heart Rate",
            VitalSeries::Sbp => "Systolic BP",
            VitalSeries::Dbp => "Diastolic BP",
            VitalSeries::O2Sat => "O2 Saturation",
            VitalSeries::RespRate => "Resp Rate",
            VitalSeries::Temperature => "Temperature",
        }
    }

    /// Line color as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            VitalSeries::HeartRate => "#ef4444",
            VitalSeries::Sbp => "#3b82f6",
            VitalSeries::Dbp => "#60a5fa",
            VitalSeries::O2Sat => "#22c55e",
            VitalSeries::RespRate => "#f59e0b",
            VitalSeries::Temperature => "#8b5cf6",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VitalSeries::HeartRate => "bpm",
            VitalSeries::Sbp | VitalSeries::Dbp => "mmHg",
            VitalSeries::O2Sat => "%",
            VitalSeries::RespRate => "/min",
            VitalSeries::Temperature => "°F",
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            VitalSeries::O2Sat => Axis::Secondary,
            _ => Axis::Primary,
        }
    }

    /// Read this series' value from one observation
    pub fn of(&self, vital: &VitalSign) -> Option<f64> {
        match self {
            VitalSeries::HeartRate => vital.heartrate,
            VitalSeries::Sbp => vital.sbp,
            VitalSeries::Dbp => vital.dbp,
            VitalSeries::O2Sat => vital.o2sat,
            VitalSeries::RespRate => vital.resprate,
            VitalSeries::Temperature => vital.temperature,
        }
    }
}

impl fmt::Display for VitalSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown series key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown vital series: {0} (expected one of heartrate, sbp, dbp, o2sat, resprate, temperature)")]
pub struct UnknownSeries(pub String);

impl FromStr for VitalSeries {
    type Err = UnknownSeries;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heartrate" | "hr" => Ok(VitalSeries::HeartRate),
            "sbp" => Ok(VitalSeries::Sbp),
            "dbp" => Ok(VitalSeries::Dbp),
            "o2sat" | "spo2" => Ok(VitalSeries::O2Sat),
            "resprate" | "rr" => Ok(VitalSeries::RespRate),
            "temperature" | "temp" => Ok(VitalSeries::Temperature),
            _ => Err(UnknownSeries(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_o2_on_secondary_axis() {
        let secondary: Vec<_> = VitalSeries::ALL
            .iter()
            .filter(|s| s.axis() == Axis::Secondary)
            .collect();
        assert_eq!(secondary, vec![&VitalSeries::O2Sat]);
    }

    #[test]
    fn test_colors_are_distinct() {
        let mut colors: Vec<_> = VitalSeries::ALL.iter().map(|s| s.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), VitalSeries::ALL.len());
    }

    #[test]
    fn test_parse_keys() {
        for series in VitalSeries::ALL {
            assert_eq!(series.key().parse::<VitalSeries>().unwrap(), series);
        }
        assert_eq!("HR".parse::<VitalSeries>().unwrap(), VitalSeries::HeartRate);
        assert!("glucose".parse::<VitalSeries>().is_err());
    }
}
