//! Vital signs to chart points
//!
//! The adapter is pure: observations go in, an ordered list of points comes
//! out. Rendering (canvas, terminal table) reads the result through
//! [`VitalsChart::frame`].

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::trace;

use super::axis::{AxisDomain, O2_SAT_DOMAIN};
use super::series::{Axis, VitalSeries};
use super::visibility::SeriesVisibility;
use crate::model::VitalSign;

/// Shown instead of a chart when an encounter has no vitals at all
pub const EMPTY_STATE_MESSAGE: &str = "No vital signs recorded for this encounter";

/// Primary domain used when no visible series has a value
pub const FALLBACK_PRIMARY_DOMAIN: AxisDomain = AxisDomain {
    min: 0.0,
    max: 100.0,
};

/// One observation, ready to plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Axis tick label, `HH:MM`
    pub time_label: String,
    /// Hover label with the date, `Mon D, HH:MM`
    pub tooltip_label: String,
    pub charttime: NaiveDateTime,
    pub heartrate: Option<f64>,
    pub sbp: Option<f64>,
    pub dbp: Option<f64>,
    pub o2sat: Option<f64>,
    pub resprate: Option<f64>,
    pub temperature: Option<f64>,
}

impl ChartPoint {
    fn from_vital(vital: &VitalSign) -> Self {
        Self {
            time_label: vital.charttime.format("%H:%M").to_string(),
            tooltip_label: vital.charttime.format("%b %-d, %H:%M").to_string(),
            charttime: vital.charttime,
            heartrate: vital.heartrate,
            sbp: vital.sbp,
            dbp: vital.dbp,
            o2sat: vital.o2sat,
            resprate: vital.resprate,
            temperature: vital.temperature,
        }
    }

    pub fn value(&self, series: VitalSeries) -> Option<f64> {
        match series {
            VitalSeries::HeartRate => self.heartrate,
            VitalSeries::Sbp => self.sbp,
            VitalSeries::Dbp => self.dbp,
            VitalSeries::O2Sat => self.o2sat,
            VitalSeries::RespRate => self.resprate,
            VitalSeries::Temperature => self.temperature,
        }
    }
}

/// A run of consecutive slots that all have a value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// `(slot, value)` pairs; slots are indices into [`VitalsChart::points`]
    pub points: Vec<(usize, f64)>,
}

/// Everything needed to draw one visible series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLine {
    pub series: VitalSeries,
    pub color: &'static str,
    pub axis: Axis,
    pub segments: Vec<Segment>,
}

/// Drawable view of a chart under one visibility set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    /// Number of x slots
    pub slots: usize,
    pub primary: AxisDomain,
    /// Present only while O2 saturation is visible
    pub secondary: Option<AxisDomain>,
    pub lines: Vec<SeriesLine>,
}

/// Result of preparing an encounter's vitals
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// The encounter has no observations; show [`EMPTY_STATE_MESSAGE`]
    NoObservations,
    Ready(VitalsChart),
}

impl ChartOutcome {
    pub fn chart(&self) -> Option<&VitalsChart> {
        match self {
            ChartOutcome::Ready(chart) => Some(chart),
            ChartOutcome::NoObservations => None,
        }
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            ChartOutcome::NoObservations => Some(EMPTY_STATE_MESSAGE),
            ChartOutcome::Ready(_) => None,
        }
    }
}

/// Observations in chart order
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsChart {
    points: Vec<ChartPoint>,
}

impl VitalsChart {
    /// Sort observations by chart time and project them to points
    ///
    /// The sort is stable: observations sharing a timestamp keep their
    /// input order. Missing measurements stay missing.
    pub fn build(vitals: &[VitalSign]) -> ChartOutcome {
        if vitals.is_empty() {
            return ChartOutcome::NoObservations;
        }

        let mut ordered: Vec<&VitalSign> = vitals.iter().collect();
        ordered.sort_by_key(|v| v.charttime);

        let points: Vec<ChartPoint> = ordered.into_iter().map(ChartPoint::from_vital).collect();
        trace!(count = points.len(), "Prepared vitals chart");

        ChartOutcome::Ready(Self { points })
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values of one series in slot order, gaps included
    pub fn values(&self, series: VitalSeries) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value(series)).collect()
    }

    /// Split a series at every missing value
    pub fn segments(&self, series: VitalSeries) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current: Vec<(usize, f64)> = Vec::new();

        for (slot, point) in self.points.iter().enumerate() {
            match point.value(series) {
                Some(value) => current.push((slot, value)),
                None if !current.is_empty() => segments.push(Segment {
                    points: std::mem::take(&mut current),
                }),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(Segment { points: current });
        }

        segments
    }

    /// Primary domain fitted to the visible primary-axis series
    pub fn primary_domain(&self, visibility: &SeriesVisibility) -> Option<AxisDomain> {
        let values = visibility
            .visible()
            .filter(|s| s.axis() == Axis::Primary)
            .flat_map(|s| self.points.iter().filter_map(move |p| p.value(s)))
            .collect::<Vec<_>>();
        AxisDomain::fit(values)
    }

    /// Lines and axes for the given visibility
    pub fn frame(&self, visibility: &SeriesVisibility) -> ChartFrame {
        let lines = visibility
            .visible()
            .map(|series| SeriesLine {
                series,
                color: series.color(),
                axis: series.axis(),
                segments: self.segments(series),
            })
            .collect();

        ChartFrame {
            slots: self.points.len(),
            primary: self
                .primary_domain(visibility)
                .unwrap_or(FALLBACK_PRIMARY_DOMAIN),
            secondary: visibility
                .is_visible(VitalSeries::O2Sat)
                .then_some(O2_SAT_DOMAIN),
            lines,
        }
    }
}
