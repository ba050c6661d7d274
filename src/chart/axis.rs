//! Y-axis domains
//!
//! The primary axis is fitted to whatever is visible, padded by 10% and
//! snapped outward to a round step. The secondary axis never moves.

use serde::{Deserialize, Serialize};

/// Number of intervals between ticks
const TICK_INTERVALS: u32 = 5;

/// Closed value range of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

/// Fixed range for O2 saturation
pub const O2_SAT_DOMAIN: AxisDomain = AxisDomain {
    min: 80.0,
    max: 100.0,
};

/// Side of the domain a value falls off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Below,
    Above,
}

impl AxisDomain {
    /// Fit a domain around the given values
    ///
    /// Returns `None` when there is nothing to fit. Non-finite values are
    /// ignored. A domain fitted to non-negative values never dips below zero.
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        for value in values.into_iter().filter(|v| v.is_finite()) {
            lo = lo.min(value);
            hi = hi.max(value);
        }

        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }

        let non_negative = lo >= 0.0;
        let range = hi - lo;
        let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
        let padded_lo = lo - padding;
        let padded_hi = hi + padding;

        let step = nice_step((padded_hi - padded_lo) / TICK_INTERVALS as f64);
        let mut min = (padded_lo / step).floor() * step;
        let max = (padded_hi / step).ceil() * step;

        if non_negative && min < 0.0 {
            min = 0.0;
        }

        Some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Fraction of the axis height for `value`, 0.0 at `min` and 1.0 at `max`
    ///
    /// Values outside the domain are clamped to its edge.
    pub fn position(&self, value: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }

    /// Edge a value is pinned to by [`AxisDomain::position`], if any
    pub fn beyond(&self, value: f64) -> Option<Edge> {
        if value < self.min {
            Some(Edge::Below)
        } else if value > self.max {
            Some(Edge::Above)
        } else {
            None
        }
    }

    /// Evenly spaced tick values from `min` to `max` inclusive
    pub fn ticks(&self) -> Vec<f64> {
        (0..=TICK_INTERVALS)
            .map(|i| self.min + self.span() * i as f64 / TICK_INTERVALS as f64)
            .collect()
    }
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}
