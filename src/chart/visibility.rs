//! Series visibility set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::series::VitalSeries;

/// Which series are currently drawn
///
/// Toggling is a pure set operation; it never touches the data or the
/// series colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesVisibility {
    visible: BTreeSet<VitalSeries>,
}

/// One legend row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub series: VitalSeries,
    pub visible: bool,
}

impl Default for SeriesVisibility {
    /// Heart rate, blood pressure and O2 saturation
    fn default() -> Self {
        Self::only([
            VitalSeries::HeartRate,
            VitalSeries::Sbp,
            VitalSeries::Dbp,
            VitalSeries::O2Sat,
        ])
    }
}

impl SeriesVisibility {
    pub fn only(series: impl IntoIterator<Item = VitalSeries>) -> Self {
        Self {
            visible: series.into_iter().collect(),
        }
    }

    pub fn all() -> Self {
        Self::only(VitalSeries::ALL)
    }

    pub fn is_visible(&self, series: VitalSeries) -> bool {
        self.visible.contains(&series)
    }

    pub fn toggle(&mut self, series: VitalSeries) {
        if !self.visible.remove(&series) {
            self.visible.insert(series);
        }
    }

    /// Copy with `series` flipped
    pub fn toggled(&self, series: VitalSeries) -> Self {
        let mut next = self.clone();
        next.toggle(series);
        next
    }

    /// Visible series in legend order
    pub fn visible(&self) -> impl Iterator<Item = VitalSeries> + '_ {
        VitalSeries::ALL.into_iter().filter(|s| self.is_visible(*s))
    }

    /// Every series in legend order with its state
    pub fn legend(&self) -> Vec<LegendEntry> {
        VitalSeries::ALL
            .into_iter()
            .map(|series| LegendEntry {
                series,
                visible: self.is_visible(series),
            })
            .collect()
    }
}
