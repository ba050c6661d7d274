//! Encounter detail session
//!
//! One navigation at a time. Opening a stay issues a ticket keyed on the stay
//! id and a navigation counter; a response is applied only if it belongs to
//! the latest navigation, so a slow answer for a previously viewed stay
//! cannot replace the current one.

use tracing::{debug, info};

use super::request::ViewState;
use crate::chart::{ChartFrame, ChartOutcome, SeriesVisibility, VitalSeries, VitalsChart};
use crate::error::FetchResult;
use crate::model::EncounterDetail;

/// Identifies one detail navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket {
    pub stay_id: i64,
    navigation: u64,
}

/// Detail page state
#[derive(Debug, Clone, Default)]
pub struct DetailSession {
    navigation: u64,
    stay_id: Option<i64>,
    view: ViewState<EncounterDetail>,
    chart: Option<ChartOutcome>,
    visibility: SeriesVisibility,
}

impl DetailSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stay currently being shown or loaded
    pub fn stay_id(&self) -> Option<i64> {
        self.stay_id
    }

    pub fn view(&self) -> &ViewState<EncounterDetail> {
        &self.view
    }

    /// Prepared vitals; `None` until the detail has loaded
    pub fn chart(&self) -> Option<&ChartOutcome> {
        self.chart.as_ref()
    }

    pub fn visibility(&self) -> &SeriesVisibility {
        &self.visibility
    }

    /// Start loading a stay
    ///
    /// Series visibility goes back to the default for every new stay.
    pub fn open(&mut self, stay_id: i64) -> NavigationTicket {
        self.navigation += 1;
        self.stay_id = Some(stay_id);
        self.view = ViewState::Loading;
        self.chart = None;
        self.visibility = SeriesVisibility::default();
        debug!(stay_id, navigation = self.navigation, "Opening encounter");

        NavigationTicket {
            stay_id,
            navigation: self.navigation,
        }
    }

    /// Leave the detail view; anything still in flight becomes stale
    pub fn close(&mut self) {
        self.navigation += 1;
        self.stay_id = None;
        self.view = ViewState::Loading;
        self.chart = None;
    }

    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        ticket.navigation == self.navigation && Some(ticket.stay_id) == self.stay_id
    }

    /// Apply a finished detail request
    pub fn complete(&mut self, ticket: &NavigationTicket, result: FetchResult<EncounterDetail>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stay_id = ticket.stay_id,
                navigation = ticket.navigation,
                "Discarding stale encounter detail"
            );
            return false;
        }

        self.chart = result
            .as_ref()
            .ok()
            .map(|detail| VitalsChart::build(&detail.vitalsigns));
        self.view = ViewState::resolve(result, |_| false);
        info!(stay_id = ticket.stay_id, state = self.view.kind(), "Encounter detail updated");
        true
    }

    /// Show or hide one series; the data is not touched
    pub fn toggle_series(&mut self, series: VitalSeries) {
        self.visibility.toggle(series);
    }

    pub fn set_visibility(&mut self, visibility: SeriesVisibility) {
        self.visibility = visibility;
    }

    /// Drawable chart for the current visibility
    pub fn frame(&self) -> Option<ChartFrame> {
        self.chart
            .as_ref()
            .and_then(ChartOutcome::chart)
            .map(|chart| chart.frame(&self.visibility))
    }
}
