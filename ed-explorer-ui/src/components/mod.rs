//! UI Components
//!
//! Reusable Leptos components for the dashboard. Components receive state
//! snapshots as signals and report edits through callbacks.

pub mod badge;
pub mod encounter;
pub mod encounter_table;
pub mod filter_panel;
pub mod loading;
pub mod nav;
pub mod vitals_chart;

pub use encounter::{
    DiagnosesSection, EncounterHeader, FailurePanel, MedicationsSection, TriageSection,
};
pub use encounter_table::EncounterTable;
pub use filter_panel::FilterPanel;
pub use loading::DetailSkeleton;
pub use nav::Nav;
pub use vitals_chart::VitalsChartView;
