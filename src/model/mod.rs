//! Domain model
//!
//! Read-only projections of the encounter API. The client never mutates
//! these; it only keeps its own query and view state around them.

mod encounter;
mod options;
pub mod timestamp;
mod vitals;

pub use encounter::{
    Diagnosis, Disposition, EncounterDetail, EncounterListItem, EncounterPage, Medication,
    MedicationSource,
};
pub use options::{DateBounds, FilterOptions};
pub use vitals::{Triage, VitalSign};
