//! Encounter API access
//!
//! [`EncounterSource`] is the seam between the view state and the network.
//! [`EncounterClient`] implements it over HTTP; tests and tools can supply
//! their own.

mod http;

pub use http::{ClientConfig, EncounterClient};

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::model::{EncounterDetail, EncounterPage, FilterOptions};
use crate::query::QueryDescriptor;
use crate::state::{DetailSession, ListSession};

/// Read-only access to encounter records
#[async_trait]
pub trait EncounterSource: Send + Sync {
    /// One page of encounters matching the descriptor
    async fn list_encounters(&self, query: &QueryDescriptor) -> FetchResult<EncounterPage>;

    /// Full record for one stay
    async fn encounter_detail(&self, stay_id: i64) -> FetchResult<EncounterDetail>;

    /// Values available for each filter control
    async fn filter_options(&self) -> FetchResult<FilterOptions>;
}

/// Fetch the page for the session's current descriptor and apply it
///
/// Returns whether the result was applied.
pub async fn refresh_list<S: EncounterSource + ?Sized>(source: &S, session: &mut ListSession) -> bool {
    let ticket = session.begin_fetch();
    let result = source.list_encounters(ticket.descriptor()).await;
    session.complete(&ticket, result)
}

/// Open a stay in the detail session and load it
pub async fn open_detail<S: EncounterSource + ?Sized>(
    source: &S,
    session: &mut DetailSession,
    stay_id: i64,
) -> bool {
    let ticket = session.open(stay_id);
    let result = source.encounter_detail(stay_id).await;
    session.complete(&ticket, result)
}
