//! # ED Explorer
//!
//! Client-side core for browsing emergency department encounters: the list
//! query state, the vitals chart adapter, display lookups, and a REST client
//! for the encounter API.
//!
//! ## Modules
//!
//! - [`query`]: filter/sort/page descriptor and the stale-response guard
//! - [`chart`]: vitals ordering, gap-aware series and axis domains
//! - [`state`]: list and detail view state
//! - [`display`]: badges, labels and value formatting
//! - [`client`]: HTTP access to the encounter API (`native` feature)
//!
//! The `native` feature (on by default) adds the HTTP client, config files
//! and terminal rendering. The browser dashboard builds without it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ed_explorer::client::{refresh_list, ClientConfig, EncounterClient};
//! use ed_explorer::query::{FilterChange, Gender};
//! use ed_explorer::state::{ListSession, ViewState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EncounterClient::new(ClientConfig::default())?;
//!     let mut session = ListSession::default();
//!
//!     session.set_filter(FilterChange::new().gender(Some(Gender::Female)));
//!     refresh_list(&client, &mut session).await;
//!
//!     if let ViewState::Ready(page) = session.view() {
//!         println!("{} encounters", page.total);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod display;
pub mod error;
pub mod model;
pub mod query;
pub mod state;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod terminal;

// Re-export top-level types for convenience
pub use error::{FetchError, FetchResult};

pub use model::{
    Diagnosis, Disposition, EncounterDetail, EncounterListItem, EncounterPage, FilterOptions,
    Medication, MedicationSource, Triage, VitalSign,
};

pub use query::{
    FilterChange, Gender, QueryController, QueryDescriptor, QueryError, RequestTicket, SortColumn,
    SortOrder,
};

pub use chart::{ChartOutcome, ChartPoint, SeriesVisibility, VitalSeries, VitalsChart};

pub use state::{DetailSession, ListSession, ViewState};

#[cfg(feature = "native")]
pub use client::{ClientConfig, EncounterClient, EncounterSource};

#[cfg(feature = "native")]
pub use config::{generate_default_config, Config, ConfigError, LoggingConfig, RejectedConfig};
