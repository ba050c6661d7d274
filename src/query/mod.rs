//! Encounter list query state
//!
//! - **Descriptor**: the immutable filter/sort/page value and its query-string form
//! - **Controller**: current descriptor, transitions and the stale-response guard
//!
//! # Example
//!
//! ```rust
//! use ed_explorer::query::{FilterChange, Gender, QueryController, SortColumn};
//!
//! let mut controller = QueryController::default();
//! controller.set_filter(FilterChange::new().gender(Some(Gender::Male)));
//! controller.set_sort(SortColumn::StayId);
//!
//! let ticket = controller.dispatch();
//! assert!(controller.is_current(&ticket));
//! assert!(ticket.descriptor().to_query_string().starts_with("gender=M"));
//! ```

mod controller;
mod descriptor;
mod error;

pub use controller::{QueryController, RequestTicket};
pub use descriptor::{
    parse_date, FilterChange, Gender, QueryDescriptor, SortColumn, SortOrder, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
pub use error::{QueryError, QueryResult};
