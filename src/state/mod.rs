//! View state for the list and detail pages
//!
//! Plain structs shared by the browser dashboard and the interactive CLI.
//! Neither does I/O: they hand out tickets, the caller performs the request,
//! and the result comes back through `complete`.

mod detail;
mod list;
mod request;

pub use detail::{DetailSession, NavigationTicket};
pub use list::{ListSession, PageWindow};
pub use request::ViewState;
