//! Pages
//!
//! Top-level page components for each route.

pub mod detail;
pub mod list;

pub use detail::DetailPage;
pub use list::ListPage;
