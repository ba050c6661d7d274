//! ED Explorer Dashboard
//!
//! Browser dashboard for emergency department encounters, built with Leptos
//! (WASM).
//!
//! # Features
//!
//! - Filterable, sortable, paginated encounter list
//! - Encounter detail with triage, diagnoses and medications
//! - Vital signs timeline on a dual-axis canvas chart
//!
//! # Architecture
//!
//! Client-side rendered (CSR). Each page owns its state as a signal holding
//! an `ed_explorer` session and passes snapshots plus callbacks to its
//! children. Requests go to the encounter API over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
