//! Encounter API access

pub mod client;

pub use client::{fetch_encounter, fetch_encounters, fetch_filter_options, get_api_base};
