//! Badge Component
//!
//! Colored pills for disposition, acuity and medication source.

use ed_explorer::display::Badge;
use leptos::*;

/// Pale pill for a lookup result
#[component]
pub fn Pill(badge: Badge) -> impl IntoView {
    view! {
        <span class=format!(
            "inline-flex px-2 py-0.5 rounded-full text-xs font-medium {}",
            badge.tone.soft_classes()
        )>
            {badge.label}
        </span>
    }
}

/// Saturated pill, used in the detail header
#[component]
pub fn SolidPill(badge: Badge) -> impl IntoView {
    view! {
        <span class=format!(
            "inline-flex px-3 py-1 rounded-full text-sm font-semibold {}",
            badge.tone.solid_classes()
        )>
            {badge.label}
        </span>
    }
}
