//! Loading Component
//!
//! Skeleton states shown while a request is in flight.

use leptos::*;

/// Skeleton loader for the filter panel
#[component]
pub fn FilterSkeleton() -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-4 animate-pulse">
            <div class="h-5 bg-gray-200 rounded w-1/6 mb-4" />
            <div class="grid grid-cols-1 md:grid-cols-5 gap-4">
                {(0..5).map(|_| view! { <div class="h-10 bg-gray-200 rounded" /> }).collect_view()}
            </div>
        </div>
    }
}

/// Skeleton loader for the encounter table
#[component]
pub fn TableSkeleton(
    #[prop(default = 10)]
    rows: usize,
) -> impl IntoView {
    view! {
        <div class="space-y-3 animate-pulse p-4">
            <div class="bg-gray-200 rounded h-8" />
            {(0..rows).map(|_| view! {
                <div class="bg-gray-100 rounded h-12" />
            }).collect_view()}
        </div>
    }
}

/// Skeleton loader for the encounter detail page
#[component]
pub fn DetailSkeleton() -> impl IntoView {
    view! {
        <div class="space-y-6 animate-pulse">
            <div class="h-8 bg-gray-200 rounded w-1/3" />
            <div class="bg-white rounded-lg shadow p-6">
                <div class="h-6 bg-gray-200 rounded w-1/4 mb-4" />
                <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                    {(0..4).map(|_| view! { <div class="h-12 bg-gray-200 rounded" /> }).collect_view()}
                </div>
            </div>
            <div class="bg-white rounded-lg shadow p-6">
                <div class="h-6 bg-gray-200 rounded w-1/4 mb-4" />
                <div class="h-64 bg-gray-200 rounded" />
            </div>
        </div>
    }
}
