//! Navigation Component
//!
//! Page header with the dashboard title.

use leptos::*;
use leptos_router::*;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="bg-white border-b border-gray-200 shadow-sm">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🏥"</span>
                        <div>
                            <span class="block text-xl font-bold text-gray-900">"MIMIC IV ED Dashboard"</span>
                            <span class="block text-xs text-gray-500">"Explore emergency department encounters"</span>
                        </div>
                    </A>
                </div>
            </div>
        </nav>
    }
}
