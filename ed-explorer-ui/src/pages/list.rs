//! Encounter List Page
//!
//! Owns the list session. Every edit goes through the session; whenever the
//! descriptor changes a request is started, and only the answer to the most
//! recent request is shown.

use ed_explorer::query::{FilterChange, SortColumn};
use ed_explorer::state::ListSession;
use ed_explorer::FilterOptions;
use leptos::*;

use crate::api;
use crate::components::{EncounterTable, FilterPanel};

#[component]
pub fn ListPage() -> impl IntoView {
    let session = create_rw_signal(ListSession::default());
    let options = create_rw_signal(None::<FilterOptions>);

    let descriptor = create_memo(move |_| session.with(|s| s.descriptor().clone()));
    let view_state = Signal::derive(move || session.with(|s| s.view().clone()));
    let has_previous = Signal::derive(move || session.with(|s| s.controller().has_previous_page()));
    let has_next = Signal::derive(move || session.with(|s| s.controller().has_next_page()));

    // Filter vocabularies load once
    spawn_local(async move {
        match api::fetch_filter_options().await {
            Ok(loaded) => options.set(Some(loaded)),
            Err(e) => {
                web_sys::console::warn_1(&format!("Filter options unavailable: {}", e).into());
                options.set(Some(FilterOptions::default()));
            }
        }
    });

    // Fetch on mount and on every descriptor change
    create_effect(move |_| {
        descriptor.track();

        let Some(ticket) = session.try_update(|s| s.begin_fetch()) else {
            return;
        };

        spawn_local(async move {
            let result = api::fetch_encounters(ticket.descriptor()).await;
            session.try_update(|s| {
                s.complete(&ticket, result);
            });
        });
    });

    let on_change = Callback::new(move |change: FilterChange| {
        session.update(|s| {
            s.set_filter(change);
        });
    });
    let on_toggle_race = Callback::new(move |race: String| {
        session.update(|s| {
            s.toggle_race(&race);
        });
    });
    let on_toggle_disposition = Callback::new(move |disposition: String| {
        session.update(|s| {
            s.toggle_disposition(&disposition);
        });
    });
    let on_clear = Callback::new(move |_: ()| {
        session.update(|s| {
            s.clear_filters();
        });
    });
    let on_sort = Callback::new(move |column: SortColumn| {
        session.update(|s| {
            s.set_sort(column);
        });
    });
    let on_page = Callback::new(move |page: u32| {
        session.update(|s| {
            s.set_page(page);
        });
    });

    view! {
        <div class="space-y-6">
            <FilterPanel
                options=options
                descriptor=descriptor
                on_change=on_change
                on_toggle_race=on_toggle_race
                on_toggle_disposition=on_toggle_disposition
                on_clear=on_clear
            />

            <div class="bg-white rounded-lg shadow">
                <EncounterTable
                    state=view_state
                    descriptor=descriptor
                    on_sort=on_sort
                    has_previous=has_previous
                    has_next=has_next
                    on_page=on_page
                    on_clear=on_clear
                />
            </div>
        </div>
    }
}
