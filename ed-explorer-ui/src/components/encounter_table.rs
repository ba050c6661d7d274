//! Encounter Table Component
//!
//! Sortable encounter table with pagination footer.

use ed_explorer::display::{
    acuity_badge, disposition_badge, format_arrival, format_duration, gender_label, or_missing,
};
use ed_explorer::query::{QueryDescriptor, SortColumn};
use ed_explorer::state::{PageWindow, ViewState};
use ed_explorer::{EncounterListItem, EncounterPage};
use leptos::*;
use leptos_router::*;

use super::badge::Pill;
use super::loading::TableSkeleton;

/// Encounter list with loading, empty and failure states
#[component]
pub fn EncounterTable(
    #[prop(into)]
    state: Signal<ViewState<EncounterPage>>,
    #[prop(into)]
    descriptor: Signal<QueryDescriptor>,
    #[prop(into)]
    on_sort: Callback<SortColumn>,
    /// Paging bounds as the query controller knows them
    #[prop(into)]
    has_previous: Signal<bool>,
    #[prop(into)]
    has_next: Signal<bool>,
    #[prop(into)]
    on_page: Callback<u32>,
    #[prop(into)]
    on_clear: Callback<()>,
) -> impl IntoView {
    move || match state.get() {
        ViewState::Loading => view! { <TableSkeleton /> }.into_view(),
        ViewState::Empty => view! {
            <div class="text-center py-12">
                <p class="text-gray-500 mb-4">"No encounters match the current filters"</p>
                <Show when=move || descriptor.with(QueryDescriptor::has_active_filters)>
                    <button
                        class="px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg text-sm"
                        on:click=move |_| on_clear.call(())
                    >
                        "Clear all"
                    </button>
                </Show>
            </div>
        }
        .into_view(),
        ViewState::Failed(err) => view! {
            <div class="text-center py-12">
                <h3 class="text-lg font-semibold text-red-700 mb-2">{err.title()}</h3>
                <p class="text-gray-600">{err.user_message()}</p>
            </div>
        }
        .into_view(),
        ViewState::Ready(page) => {
            let window = PageWindow::from_page(&page);
            view! {
                <div class="overflow-x-auto">
                    <table class="min-w-full divide-y divide-gray-200 text-sm">
                        <thead class="bg-gray-50">
                            <tr>
                                <SortHeader column=SortColumn::StayId descriptor=descriptor on_sort=on_sort />
                                <SortHeader column=SortColumn::Intime descriptor=descriptor on_sort=on_sort />
                                <SortHeader column=SortColumn::Outtime descriptor=descriptor on_sort=on_sort />
                                <PlainHeader label="Gender" />
                                <PlainHeader label="Race" />
                                <PlainHeader label="Chief Complaint" />
                                <PlainHeader label="Acuity" />
                                <PlainHeader label="Duration" />
                                <SortHeader column=SortColumn::Disposition descriptor=descriptor on_sort=on_sort />
                            </tr>
                        </thead>
                        <tbody class="bg-white divide-y divide-gray-100">
                            {page.items.into_iter().map(|item| view! { <EncounterRow item=item /> }).collect_view()}
                        </tbody>
                    </table>
                </div>
                <Pagination window=window has_previous=has_previous has_next=has_next on_page=on_page />
            }
            .into_view()
        }
    }
}

#[component]
fn PlainHeader(label: &'static str) -> impl IntoView {
    view! {
        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">
            {label}
        </th>
    }
}

/// Clickable column header; shows the arrow on the active sort column
#[component]
fn SortHeader(
    column: SortColumn,
    descriptor: Signal<QueryDescriptor>,
    on_sort: Callback<SortColumn>,
) -> impl IntoView {
    let arrow = move || {
        descriptor.with(|d| {
            if d.sort_by() == column {
                d.sort_order().arrow()
            } else {
                ""
            }
        })
    };

    view! {
        <th
            class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider cursor-pointer hover:text-gray-900 select-none"
            on:click=move |_| on_sort.call(column)
        >
            {column.label()}
            <span class="ml-1">{arrow}</span>
        </th>
    }
}

#[component]
fn EncounterRow(item: EncounterListItem) -> impl IntoView {
    let navigate = use_navigate();
    let href = format!("/encounter/{}", item.stay_id);
    let gender = gender_label(&item.gender).to_string();
    let race = or_missing(item.race.as_deref()).to_string();
    let complaint = or_missing(item.chiefcomplaint.as_deref()).to_string();

    view! {
        <tr
            class="hover:bg-blue-50 cursor-pointer"
            on:click=move |_| navigate(&href, Default::default())
        >
            <td class="px-4 py-3 font-mono text-blue-700">{item.stay_id}</td>
            <td class="px-4 py-3 whitespace-nowrap">{format_arrival(&item.intime)}</td>
            <td class="px-4 py-3 whitespace-nowrap">{format_arrival(&item.outtime)}</td>
            <td class="px-4 py-3">{gender}</td>
            <td class="px-4 py-3">{race}</td>
            <td class="px-4 py-3 max-w-xs truncate">{complaint}</td>
            <td class="px-4 py-3">
                {acuity_badge(item.acuity).map(|badge| view! { <Pill badge=badge /> })}
            </td>
            <td class="px-4 py-3">{format_duration(item.duration_hours)}</td>
            <td class="px-4 py-3"><Pill badge=disposition_badge(&item.disposition) /></td>
        </tr>
    }
}

#[component]
fn Pagination(
    window: PageWindow,
    has_previous: Signal<bool>,
    has_next: Signal<bool>,
    on_page: Callback<u32>,
) -> impl IntoView {
    let page = window.page;
    let button = "px-3 py-1 rounded-lg border border-gray-300 text-sm disabled:opacity-40 disabled:cursor-not-allowed hover:bg-gray-100";

    view! {
        <div class="flex items-center justify-between px-4 py-3 border-t border-gray-200 text-sm text-gray-600">
            <span>{window.summary()}</span>
            <div class="flex items-center space-x-2">
                <button
                    class=button
                    disabled=move || !has_previous.get()
                    on:click=move |_| on_page.call(page.saturating_sub(1))
                >
                    "Previous"
                </button>
                <span>{window.position()}</span>
                <button
                    class=button
                    disabled=move || !has_next.get()
                    on:click=move |_| on_page.call(page + 1)
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
