//! Filter Panel Component
//!
//! Gender, race, disposition, arrival date and chief complaint filters.
//! The panel holds no state of its own: it renders the current descriptor
//! and reports every edit through a callback.

use chrono::NaiveDate;
use ed_explorer::query::{parse_date, FilterChange, Gender, QueryDescriptor};
use ed_explorer::FilterOptions;
use leptos::*;

use super::loading::FilterSkeleton;

const CONTROL_CLASS: &str =
    "w-full px-3 py-2 border border-gray-300 rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-blue-500";

/// Filter controls for the encounter list
#[component]
pub fn FilterPanel(
    /// Filter vocabularies; `None` while they load
    #[prop(into)]
    options: Signal<Option<FilterOptions>>,
    #[prop(into)]
    descriptor: Signal<QueryDescriptor>,
    #[prop(into)]
    on_change: Callback<FilterChange>,
    #[prop(into)]
    on_toggle_race: Callback<String>,
    #[prop(into)]
    on_toggle_disposition: Callback<String>,
    #[prop(into)]
    on_clear: Callback<()>,
) -> impl IntoView {
    let has_filters = Signal::derive(move || descriptor.with(QueryDescriptor::has_active_filters));

    move || match options.get() {
        None => view! { <FilterSkeleton /> }.into_view(),
        Some(options) => {
            let races = options.races.clone();
            let dispositions = options.dispositions.clone();
            let genders: Vec<Gender> = options
                .genders
                .iter()
                .filter_map(|g| g.parse().ok())
                .collect();
            let min_date = options.date_range.min.map(|t| t.date().to_string());
            let max_date = options.date_range.max.map(|t| t.date().to_string());
            let complaints = options.chief_complaints.clone();

            view! {
                <div class="bg-white rounded-lg shadow p-4 space-y-4">
                    <div class="flex items-center justify-between">
                        <h2 class="text-lg font-semibold">"Filters"</h2>
                        <Show when=move || has_filters.get()>
                            <button
                                class="text-sm text-blue-600 hover:text-blue-800"
                                on:click=move |_| on_clear.call(())
                            >
                                "Clear all"
                            </button>
                        </Show>
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-4 gap-4">
                        <label class="block">
                            <span class="block text-sm font-medium text-gray-700 mb-1">"Gender"</span>
                            <select
                                class=CONTROL_CLASS
                                prop:value=move || descriptor.with(|d| d.gender().map(|g| g.code()).unwrap_or(""))
                                on:change=move |ev| {
                                    let gender = event_target_value(&ev).parse::<Gender>().ok();
                                    on_change.call(FilterChange::new().gender(gender));
                                }
                            >
                                <option value="">"All"</option>
                                {genders.into_iter().map(|g| view! {
                                    <option value=g.code()>{g.label()}</option>
                                }).collect_view()}
                            </select>
                        </label>

                        <DateField
                            label="Arrived from"
                            min=min_date.clone()
                            max=max_date.clone()
                            value=Signal::derive(move || descriptor.with(|d| d.date_from()))
                            on_input=move |date: Option<NaiveDate>| on_change.call(FilterChange::new().date_from(date))
                        />
                        <DateField
                            label="Arrived to"
                            min=min_date
                            max=max_date
                            value=Signal::derive(move || descriptor.with(|d| d.date_to()))
                            on_input=move |date: Option<NaiveDate>| on_change.call(FilterChange::new().date_to(date))
                        />

                        <label class="block">
                            <span class="block text-sm font-medium text-gray-700 mb-1">"Chief Complaint"</span>
                            <input
                                type="search"
                                class=CONTROL_CLASS
                                placeholder="Search..."
                                list="chief-complaints"
                                prop:value=move || descriptor.with(|d| d.chief_complaint().unwrap_or("").to_string())
                                on:input=move |ev| {
                                    let text = event_target_value(&ev);
                                    on_change.call(FilterChange::new().chief_complaint(Some(text)));
                                }
                            />
                            <datalist id="chief-complaints">
                                {complaints.into_iter().map(|c| view! { <option value=c /> }).collect_view()}
                            </datalist>
                        </label>
                    </div>

                    <ChipGroup
                        label="Race"
                        values=races
                        selected=Signal::derive(move || descriptor.with(|d| d.races().to_vec()))
                        on_toggle=on_toggle_race
                    />
                    <ChipGroup
                        label="Disposition"
                        values=dispositions
                        selected=Signal::derive(move || descriptor.with(|d| d.dispositions().to_vec()))
                        on_toggle=on_toggle_disposition
                    />
                </div>
            }
            .into_view()
        }
    }
}

/// Date input; anything that is not a full date is treated as cleared
#[component]
fn DateField(
    label: &'static str,
    min: Option<String>,
    max: Option<String>,
    #[prop(into)]
    value: Signal<Option<NaiveDate>>,
    #[prop(into)]
    on_input: Callback<Option<NaiveDate>>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm font-medium text-gray-700 mb-1">{label}</span>
            <input
                type="date"
                class=CONTROL_CLASS
                min=min
                max=max
                prop:value=move || value.get().map(|d| d.to_string()).unwrap_or_default()
                on:change=move |ev| on_input.call(parse_date(&event_target_value(&ev)).ok())
            />
        </label>
    }
}

/// Multi-select rendered as toggle chips
#[component]
fn ChipGroup(
    label: &'static str,
    values: Vec<String>,
    #[prop(into)]
    selected: Signal<Vec<String>>,
    on_toggle: Callback<String>,
) -> impl IntoView {
    view! {
        <div>
            <div class="text-sm font-medium text-gray-700 mb-2">
                {label}
                {move || {
                    let count = selected.with(Vec::len);
                    (count > 0).then(|| view! {
                        <span class="ml-2 text-xs text-blue-600">{format!("{} selected", count)}</span>
                    })
                }}
            </div>
            <div class="flex flex-wrap gap-2">
                {values.into_iter().map(|value| {
                    let for_class = value.clone();
                    let for_click = value.clone();
                    view! {
                        <button
                            class=move || {
                                let base = "px-3 py-1 rounded-full text-xs font-medium border transition-colors";
                                if selected.with(|s| s.contains(&for_class)) {
                                    format!("{} bg-blue-600 border-blue-600 text-white", base)
                                } else {
                                    format!("{} bg-white border-gray-300 text-gray-700 hover:bg-gray-100", base)
                                }
                            }
                            on:click=move |_| on_toggle.call(for_click.clone())
                        >
                            {value}
                        </button>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}
