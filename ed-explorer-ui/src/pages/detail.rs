//! Encounter Detail Page
//!
//! Owns the detail session for the stay in the URL. Navigating to another
//! stay opens a new navigation; a late answer for the previous one is
//! dropped by the session.

use ed_explorer::chart::VitalSeries;
use ed_explorer::state::{DetailSession, ViewState};
use ed_explorer::FetchError;
use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{
    DetailSkeleton, DiagnosesSection, EncounterHeader, FailurePanel, MedicationsSection,
    TriageSection, VitalsChartView,
};

#[component]
pub fn DetailPage() -> impl IntoView {
    let params = use_params_map();
    let stay_id = create_memo(move |_| {
        params.with(|p| p.get("stay_id").and_then(|raw| raw.parse::<i64>().ok()))
    });

    let session = create_rw_signal(DetailSession::new());

    create_effect(move |_| {
        let Some(id) = stay_id.get() else {
            session.update(DetailSession::close);
            return;
        };
        let Some(ticket) = session.try_update(|s| s.open(id)) else {
            return;
        };

        spawn_local(async move {
            let result = api::fetch_encounter(ticket.stay_id).await;
            session.try_update(|s| {
                s.complete(&ticket, result);
            });
        });
    });

    // Toggling a series changes only the visibility, not this
    let view_state = create_memo(move |_| session.with(|s| s.view().clone()));
    let visibility = Signal::derive(move || session.with(|s| s.visibility().clone()));
    let on_toggle = Callback::new(move |series: VitalSeries| {
        session.update(|s| s.toggle_series(series));
    });

    let body = move || {
        let Some(id) = stay_id.get() else {
            return view! {
                <FailurePanel error=FetchError::NotFound("Invalid stay id".to_string()) />
            }
            .into_view();
        };

        match view_state.get() {
            ViewState::Loading => view! { <DetailSkeleton /> }.into_view(),
            ViewState::Failed(error) => view! { <FailurePanel error=error /> }.into_view(),
            // Detail responses are never classified as empty
            ViewState::Empty => view! { <DetailSkeleton /> }.into_view(),
            ViewState::Ready(detail) => {
                let outcome = session.with_untracked(|s| s.chart().cloned());
                let medications = detail.medications.clone();
                let triage = detail.triage.clone();

                view! {
                    <div class="space-y-6">
                        <PageTitle stay_id=id />
                        <EncounterHeader detail=detail.clone() />
                        <TriageSection triage=triage />
                        <section class="bg-white rounded-lg shadow p-6">
                            <h2 class="text-lg font-semibold text-gray-900 mb-4">"Vital Signs Timeline"</h2>
                            {outcome.map(|outcome| view! {
                                <VitalsChartView outcome=outcome visibility=visibility on_toggle=on_toggle />
                            })}
                        </section>
                        <DiagnosesSection detail=detail />
                        <MedicationsSection medications=medications />
                    </div>
                }
                .into_view()
            }
        }
    };

    view! { <div>{body}</div> }
}

/// "Encounter Details" heading with the back arrow
#[component]
fn PageTitle(stay_id: i64) -> impl IntoView {
    view! {
        <div class="flex items-center gap-4">
            <A href="/" class="text-2xl text-gray-500 hover:text-gray-900">"←"</A>
            <div>
                <h1 class="text-2xl font-bold text-gray-900">"Encounter Details"</h1>
                <p class="text-sm text-gray-500">{format!("Stay ID: {}", stay_id)}</p>
            </div>
        </div>
    }
}
