//! Encounter Detail Sections
//!
//! Header, triage, diagnoses and medications for one stay.

use ed_explorer::display::{
    acuity_badge, diagnosis_title, disposition_badge, format_arrival, format_blood_pressure,
    format_duration, format_pain, format_time, format_vital, gender_label, icd_line,
    medication_source_badge, or_missing,
};
use ed_explorer::{EncounterDetail, FetchError, Medication, Triage};
use leptos::*;
use leptos_router::*;

use super::badge::{Pill, SolidPill};

/// Section wrapper
#[component]
pub fn Card(title: String, children: Children) -> impl IntoView {
    view! {
        <section class="bg-white rounded-lg shadow p-6">
            <h2 class="text-lg font-semibold text-gray-900 mb-4">{title}</h2>
            {children()}
        </section>
    }
}

/// Patient summary with disposition and acuity
#[component]
pub fn EncounterHeader(detail: EncounterDetail) -> impl IntoView {
    let acuity = acuity_badge(detail.acuity());
    let facts = [
        ("Gender", gender_label(&detail.gender).to_string()),
        ("Race", or_missing(detail.race.as_deref()).to_string()),
        ("Arrival", format_arrival(&detail.intime)),
        ("Duration", format_duration(detail.duration_hours)),
    ];

    view! {
        <section class="bg-white rounded-lg shadow p-6">
            <div class="flex flex-wrap items-center justify-between gap-4 mb-6">
                <div>
                    <h2 class="text-2xl font-bold text-gray-900">{format!("Patient {}", detail.subject_id)}</h2>
                    <p class="text-sm text-gray-500">
                        {detail.hadm_id.map(|id| format!("Admission {}", id)).unwrap_or_else(|| "No hospital admission".to_string())}
                    </p>
                </div>
                <div class="flex items-center gap-2">
                    <SolidPill badge=disposition_badge(&detail.disposition) />
                    {acuity.map(|badge| view! { <SolidPill badge=badge /> })}
                </div>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {facts.into_iter().map(|(label, value)| view! {
                    <div>
                        <div class="text-xs text-gray-500 uppercase tracking-wide">{label}</div>
                        <div class="text-sm font-medium text-gray-900">{value}</div>
                    </div>
                }).collect_view()}
            </div>

            <div class="mt-4 text-sm text-gray-600">
                <span class="font-medium">"Arrival Transport: "</span>
                {or_missing(detail.arrival_transport.as_deref()).to_string()}
            </div>
        </section>
    }
}

/// Triage assessment: chief complaint and first vitals
#[component]
pub fn TriageSection(triage: Option<Triage>) -> impl IntoView {
    let Some(triage) = triage else {
        return view! {
            <Card title="Triage Assessment".to_string()>
                <p class="text-gray-500">"No triage recorded"</p>
            </Card>
        }
        .into_view();
    };

    let cards = [
        ("Heart Rate", format_vital(triage.heartrate, "bpm")),
        ("Blood Pressure", format_blood_pressure(triage.sbp, triage.dbp)),
        ("O2 Saturation", format_vital(triage.o2sat, "%")),
        ("Resp Rate", format_vital(triage.resprate, "/min")),
        ("Temperature", format_vital(triage.temperature, "°F")),
        ("Pain", format_pain(triage.pain_score())),
    ];

    view! {
        <Card title="Triage Assessment".to_string()>
            <div class="bg-blue-50 border border-blue-100 rounded-lg p-4 mb-4">
                <div class="text-xs text-blue-700 uppercase tracking-wide mb-1">"Chief Complaint"</div>
                <div class="text-gray-900">{or_missing(triage.chiefcomplaint.as_deref()).to_string()}</div>
            </div>
            <div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-6 gap-4">
                {cards.into_iter().map(|(label, value)| view! { <VitalCard label=label value=value /> }).collect_view()}
            </div>
        </Card>
    }
    .into_view()
}

#[component]
fn VitalCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="bg-gray-50 rounded-lg p-3">
            <div class="text-xs text-gray-500">{label}</div>
            <div class="text-lg font-semibold text-gray-900">{value}</div>
        </div>
    }
}

/// Diagnoses in sequence order
#[component]
pub fn DiagnosesSection(detail: EncounterDetail) -> impl IntoView {
    let diagnoses = detail.ordered_diagnoses();
    let title = format!("Diagnoses ({})", diagnoses.len());

    let body = if diagnoses.is_empty() {
        view! { <p class="text-gray-500">"No diagnoses recorded"</p> }.into_view()
    } else {
        view! {
            <ul class="divide-y divide-gray-100">
                {diagnoses.into_iter().map(|diagnosis| view! {
                    <li class="py-3 flex items-start gap-3">
                        <span class="text-xs font-mono text-gray-400 mt-0.5">{format!("#{}", diagnosis.seq_num)}</span>
                        <div>
                            <div class="text-sm font-medium text-gray-900">{diagnosis_title(diagnosis).to_string()}</div>
                            <div class="text-xs text-gray-500 font-mono">{icd_line(diagnosis)}</div>
                        </div>
                    </li>
                }).collect_view()}
            </ul>
        }
        .into_view()
    };

    view! { <Card title=title>{body}</Card> }
}

/// Medications with their source system
#[component]
pub fn MedicationsSection(medications: Vec<Medication>) -> impl IntoView {
    let title = format!("Medications ({})", medications.len());

    let body = if medications.is_empty() {
        view! { <p class="text-gray-500">"No medications recorded"</p> }.into_view()
    } else {
        view! {
            <div class="overflow-x-auto">
                <table class="min-w-full text-sm">
                    <thead>
                        <tr class="text-left text-xs text-gray-500 uppercase">
                            <th class="py-2 pr-4">"Medication"</th>
                            <th class="py-2 pr-4">"Source"</th>
                            <th class="py-2 pr-4">"Time"</th>
                            <th class="py-2">"Description"</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-gray-100">
                        {medications.into_iter().map(|med| view! {
                            <tr>
                                <td class="py-2 pr-4 font-medium">{or_missing(med.name.as_deref()).to_string()}</td>
                                <td class="py-2 pr-4"><Pill badge=medication_source_badge(med.source) /></td>
                                <td class="py-2 pr-4 whitespace-nowrap">{format_time(med.charttime.as_ref())}</td>
                                <td class="py-2 text-gray-600">{or_missing(med.description.as_deref()).to_string()}</td>
                            </tr>
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_view()
    };

    view! { <Card title=title>{body}</Card> }
}

/// Failure panel with the way back to the list
#[component]
pub fn FailurePanel(error: FetchError) -> impl IntoView {
    let navigate = use_navigate();

    view! {
        <div class="flex flex-col items-center justify-center min-h-[50vh] text-center">
            <h1 class="text-2xl font-bold text-gray-900 mb-2">{error.title()}</h1>
            <p class="text-gray-500 mb-6">{error.user_message()}</p>
            <button
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
                on:click=move |_| navigate("/", Default::default())
            >
                "Back to List"
            </button>
        </div>
    }
}
