//! Plain-text rendering for the command line
//!
//! Every renderer returns a `String` so output can be checked in tests and
//! written wherever the caller wants.

use serde::Serialize;
use std::io;

use crate::chart::{ChartOutcome, SeriesVisibility, VitalSeries};
use crate::display::{
    acuity_badge, diagnosis_title, format_arrival, format_blood_pressure, format_duration,
    format_number, format_pain, format_time, format_vital, gender_label, icd_line,
    medication_source_badge, or_missing, MISSING,
};
use crate::error::FetchError;
use crate::model::{EncounterDetail, EncounterListItem, EncounterPage, FilterOptions};
use crate::query::{QueryDescriptor, SortColumn};
use crate::state::PageWindow;

/// Cut `text` to `width` characters, marking the cut with `…`
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn header_label(column: SortColumn, descriptor: &QueryDescriptor) -> String {
    if descriptor.sort_by() == column {
        format!("{} {}", column.label(), descriptor.sort_order().arrow())
    } else {
        column.label().to_string()
    }
}

/// Join rendered lines, ending with a newline
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Encounter list as an aligned table with a pagination footer
pub fn render_page(page: &EncounterPage, descriptor: &QueryDescriptor) -> String {
    let mut lines = vec![
        format!(
            "{:<12} {:<20} {:<8} {:<24} {:<28} {:<20} {:<30} {}",
            header_label(SortColumn::StayId, descriptor),
            header_label(SortColumn::Intime, descriptor),
            "Gender",
            "Race",
            "Chief Complaint",
            "Acuity",
            header_label(SortColumn::Disposition, descriptor),
            "Duration"
        ),
        "-".repeat(152),
    ];

    lines.extend(page.items.iter().map(|item| {
        let acuity = acuity_badge(item.acuity)
            .map(|b| b.label)
            .unwrap_or_else(|| MISSING.to_string());
        format!(
            "{:<12} {:<20} {:<8} {:<24} {:<28} {:<20} {:<30} {}",
            item.stay_id,
            format_arrival(&item.intime),
            gender_label(&item.gender),
            fit(or_missing(item.race.as_deref()), 24),
            fit(or_missing(item.chiefcomplaint.as_deref()), 28),
            acuity,
            fit(item.disposition.as_str(), 30),
            format_duration(item.duration_hours)
        )
    }));

    let window = PageWindow::from_page(page);
    lines.push(String::new());
    lines.push(format!("{}  ({})", window.summary(), window.position()));
    finish(lines)
}

/// What to print when a query matched nothing
pub fn render_empty_list(descriptor: &QueryDescriptor) -> String {
    if descriptor.has_active_filters() {
        "No encounters match the current filters.\nClear filters to see all encounters.\n"
            .to_string()
    } else {
        "No encounters found.\n".to_string()
    }
}

/// Failure panel: title, message and the way back
pub fn render_failure(err: &FetchError) -> String {
    format!(
        "{}\n{}\nBack to List: run `ed-explorer list`\n",
        err.title(),
        err.user_message()
    )
}

/// Vitals as one row per observation, gaps shown as `-`
pub fn render_vitals(outcome: &ChartOutcome, visibility: &SeriesVisibility) -> String {
    let chart = match outcome {
        ChartOutcome::NoObservations => return format!("{}\n", crate::chart::EMPTY_STATE_MESSAGE),
        ChartOutcome::Ready(chart) => chart,
    };

    let visible: Vec<VitalSeries> = visibility.visible().collect();

    let header: String = visible
        .iter()
        .map(|series| format!(" | {:<14}", format!("{} ({})", series.key(), series.unit())))
        .collect();
    let mut lines = vec![
        format!("{:<14}{}", "Time", header),
        "-".repeat(14 + visible.len() * 17),
    ];

    lines.extend(chart.points().iter().map(|point| {
        let cells: String = visible
            .iter()
            .map(|series| {
                let value = point
                    .value(*series)
                    .map(format_number)
                    .unwrap_or_else(|| MISSING.to_string());
                format!(" | {:<14}", value)
            })
            .collect();
        format!("{:<14}{}", point.tooltip_label, cells)
    }));

    let frame = chart.frame(visibility);
    lines.push(String::new());
    lines.push(format!(
        "Left axis: {} to {}",
        format_number(frame.primary.min),
        format_number(frame.primary.max)
    ));
    if let Some(secondary) = frame.secondary {
        lines.push(format!(
            "Right axis (O2 Saturation): {} to {}",
            format_number(secondary.min),
            format_number(secondary.max)
        ));
    }

    let legend: Vec<String> = visibility
        .legend()
        .into_iter()
        .map(|entry| {
            let mark = if entry.visible { "x" } else { " " };
            format!("[{}] {} {}", mark, entry.series.label(), entry.series.color())
        })
        .collect();
    lines.push(format!("Legend: {}", legend.join("  ")));
    finish(lines)
}

/// Full encounter view
pub fn render_detail(
    detail: &EncounterDetail,
    outcome: &ChartOutcome,
    visibility: &SeriesVisibility,
) -> String {
    let mut lines = vec![format!("Stay ID: {}", detail.stay_id)];

    lines.push(match detail.hadm_id {
        Some(hadm) => format!(
            "Subject ID: {} | Hospital Admission: {}",
            detail.subject_id, hadm
        ),
        None => format!("Subject ID: {}", detail.subject_id),
    });

    let mut badges = vec![detail.disposition.as_str().to_string()];
    if let Some(acuity) = acuity_badge(detail.acuity()) {
        badges.push(acuity.label);
    }
    lines.push(badges.join(" | "));
    lines.push(String::new());

    let mut facts = vec![
        ("Gender", gender_label(&detail.gender).to_string()),
        ("Race", or_missing(detail.race.as_deref()).to_string()),
        ("Arrival", format_arrival(&detail.intime)),
        ("Departure", format_arrival(&detail.outtime)),
        ("Duration", format_duration(detail.duration_hours)),
    ];
    if let Some(transport) = detail.arrival_transport.as_deref() {
        facts.push(("Arrival Transport", transport.to_string()));
    }
    lines.extend(facts.into_iter().map(|(label, value)| format!("{:<20} {}", label, value)));

    if let Some(triage) = &detail.triage {
        lines.push(String::new());
        lines.push("Triage Assessment".to_string());
        if let Some(complaint) = triage.chiefcomplaint.as_deref() {
            lines.push(format!("  Chief Complaint: {}", complaint));
        }
        lines.push(format!(
            "  Heart Rate: {}  Blood Pressure: {}  O2 Saturation: {}",
            format_vital(triage.heartrate, VitalSeries::HeartRate.unit()),
            format_blood_pressure(triage.sbp, triage.dbp),
            format_vital(triage.o2sat, VitalSeries::O2Sat.unit()),
        ));
        lines.push(format!(
            "  Resp Rate: {}  Temperature: {}  Pain: {}",
            format_vital(triage.resprate, VitalSeries::RespRate.unit()),
            format_vital(triage.temperature, VitalSeries::Temperature.unit()),
            format_pain(triage.pain_score()),
        ));
    }

    lines.push(String::new());
    lines.push("Vital Signs Timeline".to_string());
    lines.push(render_vitals(outcome, visibility).trim_end_matches('\n').to_string());

    lines.push(String::new());
    lines.push(format!("Diagnoses ({})", detail.diagnoses.len()));
    if detail.diagnoses.is_empty() {
        lines.push("  No diagnoses recorded".to_string());
    }
    lines.extend(detail.ordered_diagnoses().into_iter().map(|dx| {
        format!("  {:>2}. {} ({})", dx.seq_num, diagnosis_title(dx), icd_line(dx))
    }));

    lines.push(String::new());
    lines.push(format!("Medications ({})", detail.medications.len()));
    if detail.medications.is_empty() {
        lines.push("  No medications recorded".to_string());
    }
    lines.extend(detail.medications.iter().map(|med| {
        format!(
            "  {:<30} {:<10} {:<14} {}",
            fit(or_missing(med.name.as_deref()), 30),
            medication_source_badge(med.source).label,
            format_time(med.charttime.as_ref()),
            or_missing(med.description.as_deref())
        )
    }));

    finish(lines)
}

/// Filter vocabularies and the dataset's date span
pub fn render_options(options: &FilterOptions) -> String {
    let list = |values: &[String]| {
        if values.is_empty() {
            MISSING.to_string()
        } else {
            values.join(", ")
        }
    };

    finish(vec![
        format!("Genders:      {}", list(&options.genders)),
        format!("Races:        {}", list(&options.races)),
        format!("Dispositions: {}", list(&options.dispositions)),
        format!("Complaints:   {} distinct", options.chief_complaints.len()),
        format!(
            "Date range:   {} to {}",
            format_time(options.date_range.min.as_ref()),
            format_time(options.date_range.max.as_ref())
        ),
    ])
}

#[derive(Serialize)]
struct CsvRow<'a> {
    stay_id: i64,
    subject_id: i64,
    intime: String,
    outtime: String,
    gender: &'a str,
    race: &'a str,
    chiefcomplaint: &'a str,
    acuity: Option<i32>,
    disposition: &'a str,
    duration_hours: f64,
}

impl<'a> From<&'a EncounterListItem> for CsvRow<'a> {
    fn from(item: &'a EncounterListItem) -> Self {
        Self {
            stay_id: item.stay_id,
            subject_id: item.subject_id,
            intime: item.intime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            outtime: item.outtime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            gender: &item.gender,
            race: item.race.as_deref().unwrap_or(""),
            chiefcomplaint: item.chiefcomplaint.as_deref().unwrap_or(""),
            acuity: item.acuity,
            disposition: item.disposition.as_str(),
            duration_hours: item.duration_hours,
        }
    }
}

/// Write the page's rows as CSV with a header line
pub fn write_page_csv<W: io::Write>(page: &EncounterPage, writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in &page.items {
        csv_writer.serialize(CsvRow::from(item))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::VitalsChart;
    use crate::model::{timestamp, Diagnosis, Disposition, Medication, MedicationSource, Triage, VitalSign};
    use crate::query::{FilterChange, Gender};

    fn item(stay_id: i64, race: Option<&str>) -> EncounterListItem {
        EncounterListItem {
            stay_id,
            subject_id: 10000032,
            hadm_id: None,
            intime: timestamp::parse("2180-07-23T12:35:00").unwrap(),
            outtime: timestamp::parse("2180-07-23T17:50:00").unwrap(),
            gender: "M".to_string(),
            race: race.map(str::to_string),
            arrival_transport: None,
            disposition: Disposition::Admitted,
            chiefcomplaint: Some("Chest pain, radiating to the left arm and jaw".to_string()),
            acuity: Some(2),
            duration_hours: 5.26,
        }
    }

    fn page(items: Vec<EncounterListItem>) -> EncounterPage {
        let total = items.len() as u64;
        EncounterPage {
            items,
            total,
            page: 1,
            per_page: 20,
            total_pages: 1,
        }
    }

    #[test]
    fn test_render_page() {
        let descriptor = QueryDescriptor::default();
        let text = render_page(&page(vec![item(30000012, Some("WHITE")), item(30000013, None)]), &descriptor);

        assert!(text.contains("Arrival ↓"));
        assert!(text.contains("30000012"));
        assert!(text.contains("Level 2: Emergent"));
        assert!(text.contains("Chest pain, radiating to th…"));
        assert!(text.contains("5.3h"));
        assert!(text.contains("Showing 1 to 2 of 2 encounters  (Page 1 of 1)"));
    }

    #[test]
    fn test_render_empty_list() {
        let plain = QueryDescriptor::default();
        let filtered = plain.with_filter(FilterChange::new().gender(Some(Gender::Female)));

        assert_eq!(render_empty_list(&plain), "No encounters found.\n");
        assert!(render_empty_list(&filtered).contains("Clear filters"));
    }

    #[test]
    fn test_render_failure() {
        let text = render_failure(&FetchError::NotFound("Encounter not found".into()));
        assert!(text.starts_with("Encounter Not Found\n"));
        assert!(text.contains("Back to List"));
    }

    #[test]
    fn test_render_vitals_shows_gaps() {
        let t = |s: &str| timestamp::parse(s).unwrap();
        let vitals = vec![
            VitalSign::at(t("2180-07-23T14:00:00")).heartrate(80.0),
            VitalSign::at(t("2180-07-23T13:00:00")).o2sat(97.0),
        ];
        let text = render_vitals(&VitalsChart::build(&vitals), &SeriesVisibility::default());
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[2].starts_with("Jul 23, 13:00"));
        assert!(rows[2].contains("| -"));
        assert!(rows[3].contains("| 80"));
        assert!(text.contains("Right axis (O2 Saturation): 80 to 100"));
        assert!(text.contains("[x] Heart Rate #ef4444"));
        assert!(text.contains("[ ] Temperature #8b5cf6"));
    }

    #[test]
    fn test_render_vitals_empty_state() {
        let text = render_vitals(&VitalsChart::build(&[]), &SeriesVisibility::default());
        assert_eq!(text, "No vital signs recorded for this encounter\n");
    }

    #[test]
    fn test_render_detail_sections() {
        let detail = EncounterDetail {
            stay_id: 30000012,
            subject_id: 10000032,
            hadm_id: Some(22595853),
            intime: timestamp::parse("2180-05-06T19:17:00").unwrap(),
            outtime: timestamp::parse("2180-05-06T23:30:00").unwrap(),
            gender: "F".to_string(),
            race: None,
            arrival_transport: Some("AMBULANCE".to_string()),
            disposition: Disposition::Home,
            duration_hours: 4.22,
            triage: Some(Triage {
                heartrate: Some(104.0),
                sbp: Some(132.0),
                dbp: Some(84.0),
                pain: Some("7".to_string()),
                acuity: Some(3),
                chiefcomplaint: Some("Abd pain".to_string()),
                ..Triage::default()
            }),
            vitalsigns: Vec::new(),
            diagnoses: vec![
                Diagnosis { seq_num: 2, icd_code: "R109".into(), icd_version: 10, icd_title: None },
                Diagnosis { seq_num: 1, icd_code: "K5900".into(), icd_version: 10, icd_title: Some("Constipation".into()) },
            ],
            medications: vec![Medication {
                charttime: None,
                name: Some("Ondansetron".into()),
                source: MedicationSource::Pyxis,
                gsn: None,
                description: None,
            }],
        };
        let text = render_detail(&detail, &VitalsChart::build(&detail.vitalsigns), &SeriesVisibility::default());

        assert!(text.contains("Subject ID: 10000032 | Hospital Admission: 22595853"));
        assert!(text.contains("HOME | Level 3: Urgent"));
        assert!(text.contains("Gender               Female"));
        assert!(text.contains("Blood Pressure: 132/84 mmHg"));
        assert!(text.contains("Pain: 7/10"));
        assert!(text.contains("No vital signs recorded for this encounter"));

        let first = text.find("Constipation").unwrap();
        let second = text.find("Unknown (ICD-10: R109)").unwrap();
        assert!(first < second);
        assert!(text.contains("pyxis"));
    }

    #[test]
    fn test_rendered_blocks_end_with_one_newline() {
        let options = FilterOptions {
            genders: vec!["F".into(), "M".into()],
            ..FilterOptions::default()
        };
        let text = render_options(&options);
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("Genders:      F, M\n"));
        assert!(text.contains("Races:        -\n"));
        assert!(text.ends_with('\n') && !text.ends_with("\n\n"));

        let t = |s: &str| timestamp::parse(s).unwrap();
        let vitals = vec![VitalSign::at(t("2180-07-23T14:00:00")).heartrate(80.0)];
        let chart = VitalsChart::build(&vitals);
        let vitals_text = render_vitals(&chart, &SeriesVisibility::default());
        assert!(vitals_text.starts_with("Time           | heartrate (bpm)"));
        assert!(!vitals_text.ends_with("\n\n"));
    }

    #[test]
    fn test_write_page_csv() {
        let mut buf = Vec::new();
        write_page_csv(&page(vec![item(1, None)]), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("stay_id,subject_id,intime,outtime,gender,race,chiefcomplaint,acuity,disposition,duration_hours")
        );
        assert!(lines.next().unwrap().starts_with("1,10000032,2180-07-23T12:35:00,"));
    }
}
