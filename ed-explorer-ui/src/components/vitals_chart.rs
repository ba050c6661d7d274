//! Vitals Chart Component
//!
//! Vital signs timeline on an HTML5 canvas. Heart rate, blood pressure,
//! respiratory rate and temperature share the left axis; O2 saturation gets
//! its own fixed axis on the right. Missing readings break the line.

use ed_explorer::chart::{
    Axis, AxisDomain, ChartFrame, ChartOutcome, Edge, SeriesVisibility, VitalSeries, VitalsChart,
    EMPTY_STATE_MESSAGE, O2_SAT_DOMAIN,
};
use ed_explorer::display::{format_number, format_vital};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Most x-axis labels drawn at once
const MAX_TIME_LABELS: usize = 6;

/// Vitals chart with series toggles and a hover readout
#[component]
pub fn VitalsChartView(
    outcome: ChartOutcome,
    #[prop(into)]
    visibility: Signal<SeriesVisibility>,
    #[prop(into)]
    on_toggle: Callback<VitalSeries>,
) -> impl IntoView {
    let chart = match outcome {
        ChartOutcome::Ready(chart) => chart,
        ChartOutcome::NoObservations => {
            return view! {
                <div class="flex items-center justify-center h-48 text-gray-500 bg-gray-50 rounded-lg">
                    {EMPTY_STATE_MESSAGE}
                </div>
            }
            .into_view();
        }
    };

    let chart = store_value(chart);
    let canvas_ref = create_node_ref::<html::Canvas>();
    let hover = create_rw_signal(None::<usize>);
    let frame = create_memo(move |_| visibility.with(|v| chart.with_value(|c| c.frame(v))));

    // Redraw when visibility or the hovered slot changes
    create_effect(move |_| {
        let frame = frame.get();
        let hovered = hover.get();

        if let Some(canvas) = canvas_ref.get() {
            chart.with_value(|c| draw_chart(&canvas, c, &frame, hovered));
        }
    });

    let on_move = move |ev: ev::MouseEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return;
        }
        let plot = Plot::new(f64::from(canvas.width()), f64::from(canvas.height()));
        let x = (f64::from(ev.client_x()) - rect.left()) * plot.canvas_width / rect.width();
        let slots = frame.with_untracked(|f| f.slots);
        hover.set(plot.nearest_slot(x, slots));
    };

    view! {
        <div class="relative">
            <SeriesToggles visibility=visibility on_toggle=on_toggle />

            <canvas
                node_ref=canvas_ref
                width="900"
                height="360"
                class="w-full h-72 md:h-96 rounded-lg"
                on:mousemove=on_move
                on:mouseleave=move |_| hover.set(None)
            />

            {move || {
                let slot = hover.get()?;
                let point = chart.with_value(|c| c.points().get(slot).cloned())?;
                let rows = visibility.with(|v| v.visible().collect::<Vec<_>>())
                    .into_iter()
                    .map(|series| {
                        let value = format_vital(point.value(series), series.unit());
                        view! {
                            <span class="flex items-center space-x-1">
                                <span class="w-2 h-2 rounded-full" style=format!("background-color: {}", series.color()) />
                                <span>{format!("{}: {}", series.label(), value)}</span>
                            </span>
                        }
                    })
                    .collect_view();

                Some(view! {
                    <div class="mt-2 flex flex-wrap items-center gap-3 text-xs text-gray-700">
                        <span class="font-semibold">{point.tooltip_label}</span>
                        {rows}
                    </div>
                })
            }}
        </div>
    }
    .into_view()
}

/// Legend chips; clicking one shows or hides that series
#[component]
fn SeriesToggles(
    visibility: Signal<SeriesVisibility>,
    on_toggle: Callback<VitalSeries>,
) -> impl IntoView {
    view! {
        <div class="flex flex-wrap gap-2 mb-4">
            {VitalSeries::ALL.into_iter().map(|series| {
                let color = series.color();
                view! {
                    <button
                        class=move || {
                            let base = "flex items-center space-x-2 px-3 py-1 rounded-full text-xs font-medium border transition-colors";
                            if visibility.with(|v| v.is_visible(series)) {
                                format!("{} border-gray-400 text-gray-900 bg-white", base)
                            } else {
                                format!("{} border-gray-200 text-gray-400 bg-gray-50", base)
                            }
                        }
                        on:click=move |_| on_toggle.call(series)
                    >
                        <span class="w-3 h-3 rounded-full" style=format!("background-color: {}", color) />
                        <span>{series.label()}</span>
                    </button>
                }
            }).collect_view()}
        </div>
    }
}

/// Plot area inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
struct Plot {
    canvas_width: f64,
    canvas_height: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Plot {
    fn new(canvas_width: f64, canvas_height: f64) -> Self {
        // Margins; the right one holds the O2 saturation axis
        let margin_left = 60.0;
        let margin_right = 60.0;
        let margin_top = 20.0;
        let margin_bottom = 40.0;

        Self {
            canvas_width,
            canvas_height,
            left: margin_left,
            top: margin_top,
            width: (canvas_width - margin_left - margin_right).max(1.0),
            height: (canvas_height - margin_top - margin_bottom).max(1.0),
        }
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    /// A single observation sits in the middle
    fn x(&self, slot: usize, slots: usize) -> f64 {
        if slots <= 1 {
            self.left + self.width / 2.0
        } else {
            self.left + (slot as f64 / (slots - 1) as f64) * self.width
        }
    }

    // Canvas y grows downward
    fn y(&self, domain: &AxisDomain, value: f64) -> f64 {
        self.top + (1.0 - domain.position(value)) * self.height
    }

    fn nearest_slot(&self, x: f64, slots: usize) -> Option<usize> {
        if slots == 0 || x < self.left - 10.0 || x > self.right() + 10.0 {
            return None;
        }
        if slots == 1 {
            return Some(0);
        }
        let fraction = ((x - self.left) / self.width).clamp(0.0, 1.0);
        Some((fraction * (slots - 1) as f64).round() as usize)
    }
}

/// Triangle vertices `[tip, left, right]` for a reading pinned at `edge`
fn edge_marker(x: f64, y: f64, edge: Edge) -> [(f64, f64); 3] {
    const SIZE: f64 = 6.0;
    let toward = match edge {
        Edge::Below => 1.0,
        Edge::Above => -1.0,
    };
    [
        (x, y + toward * SIZE),
        (x - SIZE, y - toward * SIZE),
        (x + SIZE, y - toward * SIZE),
    ]
}

/// Slots that get a time label, evenly spread
fn label_slots(slots: usize) -> Vec<usize> {
    if slots <= MAX_TIME_LABELS {
        return (0..slots).collect();
    }
    let step = slots.div_ceil(MAX_TIME_LABELS);
    (0..slots).step_by(step).collect()
}

/// Draw the chart on canvas
fn draw_chart(
    canvas: &HtmlCanvasElement,
    chart: &VitalsChart,
    frame: &ChartFrame,
    hovered: Option<usize>,
) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let plot = Plot::new(f64::from(canvas.width()), f64::from(canvas.height()));

    // Clear canvas
    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, plot.canvas_width, plot.canvas_height);

    ctx.set_font("12px sans-serif");
    ctx.set_line_width(1.0);

    // Horizontal grid lines and left axis labels
    for tick in frame.primary.ticks() {
        let y = plot.y(&frame.primary, tick);
        ctx.set_stroke_style(&"#e5e7eb".into()); // gray-200
        ctx.begin_path();
        ctx.move_to(plot.left, y);
        ctx.line_to(plot.right(), y);
        ctx.stroke();

        ctx.set_fill_style(&"#6b7280".into()); // gray-500
        let _ = ctx.fill_text(&format_number(tick), 5.0, y + 4.0);
    }

    // Right axis only while O2 saturation is shown
    if let Some(secondary) = frame.secondary {
        ctx.set_fill_style(&VitalSeries::O2Sat.color().into());
        for tick in secondary.ticks() {
            let y = plot.y(&secondary, tick);
            let _ = ctx.fill_text(&format!("{}%", format_number(tick)), plot.right() + 8.0, y + 4.0);
        }
    }

    if let Some(slot) = hovered {
        let x = plot.x(slot, frame.slots);
        ctx.set_stroke_style(&"#9ca3af".into()); // gray-400
        ctx.begin_path();
        ctx.move_to(x, plot.top);
        ctx.line_to(x, plot.top + plot.height);
        ctx.stroke();
    }

    // Each visible series; a gap starts a new path
    for line in &frame.lines {
        let domain = match line.axis {
            Axis::Primary => frame.primary,
            Axis::Secondary => frame.secondary.unwrap_or(O2_SAT_DOMAIN),
        };

        ctx.set_stroke_style(&line.color.into());
        ctx.set_fill_style(&line.color.into());
        ctx.set_line_width(2.0);

        for segment in &line.segments {
            ctx.begin_path();
            for (i, &(slot, value)) in segment.points.iter().enumerate() {
                let x = plot.x(slot, frame.slots);
                let y = plot.y(&domain, value);
                if i == 0 {
                    ctx.move_to(x, y);
                } else {
                    ctx.line_to(x, y);
                }
            }
            ctx.stroke();

            for &(slot, value) in &segment.points {
                let x = plot.x(slot, frame.slots);
                let y = plot.y(&domain, value);
                ctx.begin_path();
                match domain.beyond(value) {
                    None => {
                        let _ = ctx.arc(x, y, 3.0, 0.0, std::f64::consts::PI * 2.0);
                        ctx.fill();
                    }
                    // Off-scale reading: hollow triangle pointing past the edge
                    Some(edge) => {
                        let [tip, left, right] = edge_marker(x, y, edge);
                        ctx.move_to(tip.0, tip.1);
                        ctx.line_to(left.0, left.1);
                        ctx.line_to(right.0, right.1);
                        ctx.close_path();
                        ctx.set_fill_style(&"#ffffff".into());
                        ctx.fill();
                        ctx.stroke();
                        ctx.set_fill_style(&line.color.into());
                    }
                }
            }
        }
    }

    // X-axis time labels
    ctx.set_fill_style(&"#6b7280".into());
    ctx.set_font("12px sans-serif");
    let points = chart.points();
    for slot in label_slots(frame.slots) {
        if let Some(point) = points.get(slot) {
            let x = plot.x(slot, frame.slots);
            let _ = ctx.fill_text(&point.time_label, x - 15.0, plot.canvas_height - 10.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slot_is_centered() {
        let plot = Plot::new(900.0, 360.0);
        assert_eq!(plot.x(0, 1), plot.left + plot.width / 2.0);
        assert_eq!(plot.nearest_slot(plot.left, 1), Some(0));
    }

    #[test]
    fn test_nearest_slot_rounds_and_ignores_margins() {
        let plot = Plot::new(900.0, 360.0);
        assert_eq!(plot.nearest_slot(plot.left, 5), Some(0));
        assert_eq!(plot.nearest_slot(plot.right(), 5), Some(4));
        assert_eq!(plot.nearest_slot(plot.x(2, 5) + 5.0, 5), Some(2));
        assert_eq!(plot.nearest_slot(0.0, 5), None);
        assert_eq!(plot.nearest_slot(plot.left, 0), None);
    }

    #[test]
    fn test_y_uses_axis_domain() {
        let plot = Plot::new(900.0, 360.0);
        assert_eq!(plot.y(&O2_SAT_DOMAIN, 100.0), plot.top);
        assert_eq!(plot.y(&O2_SAT_DOMAIN, 80.0), plot.top + plot.height);
        // Out-of-domain readings are pinned to the edge
        assert_eq!(plot.y(&O2_SAT_DOMAIN, 60.0), plot.top + plot.height);
    }

    #[test]
    fn test_edge_marker_points_past_the_axis() {
        let plot = Plot::new(900.0, 360.0);
        let bottom = plot.y(&O2_SAT_DOMAIN, 65.0);
        let [tip, left, right] = edge_marker(100.0, bottom, Edge::Below);
        assert!(tip.1 > bottom);
        assert!(left.1 < bottom && right.1 < bottom);

        let top = plot.y(&O2_SAT_DOMAIN, 104.0);
        let [tip, _, _] = edge_marker(100.0, top, Edge::Above);
        assert!(tip.1 < top);
    }

    #[test]
    fn test_label_slots_are_spread() {
        assert_eq!(label_slots(4), vec![0, 1, 2, 3]);
        assert_eq!(label_slots(12), vec![0, 2, 4, 6, 8, 10]);
        assert!(label_slots(100).len() <= MAX_TIME_LABELS);
    }
}
