use maud::{Markup, html};

use super::utils::action_url;
use crate::controller::strava::ImportReport;
use crate::model::{Segment, TableState, format_duration};

#[must_use]
pub fn render_new_segment_form() -> Markup {
    html! {
        details class="new-segment" {
            summary { "Add a segment" }
            form hx-post="segments" hx-include=".segment-filter" hx-target="#segments" hx-swap="innerHTML" {
                label { "Name " input type="text" name="name" required; }
                label { "Distance (km) " input type="number" name="distance_km" step="0.01" min="0"; }
                label { "Elevation gain (m) " input type="number" name="elevation_gain" step="1"; }
                label { "Elevation loss (m) " input type="number" name="elevation_loss" step="1"; }
                label { "Difficulty " input type="text" name="difficulty"; }
                label { "Crown holder " input type="text" name="crown_holder"; }
                label { "Crown time " input type="text" name="crown_time" placeholder="5:23"; }
                label { "PB time " input type="text" name="pb_time" placeholder="6:10"; }
                label { "PB attempts " input type="number" name="pb_attempts" min="0"; }
                label { "Attempts " input type="number" name="attempts" min="0"; }
                label { "Last attempt " input type="date" name="last_attempt_date"; }
                label { "Strava URL " input type="url" name="strava_url"; }
                label { "Encoded polyline " input type="text" name="polyline"; }
                label { "Start latitude " input type="number" name="start_latitude" step="any"; }
                label { "Start longitude " input type="number" name="start_longitude" step="any"; }
                button type="submit" { "Add" }
            }
        }
    }
}

#[must_use]
pub fn render_crown_form(segment: &Segment, state: &TableState) -> Markup {
    let crown_time = segment
        .crown_time
        .map(|t| format_duration(Some(t)))
        .unwrap_or_default();
    let crown_date = segment
        .crown_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    html! {
        form class="crown-form" hx-post=(action_url(segment.id, "crown", state)) hx-target="#segments" hx-swap="innerHTML" {
            input type="text" name="crown_holder" placeholder="Holder" value=(segment.crown_holder.clone().unwrap_or_default());
            input type="date" name="crown_date" value=(crown_date);
            input type="text" name="crown_time" placeholder="5:23" value=(crown_time);
            input type="text" name="crown_pace" placeholder="pace m:ss /km (optional)";
            button type="submit" { "Save crown" }
        }
    }
}

#[must_use]
pub fn render_import_report(report: &ImportReport) -> Markup {
    html! {
        div class="import-report" {
            p {
                "Imported " (report.imported.len())
                ", skipped " (report.skipped.len()) " already tracked"
                @if !report.failed.is_empty() {
                    ", " (report.failed.len()) " failed"
                }
                "."
            }
            @if !report.imported.is_empty() {
                ul class="imported" {
                    @for name in &report.imported { li { (name) } }
                }
            }
            @if !report.failed.is_empty() {
                ul class="failed" {
                    @for (name, reason) in &report.failed { li { (name) ": " (reason) } }
                }
            }
        }
    }
}
