use maud::{Markup, html};

use super::utils::{action_url, sort_indicator};
use crate::model::{
    ClaimFilter, Listing, PageInfo, Segment, SortColumn, StatusFilter, TableState, format_count,
    format_date, format_distance, format_duration, format_elevation, format_pace, or_placeholder,
};

const TARGET: &str = "#segments";

#[must_use]
pub fn render_segment_table(listing: &Listing, state: &TableState, flash: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = flash {
            p class="flash" role="status" { (message) }
        }

        (render_filter_form(state))

        table class="styled-table segment-table" {
            thead {
                tr {
                    @for column in SortColumn::ALL {
                        @let next = state.with_sort_toggled(column);
                        th data-column=(column.as_str()) {
                            a href="#"
                                hx-get=(format!("segments?{}", next.query_string()))
                                hx-target=(TARGET) hx-swap="innerHTML" {
                                (column.label())
                                @if let Some(arrow) = sort_indicator(state.sort, column) {
                                    " " span class="sort-indicator" { (arrow) }
                                }
                            }
                        }
                    }
                    th { "Actions" }
                }
            }
            tbody {
                @if listing.rows.is_empty() {
                    tr {
                        td colspan=(SortColumn::ALL.len() + 1) class="empty" {
                            @if listing.unfiltered_total == 0 {
                                "No segments yet."
                            } @else {
                                "No segments match the current filters."
                            }
                        }
                    }
                }
                @for segment in &listing.rows {
                    (render_segment_row(segment, state))
                }
            }
        }

        (render_pagination(&listing.page, state))
    }
}

fn render_segment_row(segment: &Segment, state: &TableState) -> Markup {
    let id = segment.id;
    html! {
        tr id=(format!("segment-{id}")) data-segment-id=(id) class=(if segment.completed { "completed" } else { "" }) {
            td class="name" {
                @if let Some(url) = &segment.strava_url {
                    a href=(url) target="_blank" rel="noopener" { (segment.name) }
                } @else {
                    (segment.name)
                }
            }
            td { (format_distance(segment.distance)) }
            td { (format_elevation(segment.elevation_gain)) }
            td { (format_elevation(segment.elevation_loss)) }
            td { (or_placeholder(segment.crown_holder.clone())) }
            td { (format_date(segment.crown_date)) }
            td { (format_duration(segment.crown_time)) }
            td { (format_pace(segment.crown_pace)) }
            td { (format_duration(segment.pb_time)) }
            td { (format_pace(segment.pb_pace)) }
            td { (format_count(segment.pb_attempts)) }
            td { (format_count(segment.attempts)) }
            td { (or_placeholder(segment.difficulty.clone())) }
            td { (format_date(segment.last_attempt_date)) }
            td class="claim" {
                form hx-post=(action_url(id, "claim", state)) hx-target=(TARGET) hx-swap="innerHTML" {
                    input type="text" name="claim" placeholder="Your name"
                        value=(segment.claim.clone().unwrap_or_default());
                    button type="submit" { "Dibs" }
                }
                @if segment.is_claimed() {
                    button class="clear-claim"
                        hx-post=(action_url(id, "claim/clear", state))
                        hx-target=(TARGET) hx-swap="innerHTML" { "Clear" }
                }
            }
            td class="completed" {
                button class="toggle-complete"
                    hx-post=(action_url(id, "complete", state))
                    hx-target=(TARGET) hx-swap="innerHTML"
                    aria-pressed=(if segment.completed { "true" } else { "false" }) {
                    @if segment.completed { "✓" } @else { "○" }
                }
            }
            td class="actions" {
                @if segment.polyline.is_some() || segment.start().is_some() {
                    button class="show-map"
                        hx-get=(format!("segments/{id}/map"))
                        hx-target="#segment-map" hx-swap="innerHTML" { "Map" }
                }
                details class="crown-edit" {
                    summary { "Crown" }
                    (super::forms::render_crown_form(segment, state))
                }
                button class="delete"
                    hx-post=(action_url(id, "delete", state))
                    hx-target=(TARGET) hx-swap="innerHTML"
                    hx-confirm=(format!("Delete {}?", segment.name)) { "Delete" }
            }
        }
    }
}

fn render_filter_form(state: &TableState) -> Markup {
    html! {
        form class="segment-filter" hx-get="segments" hx-target=(TARGET) hx-swap="innerHTML" {
            input type="hidden" name="sort" value=(state.sort.column.as_str());
            input type="hidden" name="dir" value=(state.sort.direction.as_str());
            input type="hidden" name="size" value=(state.pagination.page_size);
            input type="search" name="q" placeholder="Search name, dibs, crown" value=(state.filter.query);
            select name="status" {
                @for (value, label) in [
                    (StatusFilter::All, "All"),
                    (StatusFilter::Completed, "Completed"),
                    (StatusFilter::Incomplete, "Not completed"),
                ] {
                    option value=(value.as_str()) selected[state.filter.status == value] { (label) }
                }
            }
            select name="claimed" {
                @for (value, label) in [
                    (ClaimFilter::All, "Any dibs"),
                    (ClaimFilter::Claimed, "Claimed"),
                    (ClaimFilter::Unclaimed, "Unclaimed"),
                ] {
                    option value=(value.as_str()) selected[state.filter.claim == value] { (label) }
                }
            }
            button type="submit" { "Filter" }
        }
    }
}

fn render_pagination(page: &PageInfo, state: &TableState) -> Markup {
    html! {
        nav class="pagination" {
            p class="page-summary" {
                @if page.total == 0 {
                    "No segments to show"
                } @else {
                    "Showing " (page.first_index + 1) "–" (page.last_index) " of " (page.total)
                }
            }
            button class="page-prev" disabled[!page.has_previous()]
                hx-get=(format!("segments?{}", state.with_page(page.page.saturating_sub(1).max(1)).query_string()))
                hx-target=(TARGET) hx-swap="innerHTML" { "Previous" }
            span class="page-number" { "Page " (page.page) " of " (page.page_count.max(1)) }
            button class="page-next" disabled[!page.has_next()]
                hx-get=(format!("segments?{}", state.with_page(page.page + 1).query_string()))
                hx-target=(TARGET) hx-swap="innerHTML" { "Next" }
        }
    }
}
