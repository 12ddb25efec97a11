use actix_web::http::header;
use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use maud::html;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use super::forms::{ClaimForm, CrownForm, NewSegmentForm};
use crate::controller::state::AppState;
use crate::controller::strava::{ImportReport, import_starred};
use crate::error::AppError;
use crate::model::{SegmentPatch, non_blank};
use crate::mvu::runtime::run_segments;
use crate::mvu::segments::{Deps, Msg, decode_request_to_model};
use crate::view::index::render_index_template;
use crate::view::render_error;
use crate::view::segments::{render_import_report, render_segment_map};

pub const OAUTH_STATE_KEY: &str = "strava:oauth_state";

type Query = web::Query<HashMap<String, String>>;

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(body)
}

/// Reloads the segments and claims and renders the table for `query`.
async fn render_table_response(
    state: &AppState,
    query: &HashMap<String, String>,
    flash: Option<String>,
) -> Result<HttpResponse, AppError> {
    let mut model = decode_request_to_model(query, state.default_page_size);
    if let Some(flash) = flash {
        model = model.with_flash(flash);
    }
    run_segments(&mut model, Msg::PageLoad, Deps { state }).await?;
    let markup = model
        .markup
        .ok_or_else(|| AppError::Other("segments table was not rendered".into()))?;
    Ok(html_response(markup.into_string()))
}

pub async fn index(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let connected = match state.strava {
        Some(_) => Some(state.token.read().await.is_some()),
        None => None,
    };
    Ok(html_response(
        render_index_template("Segments", connected).into_string(),
    ))
}

pub async fn segments_table(
    state: Data<AppState>,
    query: Query,
) -> Result<HttpResponse, AppError> {
    render_table_response(&state, &query, None).await
}

pub async fn create_segment(
    state: Data<AppState>,
    query: Query,
    form: web::Form<NewSegmentForm>,
) -> Result<HttpResponse, AppError> {
    let mut form = form.into_inner();
    // The form posts the filter inputs along with the segment fields.
    let mut query = query.into_inner();
    query.extend(std::mem::take(&mut form.table));
    let new = match form.into_new_segment() {
        Ok(new) => new,
        Err(e @ (AppError::Invalid(_) | AppError::Polyline(_))) => {
            return render_table_response(&state, &query, Some(e.to_string())).await;
        }
        Err(e) => return Err(e),
    };

    if let Some(strava_id) = new.strava_id {
        let existing = state.api.list_segments().await?;
        if let Some(dup) = existing.iter().find(|s| s.strava_id == Some(strava_id)) {
            let flash = format!("'{}' is already tracked", dup.name);
            return render_table_response(&state, &query, Some(flash)).await;
        }
    }

    let created = state.api.create_segment(&new).await?;
    tracing::info!(id = created.id, name = %created.name, "created segment");
    if let Some(claim) = created.claim.as_deref() {
        state.claims.lock().await.set_claim(created.id, claim)?;
    }
    let flash = format!("Added '{}'", created.name);
    render_table_response(&state, &query, Some(flash)).await
}

/// Writes the claim to the local cache, then to the api. The cache wins on the
/// next render, so an api failure only costs a flash message. A clear leaves
/// an empty entry until the api has accepted it.
async fn write_claim(
    state: &AppState,
    id: i64,
    claim: Option<String>,
) -> Result<Option<String>, AppError> {
    {
        let store = state.claims.lock().await;
        match claim.as_deref() {
            Some(name) => {
                store.set_claim(id, name)?;
            }
            None => store.mark_cleared(id)?,
        }
    }

    match state
        .api
        .update_segment(id, &SegmentPatch::claim(claim.clone()))
        .await
    {
        Ok(_) => Ok(Some(match claim {
            Some(name) => format!("Claimed by {name}"),
            None => {
                state.claims.lock().await.clear_claim(id)?;
                "Claim cleared".to_string()
            }
        })),
        Err(e) => {
            tracing::warn!(segment = id, error = %e, "claim saved locally but not upstream");
            Ok(Some(match claim {
                Some(_) => format!("Claim saved locally; the server said: {e}"),
                None => format!("Claim cleared locally; the server said: {e}"),
            }))
        }
    }
}

pub async fn claim(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: Query,
    form: web::Form<ClaimForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let claim = match non_blank(form.claim.as_deref()) {
        Some(name) => Some(name),
        None => state.athlete_name().await,
    };
    let flash = write_claim(&state, id, claim).await?;
    render_table_response(&state, &query, flash).await
}

pub async fn clear_claim(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: Query,
) -> Result<HttpResponse, AppError> {
    let flash = write_claim(&state, path.into_inner(), None).await?;
    render_table_response(&state, &query, flash).await
}

pub async fn crown(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: Query,
    form: web::Form<CrownForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let segment = state.api.get_segment(id).await?;
    let patch = match form.into_inner().into_patch(&segment) {
        Ok(patch) => patch,
        Err(e) => return render_table_response(&state, &query, Some(e.to_string())).await,
    };
    state.api.update_segment(id, &patch).await?;
    let flash = format!("Updated crown for '{}'", segment.name);
    render_table_response(&state, &query, Some(flash)).await
}

pub async fn toggle_complete(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: Query,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let segment = state.api.get_segment(id).await?;
    state
        .api
        .update_segment(id, &SegmentPatch::completed(!segment.completed))
        .await?;
    render_table_response(&state, &query, None).await
}

pub async fn delete(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: Query,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    state.api.delete_segment(id).await?;
    state.claims.lock().await.clear_claim(id)?;
    tracing::info!(segment = id, "deleted segment");
    render_table_response(&state, &query, Some("Segment deleted".into())).await
}

pub async fn map(state: Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
    let segment = state.api.get_segment(path.into_inner()).await?;
    let markup = render_segment_map(&segment);
    if markup.0.is_empty() {
        return Ok(html_response(
            html! { p class="no-map" { "No map data for " (segment.name) "." } }.into_string(),
        ));
    }
    Ok(html_response(markup.into_string()))
}

async fn run_import(state: &AppState) -> Result<ImportReport, AppError> {
    let strava = state.strava_client()?;
    let token = state.fresh_token().await?;
    import_starred(state.api.as_ref(), strava, &token).await
}

/// Always answers 200 so htmx swaps the outcome into the report area.
pub async fn strava_import(state: Data<AppState>) -> HttpResponse {
    match run_import(&state).await {
        Ok(report) => HttpResponse::Ok()
            .content_type("text/html")
            // Tells the table to reload itself.
            .insert_header(("HX-Trigger", "segments-changed"))
            .body(render_import_report(&report).into_string()),
        Err(e) => {
            tracing::warn!(error = %e, "strava import failed");
            html_response(render_error(&e).into_string())
        }
    }
}

pub async fn strava_connect(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let strava = state.strava_client()?;
    let nonce = Uuid::new_v4().simple().to_string();
    state
        .claims
        .lock()
        .await
        .put_json(OAUTH_STATE_KEY, &nonce)?;
    let url = strava.authorize_url(&nonce)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.to_string()))
        .finish())
}

#[derive(Deserialize, Debug)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn strava_callback(
    state: Data<AppState>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let strava = state.strava_client()?;
    if let Some(error) = &query.error {
        return Err(AppError::Auth(format!("strava declined: {error}")));
    }

    let expected = {
        let store = state.claims.lock().await;
        let expected = store.get_json::<String>(OAUTH_STATE_KEY)?;
        store.remove(OAUTH_STATE_KEY)?;
        expected
    };
    if expected.is_none() || expected != query.state {
        return Err(AppError::Auth("oauth state did not match".into()));
    }

    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::Auth("strava sent no code".into()))?;
    let token = strava.exchange_code(code).await?;
    tracing::info!(
        athlete = ?token.athlete.as_ref().map(|a| a.display_name()),
        "connected to strava"
    );
    state.store_token(token).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}
