use maud::Markup;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::controller::state::AppState;
use crate::error::AppError;
use crate::model::{ClaimMap, Listing, Segment, TableState, build_listing, overlay_claims};
use crate::view::segments::render_segment_table;

#[derive(Debug, Clone)]
pub struct SegmentsModel {
    pub table: TableState,
    pub flash: Option<String>,
    pub segments: Option<Vec<Segment>>,
    pub claims: Option<ClaimMap>,
    pub listing: Option<Listing>,
    pub markup: Option<Markup>,
    pub error: Option<AppError>,
}

impl SegmentsModel {
    #[must_use]
    pub fn new(table: TableState) -> Self {
        Self {
            table,
            flash: None,
            segments: None,
            claims: None,
            listing: None,
            markup: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_flash(mut self, flash: impl Into<String>) -> Self {
        self.flash = Some(flash.into());
        self
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    PageLoad,
    SegmentsLoaded(Vec<Segment>),
    ClaimsLoaded(ClaimMap),
    Rendered(Markup),
    Failed(AppError),
}

#[derive(Debug, Clone)]
pub enum Effect {
    LoadSegments,
    LoadClaims,
    RenderTemplate,
}

fn build_if_ready(model: &mut SegmentsModel) -> Vec<Effect> {
    if let (Some(segments), Some(claims)) = (model.segments.as_mut(), model.claims.as_ref()) {
        overlay_claims(segments, claims);
        model.listing = Some(build_listing(
            segments,
            &model.table.filter,
            model.table.sort,
            model.table.pagination,
        ));
        vec![Effect::RenderTemplate]
    } else {
        vec![]
    }
}

pub fn update(model: &mut SegmentsModel, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::PageLoad => vec![Effect::LoadSegments, Effect::LoadClaims],
        Msg::SegmentsLoaded(segments) => {
            model.segments = Some(segments);
            build_if_ready(model)
        }
        Msg::ClaimsLoaded(claims) => {
            model.claims = Some(claims);
            build_if_ready(model)
        }
        Msg::Rendered(markup) => {
            model.markup = Some(markup);
            vec![]
        }
        Msg::Failed(e) => {
            model.error = Some(e);
            vec![]
        }
    }
}

#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub state: &'a AppState,
}

pub async fn run_effect(effect: Effect, model: &SegmentsModel, deps: Deps<'_>) -> Msg {
    match effect {
        Effect::LoadSegments => match deps.state.api.list_segments().await {
            Ok(segments) => Msg::SegmentsLoaded(segments),
            Err(e) => Msg::Failed(e),
        },
        Effect::LoadClaims => match deps.state.claims.lock().await.all_claims() {
            Ok(claims) => Msg::ClaimsLoaded(claims),
            Err(e) => Msg::Failed(e),
        },
        Effect::RenderTemplate => match model.listing.as_ref() {
            Some(listing) => Msg::Rendered(render_segment_table(
                listing,
                &model.table,
                model.flash.as_deref(),
            )),
            None => Msg::Failed(AppError::Other("Render requested before data loaded".into())),
        },
    }
}

/// Parse query params into a `SegmentsModel`.
#[must_use]
pub fn decode_request_to_model<S: BuildHasher>(
    query: &HashMap<String, String, S>,
    default_page_size: usize,
) -> SegmentsModel {
    SegmentsModel::new(TableState::from_query(query, default_page_size))
}
